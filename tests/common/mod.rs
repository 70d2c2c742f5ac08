//! Common test utilities and helpers.
//!
//! Section tables shaped like the ones real PE images carry.

use rva_resolver::SectionHeader;

/// Build a section header with the given mapping fields.
pub fn section(name: &str, va: u32, raw_size: u32, raw_ptr: u32) -> SectionHeader {
    SectionHeader::new(name, va, raw_size, raw_ptr)
}

/// Layout of a small MinGW-style executable: file alignment 0x200,
/// section alignment 0x1000, with an uninitialized `.bss`.
pub fn typical_pe_sections() -> Vec<SectionHeader> {
    let mut bss = section(".bss", 0x4000, 0, 0);
    bss.virtual_size = 0x180;

    vec![
        section(".text", 0x1000, 0x1600, 0x400),
        section(".data", 0x3000, 0x200, 0x1a00),
        bss,
        section(".rdata", 0x5000, 0x600, 0x1c00),
        section(".idata", 0x6000, 0x400, 0x2200),
    ]
}
