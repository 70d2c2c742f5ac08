#![no_main]
use libfuzzer_sys::fuzz_target;
use rva_resolver::RvaResolver;

fn word(chunk: &[u8]) -> u32 {
    u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
}

// Input: a lookup RVA, then 12-byte (va, raw size, raw pointer) records.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let rva = word(&data[..4]);
    let sections: Vec<(u32, u32, u32)> = data[4..]
        .chunks_exact(12)
        .map(|c| (word(&c[0..4]), word(&c[4..8]), word(&c[8..12])))
        .collect();

    let resolver = RvaResolver::new(&sections);
    let raw = resolver.get_file_address(rva);
    match resolver.file_address(rva) {
        Some(offset) => {
            assert_eq!(raw, offset);
            assert!(resolver.resolve(rva).is_ok());
        }
        None => {
            assert_eq!(raw, 0);
            assert!(resolver.run_containing(rva).is_none());
        }
    }
    assert_eq!(resolver.get_file_addresses(&[rva]), vec![raw]);
});
