//! Core PE section and run types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three section-table fields needed to map a section's virtual range
/// back into the file.
///
/// Implemented by whatever parses the section table; the resolver never
/// looks at anything else.
pub trait SectionDescriptor {
    /// RVA at which the loader maps the section.
    fn virtual_address(&self) -> u32;
    /// Number of bytes backed by the file. Zero for BSS-like sections.
    fn size_of_raw_data(&self) -> u32;
    /// File offset of the section's first byte.
    fn pointer_to_raw_data(&self) -> u32;
}

impl<T: SectionDescriptor + ?Sized> SectionDescriptor for &T {
    fn virtual_address(&self) -> u32 {
        (**self).virtual_address()
    }

    fn size_of_raw_data(&self) -> u32 {
        (**self).size_of_raw_data()
    }

    fn pointer_to_raw_data(&self) -> u32 {
        (**self).pointer_to_raw_data()
    }
}

/// `(virtual_address, size_of_raw_data, pointer_to_raw_data)`
impl SectionDescriptor for (u32, u32, u32) {
    fn virtual_address(&self) -> u32 {
        self.0
    }

    fn size_of_raw_data(&self) -> u32 {
        self.1
    }

    fn pointer_to_raw_data(&self) -> u32 {
        self.2
    }
}

/// Section header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    pub name: [u8; 8],
    pub virtual_size: u32,
    pub virtual_address: u32,
    pub size_of_raw_data: u32,
    pub pointer_to_raw_data: u32,
}

impl SectionHeader {
    /// Build a header from a section name (truncated to 8 bytes) and its
    /// mapping fields. `virtual_size` defaults to the raw size.
    pub fn new(
        name: &str,
        virtual_address: u32,
        size_of_raw_data: u32,
        pointer_to_raw_data: u32,
    ) -> Self {
        let mut name_bytes = [0u8; 8];
        let bytes = name.as_bytes();
        let len = bytes.len().min(8);
        name_bytes[..len].copy_from_slice(&bytes[..len]);

        Self {
            name: name_bytes,
            virtual_size: size_of_raw_data,
            virtual_address,
            size_of_raw_data,
            pointer_to_raw_data,
        }
    }

    pub fn name(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(8);
        String::from_utf8_lossy(&self.name[..end]).to_string()
    }

    /// True when the section occupies no bytes in the file.
    pub fn is_uninitialized(&self) -> bool {
        self.size_of_raw_data == 0
    }
}

impl SectionDescriptor for SectionHeader {
    fn virtual_address(&self) -> u32 {
        self.virtual_address
    }

    fn size_of_raw_data(&self) -> u32 {
        self.size_of_raw_data
    }

    fn pointer_to_raw_data(&self) -> u32 {
        self.pointer_to_raw_data
    }
}

/// One contiguous virtual interval `[virtual_address, virtual_end)` and the
/// file offset its first byte lives at.
///
/// `virtual_end` is computed with wrapping u32 arithmetic, so a section whose
/// end overflows the address space produces a run that contains nothing.
/// Runs only come from section descriptors, so they serialize but never
/// deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Run {
    virtual_address: u32,
    virtual_end: u32,
    physical_address: u32,
}

impl Run {
    pub(crate) fn new(virtual_address: u32, size: u32, physical_address: u32) -> Self {
        Self {
            virtual_address,
            virtual_end: virtual_address.wrapping_add(size),
            physical_address,
        }
    }

    /// Build the run for a section, or `None` if it has no file backing.
    pub fn from_section<S: SectionDescriptor + ?Sized>(section: &S) -> Option<Self> {
        let size = section.size_of_raw_data();
        if size == 0 {
            return None;
        }
        Some(Self::new(
            section.virtual_address(),
            size,
            section.pointer_to_raw_data(),
        ))
    }

    #[inline]
    pub fn virtual_address(&self) -> u32 {
        self.virtual_address
    }

    #[inline]
    pub fn virtual_end(&self) -> u32 {
        self.virtual_end
    }

    #[inline]
    pub fn physical_address(&self) -> u32 {
        self.physical_address
    }

    #[inline]
    pub fn contains(&self, rva: u32) -> bool {
        rva >= self.virtual_address && rva < self.virtual_end
    }

    /// Map an RVA to its file offset relative to this run.
    ///
    /// Only meaningful when `contains(rva)`; for other addresses the u32
    /// arithmetic wraps rather than panicking.
    #[inline]
    pub fn translate(&self, rva: u32) -> u32 {
        rva.wrapping_sub(self.virtual_address)
            .wrapping_add(self.physical_address)
    }

    /// `translate` for addresses inside the run, `None` otherwise.
    #[inline]
    pub fn checked_translate(&self, rva: u32) -> Option<u32> {
        self.contains(rva).then(|| self.translate(rva))
    }

    /// True when the end wrapped around, leaving no address inside.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.virtual_end <= self.virtual_address
    }

    /// Whether the two virtual intervals share at least one address.
    pub fn overlaps(&self, other: &Run) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.virtual_address < other.virtual_end
            && other.virtual_address < self.virtual_end
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[0x{:x}..0x{:x}) -> 0x{:x}",
            self.virtual_address, self.virtual_end, self.physical_address
        )
    }
}
