//! Error types for RVA resolution.
//!
//! The plain lookup never fails; these errors back the strict lookup
//! variants and configuration loading.

use thiserror::Error;

/// Main error type for resolver operations.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// No run contains the address
    #[error("Unmapped RVA: {rva:#010x}")]
    UnmappedAddress { rva: u32 },

    /// The span is not wholly backed by a single run
    #[error("Unmapped RVA range: {rva:#010x} (+{len:#x})")]
    UnmappedRange { rva: u32, len: u32 },

    /// Configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, ResolverError>;
