//! Translation of virtual addresses (RVAs) in loaded-image formats to offsets
//! in the on-disk file.

/// Resolver configuration
pub mod config;
/// Error types
pub mod error;
/// Format-specific types and the resolver itself
pub mod formats;
/// Tracing setup helpers
pub mod logging;

pub use config::ResolverConfig;
pub use error::{ResolverError, Result};
pub use formats::pe::{Run, RvaResolver, SectionDescriptor, SectionHeader};
