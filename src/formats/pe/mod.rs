//! PE virtual address resolution
//!
//! The section-table parser hands its headers to [`RvaResolver`]; anything
//! holding an RVA (export, import or resource directories, TLS callbacks)
//! then asks the resolver where those bytes sit in the file.

pub mod resolver;
pub mod types;

pub use resolver::RvaResolver;
pub use types::*;
