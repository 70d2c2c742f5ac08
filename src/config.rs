//! Configuration for resolver construction and lookup.
//!
//! Defaults reproduce the classic behavior: misses resolve to file offset 0
//! and overlapping sections are accepted silently.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ResolverError, Result};

/// File offset returned by `get_file_address` when no run matches.
///
/// Offset 0 lies inside the image headers, so no real pointer resolves there.
pub const DEFAULT_UNRESOLVED_SENTINEL: u32 = 0;

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Value `get_file_address` returns for an unmapped RVA.
    pub unresolved_sentinel: u32,
    /// Log overlapping runs at `debug` when the resolver is built. Costs an
    /// O(n log n) sweep, skipped unless `debug` is enabled.
    pub report_overlaps: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            unresolved_sentinel: DEFAULT_UNRESOLVED_SENTINEL,
            report_overlaps: false,
        }
    }
}

impl ResolverConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let trimmed = json.trim();
        if trimmed.is_empty() {
            return Err(ResolverError::InvalidConfig(
                "empty configuration".to_string(),
            ));
        }
        Ok(serde_json::from_str(trimmed)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
