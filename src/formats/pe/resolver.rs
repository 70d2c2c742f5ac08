//! RVA to file offset resolution
//!
//! Sections are mapped by the loader at virtual addresses that need not
//! match their position in the file, while pointers inside the image are
//! always RVAs. The resolver is built once from the section table and turns
//! those pointers back into file offsets.

use std::ops::Range;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace, Level};

use crate::config::ResolverConfig;
use crate::error::{ResolverError, Result};
use crate::formats::pe::types::{Run, SectionDescriptor};

/// Virtual address to file offset map for one loaded image.
///
/// Runs keep the order the sections were supplied in. Overlap is allowed and
/// resolved in favor of the earliest run. Lookups are a linear scan; images
/// carry few enough sections that an index would not pay for itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RvaResolver {
    runs: Vec<Run>,
    sentinel: u32,
}

impl Default for RvaResolver {
    fn default() -> Self {
        Self {
            runs: Vec::new(),
            sentinel: ResolverConfig::default().unresolved_sentinel,
        }
    }
}

impl RvaResolver {
    /// Build a resolver with the default configuration.
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: SectionDescriptor,
    {
        Self::with_config(sections, &ResolverConfig::default())
    }

    /// Build a resolver from the image's sections, in section-table order.
    ///
    /// Sections with no raw data produce no run. Nothing is validated:
    /// address overflow wraps and overlapping sections are kept as-is.
    pub fn with_config<I, S>(sections: I, config: &ResolverConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: SectionDescriptor,
    {
        let mut section_count = 0usize;
        let mut runs = Vec::new();

        for section in sections {
            section_count += 1;
            match Run::from_section(&section) {
                Some(run) => runs.push(run),
                None => trace!(
                    rva = section.virtual_address(),
                    "skipping section without raw data"
                ),
            }
        }

        let resolver = Self {
            runs,
            sentinel: config.unresolved_sentinel,
        };

        if config.report_overlaps && tracing::enabled!(Level::DEBUG) {
            for (first, second) in resolver.adjacent_overlaps() {
                debug!(
                    first = %resolver.runs[first],
                    second = %resolver.runs[second],
                    "overlapping sections, earlier run wins"
                );
            }
        }

        debug!(
            sections = section_count,
            runs = resolver.runs.len(),
            "built RVA resolver"
        );
        resolver
    }

    /// Translate an RVA to a file offset.
    ///
    /// Returns the configured sentinel (0 by default) when no run contains
    /// the address, so callers must treat that value as "unresolved".
    #[inline]
    pub fn get_file_address(&self, rva: u32) -> u32 {
        self.file_address(rva).unwrap_or(self.sentinel)
    }

    /// Translate an RVA to a file offset, `None` if it is unmapped.
    #[inline]
    pub fn file_address(&self, rva: u32) -> Option<u32> {
        self.run_containing(rva).map(|run| run.translate(rva))
    }

    /// Translate an RVA to a file offset, erroring if it is unmapped.
    pub fn resolve(&self, rva: u32) -> Result<u32> {
        self.file_address(rva)
            .ok_or(ResolverError::UnmappedAddress { rva })
    }

    /// The run a lookup of `rva` would use.
    pub fn run_containing(&self, rva: u32) -> Option<&Run> {
        self.runs.iter().find(|run| run.contains(rva))
    }

    /// File byte range holding `[rva, rva + len)`.
    ///
    /// The whole span must fall inside the run that `rva` resolves through;
    /// spans that run off its end are not stitched across neighbours.
    pub fn file_range(&self, rva: u32, len: u32) -> Option<Range<usize>> {
        let run = self.run_containing(rva)?;
        let available = run.virtual_end() - rva;
        if len > available {
            return None;
        }

        // Spans whose file offsets would wrap have no contiguous file range
        let start = run.translate(rva);
        let end = start.checked_add(len)?;
        Some(start as usize..end as usize)
    }

    /// Like `file_range`, erroring if the span is not fully mapped.
    pub fn resolve_range(&self, rva: u32, len: u32) -> Result<Range<usize>> {
        self.file_range(rva, len)
            .ok_or(ResolverError::UnmappedRange { rva, len })
    }

    /// Batch lookup; element `i` is `get_file_address(rvas[i])`.
    pub fn get_file_addresses(&self, rvas: &[u32]) -> Vec<u32> {
        rvas.par_iter()
            .map(|&rva| self.get_file_address(rva))
            .collect()
    }

    /// Index pairs `(i, j)` with `i < j` of runs whose intervals intersect.
    pub fn overlapping_runs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, run) in self.runs.iter().enumerate() {
            for (j, other) in self.runs.iter().enumerate().skip(i + 1) {
                if run.overlaps(other) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Overlapping pairs among runs that are neighbours once sorted by start
    /// address, as `(i, j)` with `i < j` in construction order.
    ///
    /// O(n log n). Empty exactly when `overlapping_runs` is, but reports at
    /// most one pair per neighbour instead of every intersecting pair.
    pub(crate) fn adjacent_overlaps(&self) -> Vec<(usize, usize)> {
        let mut order: Vec<usize> = (0..self.runs.len())
            .filter(|&i| !self.runs[i].is_empty())
            .collect();
        order.sort_by_key(|&i| (self.runs[i].virtual_address(), i));

        order
            .windows(2)
            .filter(|pair| self.runs[pair[0]].overlaps(&self.runs[pair[1]]))
            .map(|pair| (pair[0].min(pair[1]), pair[0].max(pair[1])))
            .collect()
    }

    /// Runs in construction order.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Value returned by `get_file_address` on a miss.
    pub fn sentinel(&self) -> u32 {
        self.sentinel
    }
}
