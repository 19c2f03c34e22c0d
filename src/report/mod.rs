//! Report types derived from a [`DuplicateMapping`](crate::duplicates::DuplicateMapping).
//!
//! The [`aggregator`] computes both headline summaries in a single pass:
//! the key with the most duplicates, and the key whose duplicates waste the
//! most bytes. Everything here is plain serializable data; rendering lives
//! in [`crate::output`].

pub mod aggregator;

use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::FileAccessError;

pub use aggregator::ReportAggregator;

/// One key of the mapping, with the figures a report needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// The mapping key this summary describes
    pub representative: PathBuf,
    /// Its content-identical successors
    pub duplicates: Vec<PathBuf>,
    /// Length of `duplicates`
    pub duplicate_count: usize,
    /// Size of the representative in bytes
    pub file_size: u64,
    /// `file_size × duplicate_count`, saturating
    pub reclaimable_bytes: u64,
}

/// The two headline summaries of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Key with the longest duplicate list
    pub most_duplicated: Summary,
    /// Key with the largest reclaimable byte count
    pub most_reclaimable: Summary,
    /// Number of keys in the aggregated mapping
    pub total_files: usize,
}

impl Report {
    /// Whether the report found any duplicate at all.
    ///
    /// When every list is empty both summaries still name a key, with a
    /// duplicate count of zero.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.most_duplicated.duplicate_count > 0
    }
}

/// Errors that can occur while aggregating a mapping.
#[derive(thiserror::Error, Debug)]
pub enum AggregateError {
    /// The mapping had no keys at all.
    #[error("Empty file dictionary found")]
    NoDuplicatesFound,

    /// A representative's size could not be looked up.
    #[error(transparent)]
    FileAccess(#[from] FileAccessError),
}
