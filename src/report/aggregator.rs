//! Single-pass selection of the most duplicated and most reclaimable keys.
//!
//! Ties are broken in favour of the key that comes first in the mapping's
//! iteration order: a later key only replaces the current leader when its
//! figure is strictly greater.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{AggregateError, Report, Summary};
use crate::duplicates::DuplicateMapping;
use crate::scanner::{FsSizeLookup, SizeLookup};

/// Builds a [`Report`] from a [`DuplicateMapping`].
pub struct ReportAggregator {
    sizes: Arc<dyn SizeLookup>,
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Running leader for one of the two rankings.
struct Leader<'a> {
    key: &'a Path,
    duplicates: &'a [PathBuf],
    size: u64,
    reclaimable: u64,
}

impl Leader<'_> {
    fn into_summary(self) -> Summary {
        Summary {
            representative: self.key.to_path_buf(),
            duplicates: self.duplicates.to_vec(),
            duplicate_count: self.duplicates.len(),
            file_size: self.size,
            reclaimable_bytes: self.reclaimable,
        }
    }
}

impl ReportAggregator {
    /// Create an aggregator that reads sizes from the filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sizes: Arc::new(FsSizeLookup),
        }
    }

    /// Replace the size lookup.
    #[must_use]
    pub fn with_size_lookup(mut self, sizes: Arc<dyn SizeLookup>) -> Self {
        self.sizes = sizes;
        self
    }

    /// Compute both summaries in one pass over `mapping`.
    ///
    /// The mapping is only read.
    ///
    /// # Errors
    ///
    /// - [`AggregateError::NoDuplicatesFound`] if `mapping` has no keys
    /// - [`AggregateError::FileAccess`] if a key's size cannot be looked up
    pub fn aggregate(&self, mapping: &DuplicateMapping) -> Result<Report, AggregateError> {
        let mut most_duplicated: Option<Leader<'_>> = None;
        let mut most_reclaimable: Option<Leader<'_>> = None;

        for (key, duplicates) in mapping.iter() {
            let size = self.sizes.size_of(key)?;
            let reclaimable = size.saturating_mul(duplicates.len() as u64);

            if most_duplicated
                .as_ref()
                .is_none_or(|best| duplicates.len() > best.duplicates.len())
            {
                most_duplicated = Some(Leader {
                    key,
                    duplicates,
                    size,
                    reclaimable,
                });
            }

            if most_reclaimable
                .as_ref()
                .is_none_or(|best| reclaimable > best.reclaimable)
            {
                most_reclaimable = Some(Leader {
                    key,
                    duplicates,
                    size,
                    reclaimable,
                });
            }
        }

        let (Some(most_duplicated), Some(most_reclaimable)) = (most_duplicated, most_reclaimable)
        else {
            return Err(AggregateError::NoDuplicatesFound);
        };

        let report = Report {
            most_duplicated: most_duplicated.into_summary(),
            most_reclaimable: most_reclaimable.into_summary(),
            total_files: mapping.len(),
        };
        log::debug!(
            "Most duplicated: {} ({}); most reclaimable: {} ({} bytes)",
            report.most_duplicated.representative.display(),
            report.most_duplicated.duplicate_count,
            report.most_reclaimable.representative.display(),
            report.most_reclaimable.reclaimable_bytes
        );
        Ok(report)
    }
}
