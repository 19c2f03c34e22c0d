//! Duplicate indexer: partitions a file list into a [`DuplicateMapping`].
//!
//! # Overview
//!
//! Two interchangeable strategies share one contract:
//!
//! 1. **Direct** ([`Strategy::Direct`]): sort the paths into canonical order
//!    and compare every path at position `i` with every path at positions
//!    `i+1 ..= n-1` using a [`ContentComparator`]. O(n²) comparisons, each
//!    O(file size).
//! 2. **Hash-assisted** ([`Strategy::Hashed`]): compute one digest per path
//!    (O(n) hashes), then run the same sweep comparing digests, which is O(1)
//!    per pair. When the digest is not collision resistant, or paranoid mode
//!    is on, each digest match is confirmed with the comparator.
//!
//! The sweep always runs through the last sorted position inclusive, so the
//! final file participates in every group it belongs to.
//!
//! Both passes run on a bounded rayon pool. Each anchor index owns its own
//! duplicate list and results are assembled in index order, so the mapping
//! is identical to a sequential run. Any [`FileAccessError`] aborts the run:
//! workers stop before their next hash or comparison, and the error reported
//! is the lowest-index failure among the work that ran.
//!
//! # Example
//!
//! ```no_run
//! use dupecount::duplicates::{DuplicateIndexer, IndexerConfig, Strategy};
//! use std::path::PathBuf;
//!
//! let paths = vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")];
//! let indexer = DuplicateIndexer::new(IndexerConfig::default().with_strategy(Strategy::Direct));
//! let mapping = indexer.index(paths).unwrap();
//! println!("{} files indexed", mapping.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::DuplicateMapping;
use crate::progress::ProgressCallback;
use crate::scanner::{
    hash_to_hex, ByteComparator, ContentComparator, ContentHasher, Digest, FileAccessError, Hasher,
};

/// Which indexing strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Pairwise byte comparison of every pair
    Direct,
    /// One digest per file, then pairwise digest comparison
    #[default]
    Hashed,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Hashed => write!(f, "hashed"),
        }
    }
}

/// Configuration for the indexer.
#[derive(Clone)]
pub struct IndexerConfig {
    /// Strategy used by [`DuplicateIndexer::index`].
    pub strategy: Strategy,
    /// Worker threads for hashing and comparison. Default 4.
    pub io_threads: usize,
    /// Confirm every digest match with a byte comparison.
    pub paranoid: bool,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for IndexerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexerConfig")
            .field("strategy", &self.strategy)
            .field("io_threads", &self.io_threads)
            .field("paranoid", &self.paranoid)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            io_threads: 4,
            paranoid: false,
            progress_callback: None,
        }
    }
}

impl IndexerConfig {
    /// Set the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the worker thread count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Enable or disable paranoid digest verification.
    #[must_use]
    pub fn with_paranoid(mut self, enabled: bool) -> Self {
        self.paranoid = enabled;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Errors that can occur while indexing.
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// A file could not be compared or hashed.
    #[error(transparent)]
    FileAccess(#[from] FileAccessError),

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Partitions file lists into duplicate mappings.
pub struct DuplicateIndexer {
    config: IndexerConfig,
    comparator: Arc<dyn ContentComparator>,
    hasher: Arc<dyn ContentHasher>,
}

impl DuplicateIndexer {
    /// Create an indexer using [`ByteComparator`] and a BLAKE3 [`Hasher`].
    #[must_use]
    pub fn new(config: IndexerConfig) -> Self {
        Self {
            config,
            comparator: Arc::new(ByteComparator::new()),
            hasher: Arc::new(Hasher::new()),
        }
    }

    /// Create an indexer with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(IndexerConfig::default())
    }

    /// Replace the content comparator.
    #[must_use]
    pub fn with_comparator(mut self, comparator: Arc<dyn ContentComparator>) -> Self {
        self.comparator = comparator;
        self
    }

    /// Replace the content hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Arc<dyn ContentHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Index `paths` with the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FileAccess`] naming the first unreadable path.
    pub fn index(
        &self,
        paths: impl IntoIterator<Item = PathBuf>,
    ) -> Result<DuplicateMapping, IndexError> {
        match self.config.strategy {
            Strategy::Direct => self.index_direct(paths),
            Strategy::Hashed => self.index_hashed(paths),
        }
    }

    /// Index by comparing the content of every pair.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FileAccess`] if any comparison fails.
    pub fn index_direct(
        &self,
        paths: impl IntoIterator<Item = PathBuf>,
    ) -> Result<DuplicateMapping, IndexError> {
        let sorted = canonical_order(paths);
        log::info!("Direct indexing of {} files", sorted.len());

        let pool = self.build_pool()?;
        let lists = pool.install(|| {
            self.sweep(&sorted, |i, j| {
                self.comparator.files_equal(&sorted[i], &sorted[j])
            })
        })?;

        Ok(assemble(sorted, lists))
    }

    /// Index by hashing every file once, then comparing digests.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FileAccess`] if any file cannot be hashed, or
    /// cannot be compared during verification.
    pub fn index_hashed(
        &self,
        paths: impl IntoIterator<Item = PathBuf>,
    ) -> Result<DuplicateMapping, IndexError> {
        let sorted = canonical_order(paths);
        let verify = self.config.paranoid || !self.hasher.is_collision_resistant();
        log::info!(
            "Hash-assisted indexing of {} files{}",
            sorted.len(),
            if verify { " (verifying digest matches)" } else { "" }
        );

        let pool = self.build_pool()?;
        let digests = pool.install(|| self.hash_all(&sorted))?;

        let lists = pool.install(|| {
            self.sweep(&sorted, |i, j| {
                if digests[i] != digests[j] {
                    return Ok(false);
                }
                if !verify {
                    return Ok(true);
                }
                let equal = self.comparator.files_equal(&sorted[i], &sorted[j])?;
                if !equal {
                    log::warn!(
                        "Digest collision {} between {} and {}",
                        hash_to_hex(&digests[i]),
                        sorted[i].display(),
                        sorted[j].display()
                    );
                }
                Ok(equal)
            })
        })?;

        Ok(assemble(sorted, lists))
    }

    fn build_pool(&self) -> Result<rayon::ThreadPool, IndexError> {
        Ok(rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads.max(1))
            .build()?)
    }

    /// Compute one digest per path, in parallel.
    fn hash_all(&self, sorted: &[PathBuf]) -> Result<Vec<Digest>, FileAccessError> {
        self.phase_start("hash", sorted.len());
        let done = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);

        let results: Vec<Option<Result<Digest, FileAccessError>>> = sorted
            .par_iter()
            .map(|path| {
                if failed.load(Ordering::Relaxed) {
                    return None;
                }
                let digest = self.hasher.digest(path);
                match digest {
                    Ok(ref d) => log::trace!("{} {}", hash_to_hex(d), path.display()),
                    Err(_) => failed.store(true, Ordering::Relaxed),
                }
                self.item_done(&done, path);
                Some(digest)
            })
            .collect();

        self.phase_end("hash");
        first_failure(results)
    }

    /// For every anchor `i`, collect the indices `j` in `i+1 ..= n-1` that match.
    ///
    /// Once any pair fails, anchors still running stop before their next
    /// comparison and anchors not yet started are skipped.
    fn sweep<F>(&self, sorted: &[PathBuf], is_match: F) -> Result<Vec<Vec<PathBuf>>, FileAccessError>
    where
        F: Fn(usize, usize) -> Result<bool, FileAccessError> + Sync,
    {
        let n = sorted.len();
        self.phase_start("compare", n);
        let done = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);

        let results: Vec<Option<Result<Vec<PathBuf>, FileAccessError>>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut duplicates = Vec::new();
                for j in (i + 1)..n {
                    if failed.load(Ordering::Relaxed) {
                        return None;
                    }
                    match is_match(i, j) {
                        Ok(true) => duplicates.push(sorted[j].clone()),
                        Ok(false) => {}
                        Err(e) => {
                            failed.store(true, Ordering::Relaxed);
                            return Some(Err(e));
                        }
                    }
                }
                self.item_done(&done, &sorted[i]);
                Some(Ok(duplicates))
            })
            .collect();

        self.phase_end("compare");
        first_failure(results)
    }

    fn phase_start(&self, phase: &str, total: usize) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(phase, total);
        }
    }

    fn phase_end(&self, phase: &str) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(phase);
        }
    }

    fn item_done(&self, done: &AtomicUsize, path: &Path) {
        let current = done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_progress(current, path.to_string_lossy().as_ref());
        }
    }
}

/// Unwrap per-index results, returning the lowest-index error if any.
///
/// `None` marks an index skipped after a failure, so it only appears
/// alongside at least one error.
fn first_failure<T>(
    results: Vec<Option<Result<T, FileAccessError>>>,
) -> Result<Vec<T>, FileAccessError> {
    results.into_iter().flatten().collect()
}

/// Sort paths into canonical order and drop repeated entries.
#[must_use]
pub fn canonical_order(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut sorted: Vec<PathBuf> = paths.into_iter().collect();
    sorted.sort();
    sorted.dedup();
    sorted
}

fn assemble(sorted: Vec<PathBuf>, lists: Vec<Vec<PathBuf>>) -> DuplicateMapping {
    let mut mapping = DuplicateMapping::new();
    for (path, duplicates) in sorted.into_iter().zip(lists) {
        if !duplicates.is_empty() {
            log::debug!("{} has {} duplicate(s)", path.display(), duplicates.len());
        }
        mapping.insert(path, duplicates);
    }
    mapping
}
