//! Directory walker implementation using jwalk for parallel traversal.
//!
//! # Overview
//!
//! [`Walker`] enumerates every regular file beneath a root directory and
//! yields each path at most once. The order is deterministic (children are
//! sorted per directory) but the indexer imposes its own canonical order
//! anyway, so callers must not rely on it.
//!
//! Empty files are included: two empty files are content duplicates.
//!
//! # Example
//!
//! ```no_run
//! use dupecount::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let outcome = walker.collect();
//! println!("Found {} files ({} errors)", outcome.files.len(), outcome.errors.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::WalkDir;

use super::{FileRecord, ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

/// Everything a finished walk produced.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Files that passed every filter
    pub files: Vec<FileRecord>,
    /// Non-fatal errors encountered along the way
    pub errors: Vec<ScanError>,
}

impl WalkOutcome {
    /// Paths of the discovered files, in walk order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Directory walker for parallel file discovery.
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given root directory.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            progress_callback: None,
        }
    }

    /// Report discovered files to a progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Validate that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] or [`ScanError::NotADirectory`].
    pub fn validate_root(&self) -> Result<(), ScanError> {
        if !self.root.exists() {
            return Err(ScanError::NotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }
        Ok(())
    }

    /// Build the ignore matcher from the configured patterns only.
    ///
    /// `.gitignore` files in the tree are not consulted.
    fn build_gitignore(&self) -> Option<Gitignore> {
        let mut builder = GitignoreBuilder::new(&self.root);

        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if gitignore.is_empty() => None,
            Ok(gitignore) => Some(gitignore),
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Match `path` (or any of its parents below the root) against the ignore set.
    fn should_ignore(&self, path: &Path, gitignore: Option<&Gitignore>) -> bool {
        let Some(gi) = gitignore else {
            return false;
        };
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        gi.matched_path_or_any_parents(relative, false).is_ignore()
    }

    fn passes_size_filter(&self, size: u64) -> bool {
        self.config.min_size.is_none_or(|min| size >= min)
            && self.config.max_size.is_none_or(|max| size <= max)
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let gitignore = self.build_gitignore();

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(self.config.skip_hidden)
            .process_read_dir(|_depth, _path, _read_dir_state, children| {
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        walk_dir.into_iter().filter_map(move |entry_result| match entry_result {
            Ok(entry) => {
                let path = entry.path();
                let file_type = entry.file_type();

                if file_type.is_dir() {
                    return None;
                }
                if file_type.is_symlink() && !self.config.follow_symlinks {
                    log::trace!("Skipping symlink: {}", path.display());
                    return None;
                }
                if self.should_ignore(&path, gitignore.as_ref()) {
                    log::trace!("Ignoring file: {}", path.display());
                    return None;
                }

                let metadata = match std::fs::metadata(&path) {
                    Ok(m) => m,
                    Err(e) => return Some(Err(Self::io_error(&path, e))),
                };
                if !metadata.is_file() {
                    return None;
                }

                let size = metadata.len();
                if !self.passes_size_filter(size) {
                    log::trace!("Skipping {} due to size filter ({})", path.display(), size);
                    return None;
                }

                Some(Ok(FileRecord::new(path, size)))
            }
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| self.root.clone(), Path::to_path_buf);
                log::debug!("Walker error for {}: {}", path.display(), e);
                Some(Err(ScanError::Io {
                    path,
                    source: std::io::Error::other(e.to_string()),
                }))
            }
        })
    }

    /// Walk to completion, splitting files from errors.
    ///
    /// Errors are logged as warnings; they never abort enumeration.
    #[must_use]
    pub fn collect(&self) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("walking", 0);
        }

        for result in self.walk() {
            match result {
                Ok(file) => {
                    if let Some(ref callback) = self.progress_callback {
                        callback.on_progress(outcome.files.len() + 1, &file.path.to_string_lossy());
                    }
                    outcome.files.push(file);
                }
                Err(e) => {
                    log::warn!("{}", e);
                    outcome.errors.push(e);
                }
            }
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("walking");
        }

        log::info!(
            "Found {} files under {} ({} errors)",
            outcome.files.len(),
            self.root.display(),
            outcome.errors.len()
        );
        outcome
    }

    /// Walk to completion and return only the discovered paths.
    #[must_use]
    pub fn collect_paths(&self) -> Vec<PathBuf> {
        self.collect().paths()
    }

    fn io_error(path: &Path, error: std::io::Error) -> ScanError {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => {
                log::debug!("File vanished during walk: {}", path.display());
                ScanError::NotFound(path.to_path_buf())
            }
            _ => ScanError::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
