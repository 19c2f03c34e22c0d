//! Scanner module for directory traversal, content comparison and hashing.
//!
//! This module provides the collaborators the duplicate indexer calls into:
//! - [`walker`]: Directory traversal producing a flat list of file paths
//! - [`compare`]: Byte-for-byte content comparison of two files
//! - [`hasher`]: Fixed-length content digests (BLAKE3 or SHA-256)
//! - [`SizeLookup`]: File size queries used at report time
//!
//! Each collaborator sits behind a small trait so the indexer and the
//! aggregator can be driven by in-memory fakes in tests.
//!
//! # Example
//!
//! ```no_run
//! use dupecount::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod compare;
pub mod hasher;
pub mod walker;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use compare::{ByteComparator, ContentComparator};
pub use hasher::{hash_to_hex, ContentHasher, Digest, DigestAlgorithm, Hasher};
pub use walker::Walker;

/// A file discovered during enumeration.
///
/// Identity is the path; the size is informational and is looked up again
/// through [`SizeLookup`] when a report is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes at enumeration time
    pub size: u64,
}

impl FileRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Symlink cycles are not detected.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,

    /// Maximum file size to include (in bytes).
    pub max_size: Option<u64>,

    /// Glob patterns to ignore (gitignore-style).
    pub ignore_patterns: Vec<String>,
}

/// The file operation that was being performed when access failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    /// Byte-for-byte comparison of two files
    Compare,
    /// Content digest computation
    Hash,
    /// File size lookup
    Size,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare => write!(f, "compare"),
            Self::Hash => write!(f, "hash"),
            Self::Size => write!(f, "size"),
        }
    }
}

/// A file could not be read while comparing, hashing or sizing it.
///
/// Always names the offending path and the operation. Any such error
/// aborts the current indexing run.
#[derive(thiserror::Error, Debug)]
#[error("Cannot {operation} {path}: {source}")]
pub struct FileAccessError {
    /// Path that could not be accessed
    pub path: PathBuf,
    /// Operation that failed
    pub operation: FileOperation,
    /// The underlying I/O error
    #[source]
    pub source: std::io::Error,
}

impl FileAccessError {
    /// Create a new access error for `path`.
    #[must_use]
    pub fn new(path: &Path, operation: FileOperation, source: std::io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            operation,
            source,
        }
    }

    /// Kind of the underlying I/O error.
    #[must_use]
    pub fn kind(&self) -> std::io::ErrorKind {
        self.source.kind()
    }
}

/// Looks up file sizes for reporting.
pub trait SizeLookup: Send + Sync {
    /// Size of the file at `path` in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FileAccessError`] with [`FileOperation::Size`] if the file
    /// cannot be stat'ed.
    fn size_of(&self, path: &Path) -> Result<u64, FileAccessError>;
}

/// [`SizeLookup`] backed by filesystem metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSizeLookup;

impl SizeLookup for FsSizeLookup {
    fn size_of(&self, path: &Path) -> Result<u64, FileAccessError> {
        std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| FileAccessError::new(path, FileOperation::Size, e))
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
