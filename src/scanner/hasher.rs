//! Content hasher with streaming and memory-mapped modes.
//!
//! # Overview
//!
//! [`Hasher`] computes a 32-byte [`Digest`] of a file's full content using
//! either BLAKE3 (default) or SHA-256. Both are collision resistant, so the
//! hash-assisted indexing strategy may treat digest equality as content
//! equality unless paranoid mode is enabled.
//!
//! Files at or above the memory-map threshold are hashed with BLAKE3's
//! multi-threaded mmap path; everything else is streamed through a buffer.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use super::{FileAccessError, FileOperation};

/// A fixed-length content digest.
pub type Digest = [u8; 32];

/// Streaming read buffer size.
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Files at or above this size use the mmap path when enabled (16 MiB).
pub const DEFAULT_MMAP_THRESHOLD: u64 = 16 * 1024 * 1024;

/// Digest function used by [`Hasher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// BLAKE3 (fast, parallel, cryptographic)
    #[default]
    Blake3,
    /// SHA-256
    Sha256,
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blake3 => write!(f, "blake3"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Produces content digests for files.
pub trait ContentHasher: Send + Sync {
    /// Digest of the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FileAccessError`] with [`FileOperation::Hash`] if the file
    /// cannot be opened or read.
    fn digest(&self, path: &Path) -> Result<Digest, FileAccessError>;

    /// Whether equal digests may be trusted as equal content.
    ///
    /// Hashers returning `false` cause the indexer to confirm every digest
    /// match with a byte comparison.
    fn is_collision_resistant(&self) -> bool {
        true
    }
}

/// File hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: DigestAlgorithm,
    mmap_enabled: bool,
    mmap_threshold: u64,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a BLAKE3 hasher with mmap enabled above the default threshold.
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: DigestAlgorithm::Blake3,
            mmap_enabled: true,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
        }
    }

    /// Select the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Enable or disable memory-mapped hashing.
    #[cfg(test)]
    #[must_use]
    pub fn with_mmap(mut self, enabled: bool) -> Self {
        self.mmap_enabled = enabled;
        self
    }

    /// Set the size at which memory-mapped hashing kicks in.
    #[cfg(test)]
    #[must_use]
    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }

    /// The configured digest algorithm.
    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Hash the entire content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`FileAccessError`] naming `path` if it cannot be read.
    pub fn full_hash(&self, path: &Path) -> Result<Digest, FileAccessError> {
        let access = |e| FileAccessError::new(path, FileOperation::Hash, e);
        let file = File::open(path).map_err(access)?;

        match self.algorithm {
            DigestAlgorithm::Blake3 => {
                let len = file.metadata().map_err(access)?.len();
                if self.mmap_enabled && len >= self.mmap_threshold {
                    log::trace!("Hashing {} via mmap ({} bytes)", path.display(), len);
                    drop(file);
                    let mut hasher = blake3::Hasher::new();
                    hasher.update_mmap_rayon(path).map_err(access)?;
                    return Ok(*hasher.finalize().as_bytes());
                }
                let mut hasher = blake3::Hasher::new();
                stream(file, |chunk| {
                    hasher.update(chunk);
                })
                .map_err(access)?;
                Ok(*hasher.finalize().as_bytes())
            }
            DigestAlgorithm::Sha256 => {
                let mut hasher = sha2::Sha256::new();
                stream(file, |chunk| hasher.update(chunk)).map_err(access)?;
                let mut digest = [0u8; 32];
                digest.copy_from_slice(&hasher.finalize());
                Ok(digest)
            }
        }
    }
}

impl ContentHasher for Hasher {
    fn digest(&self, path: &Path) -> Result<Digest, FileAccessError> {
        self.full_hash(path)
    }
}

/// Feed the whole of `file` to `update` in buffer-sized chunks.
fn stream<F: FnMut(&[u8])>(mut file: File, mut update: F) -> io::Result<()> {
    let mut buf = vec![0u8; HASH_BUFFER_SIZE];
    loop {
        match file.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => update(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Render a digest as lowercase hexadecimal (64 characters).
#[must_use]
pub fn hash_to_hex(hash: &Digest) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}
