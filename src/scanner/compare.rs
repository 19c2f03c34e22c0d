//! Byte-for-byte file comparison.
//!
//! [`ByteComparator`] streams both files through fixed-size buffers and stops
//! at the first differing chunk. Files whose lengths differ are rejected from
//! metadata alone, without reading any content.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::{FileAccessError, FileOperation};

/// Default read buffer for content comparison (64 KiB per file).
pub const COMPARE_BUFFER_SIZE: usize = 64 * 1024;

/// Decides whether two files have identical byte content.
pub trait ContentComparator: Send + Sync {
    /// Return `true` if the files at `a` and `b` hold the same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FileAccessError`] with [`FileOperation::Compare`] naming
    /// whichever path could not be opened or read.
    fn files_equal(&self, a: &Path, b: &Path) -> Result<bool, FileAccessError>;
}

/// Streaming byte comparator.
#[derive(Debug, Clone)]
pub struct ByteComparator {
    buffer_size: usize,
}

impl Default for ByteComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteComparator {
    /// Create a comparator with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: COMPARE_BUFFER_SIZE,
        }
    }

    /// Set the per-file read buffer size (minimum 1 byte).
    #[cfg(test)]
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    fn open(path: &Path) -> Result<(BufReader<File>, u64), FileAccessError> {
        let access = |e| FileAccessError::new(path, FileOperation::Compare, e);
        let file = File::open(path).map_err(access)?;
        let len = file.metadata().map_err(access)?.len();
        Ok((BufReader::new(file), len))
    }
}

impl ContentComparator for ByteComparator {
    fn files_equal(&self, a: &Path, b: &Path) -> Result<bool, FileAccessError> {
        let (mut reader_a, len_a) = Self::open(a)?;
        let (mut reader_b, len_b) = Self::open(b)?;

        if len_a != len_b {
            log::trace!(
                "Length mismatch {} ({}) vs {} ({})",
                a.display(),
                len_a,
                b.display(),
                len_b
            );
            return Ok(false);
        }

        let mut buf_a = vec![0u8; self.buffer_size];
        let mut buf_b = vec![0u8; self.buffer_size];

        loop {
            let n_a = fill(&mut reader_a, &mut buf_a)
                .map_err(|e| FileAccessError::new(a, FileOperation::Compare, e))?;
            let n_b = fill(&mut reader_b, &mut buf_b)
                .map_err(|e| FileAccessError::new(b, FileOperation::Compare, e))?;

            if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
                return Ok(false);
            }
            if n_a == 0 {
                return Ok(true);
            }
        }
    }
}

/// Read until `buf` is full or EOF; returns the number of bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
