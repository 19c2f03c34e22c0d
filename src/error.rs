//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::IndexError;
use crate::report::AggregateError;
use crate::scanner::FileAccessError;

/// Process exit codes.
///
/// - 0: Success (duplicates found)
/// - 1: General error (unexpected failure, unreadable file)
/// - 2: No duplicates found (no files, or every file is unique)
/// - 3: The two strategies disagreed in comparison mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and duplicates were found.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Strategy mismatch: direct and hash-assisted mappings differ.
    StrategyMismatch = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DC000",
            Self::GeneralError => "DC001",
            Self::NoDuplicates => "DC002",
            Self::StrategyMismatch => "DC003",
        }
    }
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DC001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its context chain
    pub message: String,
    /// Path of the file that could not be read, when known
    pub path: Option<String>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        let path = file_access_error(err).map(|e| e.path.display().to_string());

        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            path,
        }
    }
}

/// The [`FileAccessError`] somewhere in `err`'s cause chain, if any.
///
/// Indexing and aggregation errors wrap it transparently, so each wrapper
/// is unpacked explicitly.
#[must_use]
pub fn file_access_error(err: &anyhow::Error) -> Option<&FileAccessError> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<FileAccessError>() {
            return Some(e);
        }
        match cause.downcast_ref::<IndexError>() {
            Some(IndexError::FileAccess(e)) => return Some(e),
            Some(_) => return None,
            None => {}
        }
        match cause.downcast_ref::<AggregateError>() {
            Some(AggregateError::FileAccess(e)) => Some(e),
            _ => None,
        }
    })
}
