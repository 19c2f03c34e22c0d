//! JSON output formatter for scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "generated_at": "2024-01-01T00:00:00Z",
//!   "root": "./smallset",
//!   "total_files": 4,
//!   "runs": [
//!     {
//!       "strategy": "hashed",
//!       "runtime_ms": 12,
//!       "groups": [
//!         { "representative": "./smallset/A", "duplicates": ["./smallset/C", "./smallset/D"] }
//!       ]
//!     }
//!   ],
//!   "report": {
//!     "most_duplicated": { "representative": "./smallset/A", "duplicate_count": 2, ... },
//!     "most_reclaimable": { ... },
//!     "total_files": 4
//!   },
//!   "summary": {
//!     "strategies_agree": null,
//!     "exit_code": 0,
//!     "exit_code_name": "DC000"
//!   }
//! }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duplicates::{DuplicateGroup, DuplicateMapping, Strategy};
use crate::error::ExitCode;
use crate::report::Report;

/// One complete content group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// Earliest member in canonical order
    pub representative: PathBuf,
    /// Every other member
    pub duplicates: Vec<PathBuf>,
}

impl From<DuplicateGroup> for JsonGroup {
    fn from(group: DuplicateGroup) -> Self {
        Self {
            representative: group.representative,
            duplicates: group.duplicates,
        }
    }
}

/// One strategy's result.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRun {
    /// Strategy name (`direct` or `hashed`)
    pub strategy: String,
    /// Wall-clock time of indexing in milliseconds
    pub runtime_ms: u64,
    /// Distinct groups with two or more members
    pub groups: Vec<JsonGroup>,
}

/// Outcome fields.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Whether both strategies produced the same mapping; `null` when only one ran
    pub strategies_agree: Option<bool>,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DC000")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// When this output was produced
    pub generated_at: DateTime<Utc>,
    /// Directory that was scanned
    pub root: PathBuf,
    /// Number of files enumerated
    pub total_files: usize,
    /// One entry per strategy that ran
    pub runs: Vec<JsonRun>,
    /// Headline summaries; `null` when no files were found
    pub report: Option<Report>,
    /// Outcome
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create an output for a scan of `root` that found `total_files` files.
    ///
    /// # Example
    ///
    /// ```
    /// use dupecount::output::json::JsonOutput;
    /// use std::path::Path;
    ///
    /// let output = JsonOutput::new(Path::new("."), 0);
    /// assert!(output.runs.is_empty());
    /// assert!(output.report.is_none());
    /// ```
    #[must_use]
    pub fn new(root: &Path, total_files: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            root: root.to_path_buf(),
            total_files,
            runs: Vec::new(),
            report: None,
            summary: JsonSummary {
                strategies_agree: None,
                exit_code: ExitCode::Success.as_i32(),
                exit_code_name: ExitCode::Success.code_prefix().to_string(),
            },
        }
    }

    /// Append a strategy run.
    #[must_use]
    pub fn with_run(
        mut self,
        strategy: Strategy,
        mapping: &DuplicateMapping,
        elapsed: Duration,
    ) -> Self {
        self.runs.push(JsonRun {
            strategy: strategy.to_string(),
            runtime_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            groups: mapping.groups().into_iter().map(JsonGroup::from).collect(),
        });
        self
    }

    /// Attach the aggregated report.
    #[must_use]
    pub fn with_report(mut self, report: Report) -> Self {
        self.report = Some(report);
        self
    }

    /// Record whether two strategies agreed.
    #[must_use]
    pub fn with_agreement(mut self, agree: bool) -> Self {
        self.summary.strategies_agree = Some(agree);
        self
    }

    /// Record the exit code of this run.
    #[must_use]
    pub fn with_exit_code(mut self, exit_code: ExitCode) -> Self {
        self.summary.exit_code = exit_code.as_i32();
        self.summary.exit_code_name = exit_code.code_prefix().to_string();
        self
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is not valid UTF-8.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is not valid UTF-8.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The writer to output to (e.g., stdout)
    /// * `pretty` - Whether to pretty-print the output
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
