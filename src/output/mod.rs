//! Output formatters for scan results.
//!
//! This module provides two output formats:
//! - [`text`]: the human-readable report (most duplicated file, most
//!   reclaimable file, runtimes)
//! - [`json`]: machine-readable output for scripting and automation
//!
//! # Example
//!
//! ```no_run
//! use dupecount::duplicates::DuplicateIndexer;
//! use dupecount::output::TextOutput;
//! use dupecount::report::ReportAggregator;
//! use std::path::PathBuf;
//!
//! let mapping = DuplicateIndexer::with_defaults()
//!     .index(vec![PathBuf::from("a"), PathBuf::from("b")])
//!     .unwrap();
//! let report = ReportAggregator::new().aggregate(&mapping).unwrap();
//!
//! let mut stdout = std::io::stdout();
//! TextOutput::new(false).write_report(&mut stdout, &report).unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
