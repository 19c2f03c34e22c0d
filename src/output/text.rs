//! Plain-text report.
//!
//! The layout follows the classic report this tool has always printed:
//!
//! ```text
//! Number of files found: 4
//! The file with the most duplicates is:
//! ./smallset/A
//! Here are its 2 copies:
//! ./smallset/C
//! ./smallset/D
//!
//! The most disk space (10 B) could be recovered, by deleting copies of this file:
//! ./smallset/A
//! Here are its 2 copies:
//! ./smallset/C
//! ./smallset/D
//!
//! Runtime: 0.01 secs
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use bytesize::ByteSize;
use yansi::Paint;

use crate::duplicates::Strategy;
use crate::report::{Report, Summary};

/// Writes the text report.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput {
    color: bool,
}

impl TextOutput {
    /// Create a text writer; `color` enables ANSI styling.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn representative(&self, path: &std::path::Path) -> String {
        let shown = path.display().to_string();
        if self.color {
            shown.green().to_string()
        } else {
            shown
        }
    }

    /// Write the enumeration count line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_file_count<W: Write>(&self, writer: &mut W, count: usize) -> io::Result<()> {
        writeln!(writer, "Number of files found: {count}")
    }

    /// Write the heading that precedes one strategy's report in comparison mode.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_strategy_heading<W: Write>(
        &self,
        writer: &mut W,
        strategy: Strategy,
    ) -> io::Result<()> {
        let label = match strategy {
            Strategy::Direct => "Direct comparison:",
            Strategy::Hashed => ".. and now with hash-assisted search:",
        };
        writeln!(writer, "{}", self.heading(label))
    }

    /// Write both summaries of `report`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_report<W: Write>(&self, writer: &mut W, report: &Report) -> io::Result<()> {
        writeln!(
            writer,
            "{}",
            self.heading("The file with the most duplicates is:")
        )?;
        self.write_summary(writer, &report.most_duplicated)?;
        writeln!(writer)?;

        let space = format!(
            "The most disk space ({}) could be recovered, by deleting copies of this file:",
            ByteSize::b(report.most_reclaimable.reclaimable_bytes)
        );
        writeln!(writer, "{}", self.heading(&space))?;
        self.write_summary(writer, &report.most_reclaimable)?;
        writeln!(writer)
    }

    fn write_summary<W: Write>(&self, writer: &mut W, summary: &Summary) -> io::Result<()> {
        writeln!(writer, "{}", self.representative(&summary.representative))?;
        writeln!(writer, "Here are its {} copies:", summary.duplicate_count)?;
        for copy in &summary.duplicates {
            writeln!(writer, "{}", copy.display())?;
        }
        Ok(())
    }

    /// Write the empty-result message.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_no_duplicates<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let message = "Error: Empty file dictionary found.";
        if self.color {
            writeln!(writer, "{}", message.yellow())
        } else {
            writeln!(writer, "{message}")
        }
    }

    /// Write the elapsed time of one strategy run.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_runtime<W: Write>(&self, writer: &mut W, elapsed: Duration) -> io::Result<()> {
        writeln!(writer, "Runtime: {:.2} secs", elapsed.as_secs_f64())
    }

    /// Write the disagreement between two strategies' mappings.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_mismatch<W: Write>(&self, writer: &mut W, keys: &[PathBuf]) -> io::Result<()> {
        let message = format!("Strategies disagree on {} file(s):", keys.len());
        if self.color {
            writeln!(writer, "{}", message.red().bold())?;
        } else {
            writeln!(writer, "{message}")?;
        }
        for key in keys {
            writeln!(writer, "  {}", key.display())?;
        }
        Ok(())
    }
}
