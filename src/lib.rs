//! dupecount - duplicate file finder and reporter
//!
//! Finds files with identical content anywhere below a directory and reports
//! the file with the most copies and the file whose copies waste the most
//! disk space. Two indexing strategies are available: direct pairwise byte
//! comparison, and hash-assisted comparison (one digest per file). Both can
//! be run side by side to compare their runtimes.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod report;
pub mod scanner;

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateIndexer, DuplicateMapping, Strategy};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback};
use crate::report::{AggregateError, Report, ReportAggregator};
use crate::scanner::{Hasher, Walker};

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if the root cannot be scanned, a file cannot be read
/// during indexing or reporting, or output cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Scan(ref args) => {
            let config = Config::load(cli.config.as_deref())?.merge_scan_args(args);
            let stdout = io::stdout();
            let options = ScanOptions {
                color: !cli.no_color && stdout.is_terminal(),
                progress: !cli.quiet && config.output == OutputFormat::Text,
            };
            let mut handle = stdout.lock();
            run_scan(&args.path, &config, options, &mut handle)
        }
        Commands::InitConfig { force } => init_config(cli.config.as_deref(), force),
    }
}

/// Presentation switches for [`run_scan`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Style the text report with ANSI colors
    pub color: bool,
    /// Show progress bars on stderr
    pub progress: bool,
}

/// One indexing run and its report.
struct StrategyRun {
    strategy: Strategy,
    mapping: DuplicateMapping,
    report: Option<Report>,
    elapsed: Duration,
}

/// Enumerate `root`, index with each configured strategy, and write the report.
///
/// # Errors
///
/// Returns an error if `root` is not a readable directory, any file fails
/// to compare, hash or size, or writing to `out` fails.
pub fn run_scan<W: Write>(
    root: &Path,
    config: &Config,
    options: ScanOptions,
    out: &mut W,
) -> Result<ExitCode> {
    let progress: Option<Arc<dyn ProgressCallback>> = options
        .progress
        .then(|| Arc::new(Progress::new(false)) as Arc<dyn ProgressCallback>);

    let mut walker = Walker::new(root, config.walker_config());
    if let Some(ref callback) = progress {
        walker = walker.with_progress_callback(callback.clone());
    }
    walker
        .validate_root()
        .with_context(|| format!("Cannot scan {}", root.display()))?;
    let paths = walker.collect_paths();

    let text = TextOutput::new(options.color);
    if config.output == OutputFormat::Text {
        text.write_file_count(out, paths.len())?;
    }

    let strategies = config.strategy.strategies();
    let comparing = strategies.len() > 1;
    let hasher = Arc::new(Hasher::new().with_algorithm(config.digest.into()));
    let aggregator = ReportAggregator::new();
    let mut runs = Vec::with_capacity(strategies.len());

    for strategy in strategies {
        let mut indexer_config = config.indexer_config(strategy);
        if let Some(ref callback) = progress {
            indexer_config = indexer_config.with_progress_callback(callback.clone());
        }
        let indexer = DuplicateIndexer::new(indexer_config).with_hasher(hasher.clone());

        let started = Instant::now();
        let mapping = indexer
            .index(paths.iter().cloned())
            .with_context(|| format!("{strategy} indexing of {} failed", root.display()))?;
        let report = match aggregator.aggregate(&mapping) {
            Ok(report) => Some(report),
            Err(AggregateError::NoDuplicatesFound) => None,
            Err(e) => return Err(e).context("Building the report failed"),
        };
        let elapsed = started.elapsed();
        log::info!(
            "{} strategy finished in {:.2}s ({} files, {} groups, {} duplicate links)",
            strategy,
            elapsed.as_secs_f64(),
            mapping.len(),
            mapping.groups().len(),
            mapping.total_links()
        );

        if config.output == OutputFormat::Text {
            if comparing {
                text.write_strategy_heading(out, strategy)?;
            }
            match report {
                Some(ref report) => text.write_report(out, report)?,
                None => text.write_no_duplicates(out)?,
            }
            text.write_runtime(out, elapsed)?;
        }

        runs.push(StrategyRun {
            strategy,
            mapping,
            report,
            elapsed,
        });
    }

    let mismatched = match runs.as_slice() {
        [first, second] => first.mapping.differing_keys(&second.mapping),
        _ => Vec::new(),
    };
    if !mismatched.is_empty() {
        log::error!(
            "{} and {} strategies disagree on {} file(s)",
            runs[0].strategy,
            runs[1].strategy,
            mismatched.len()
        );
    }

    let found = runs
        .last()
        .and_then(|run| run.report.as_ref())
        .is_some_and(Report::has_duplicates);
    let exit_code = if !mismatched.is_empty() {
        ExitCode::StrategyMismatch
    } else if found {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    };

    match config.output {
        OutputFormat::Text => {
            if !mismatched.is_empty() {
                text.write_mismatch(out, &mismatched)?;
            }
        }
        OutputFormat::Json => {
            let mut json = JsonOutput::new(root, paths.len());
            for run in &runs {
                json = json.with_run(run.strategy, &run.mapping, run.elapsed);
            }
            if let Some(report) = runs.last().and_then(|run| run.report.clone()) {
                json = json.with_report(report);
            }
            if comparing {
                json = json.with_agreement(mismatched.is_empty());
            }
            json.with_exit_code(exit_code)
                .write_to(out, true)
                .context("Failed to write JSON output")?;
        }
    }

    Ok(exit_code)
}

/// Write the default configuration to `explicit` or the platform path.
fn init_config(explicit: Option<&Path>, force: bool) -> Result<ExitCode> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?,
    };
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save_to_path(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(ExitCode::Success)
}
