//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file (the platform config dir, or `--config FILE`)
//! 3. `DUPECOUNT_*` environment variables (e.g. `DUPECOUNT_IO_THREADS=8`)
//! 4. Command-line flags ([`Config::merge_scan_args`])
//!
//! # Example file
//!
//! ```toml
//! strategy = "both"
//! digest = "sha256"
//! paranoid = true
//! io_threads = 8
//! ignore_patterns = ["*.tmp", "node_modules/"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{DigestArg, OutputFormat, ScanArgs, StrategyArg};
use crate::duplicates::{IndexerConfig, Strategy};
use crate::scanner::WalkerConfig;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPECOUNT_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which strategies a scan runs.
    pub strategy: StrategyArg,
    /// Digest function for hash-assisted indexing.
    pub digest: DigestArg,
    /// Confirm every digest match with a byte comparison.
    pub paranoid: bool,
    /// Worker threads for hashing and comparison.
    pub io_threads: usize,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Gitignore-style patterns to exclude.
    pub ignore_patterns: Vec<String>,
    /// Minimum file size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    /// Maximum file size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    /// Report format.
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: StrategyArg::default(),
            digest: DigestArg::default(),
            paranoid: false,
            io_threads: 4,
            follow_symlinks: false,
            skip_hidden: false,
            ignore_patterns: Vec::new(),
            min_size: None,
            max_size: None,
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Load defaults, the config file and the environment.
    ///
    /// With `explicit` set, that file must exist. Otherwise the platform
    /// default path is used if present.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, or if any layer
    /// contains invalid values.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::default_path().filter(|p| p.is_file()),
        };

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(ref path) = path {
            log::debug!("Loading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        figment.extract().with_context(|| match path {
            Some(path) => format!("Invalid configuration in {}", path.display()),
            None => "Invalid configuration".to_string(),
        })
    }

    /// Load defaults overlaid with a single TOML file, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid values.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Overlay command-line flags.
    ///
    /// Options given on the command line replace configured values; boolean
    /// switches can only turn a setting on; ignore patterns accumulate.
    #[must_use]
    pub fn merge_scan_args(mut self, args: &ScanArgs) -> Self {
        if let Some(strategy) = args.strategy {
            self.strategy = strategy;
        }
        if let Some(digest) = args.digest {
            self.digest = digest;
        }
        if let Some(threads) = args.io_threads {
            self.io_threads = threads;
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        if args.min_size.is_some() {
            self.min_size = args.min_size;
        }
        if args.max_size.is_some() {
            self.max_size = args.max_size;
        }
        self.paranoid |= args.paranoid;
        self.follow_symlinks |= args.follow_symlinks;
        self.skip_hidden |= args.skip_hidden;
        self.ignore_patterns
            .extend(args.ignore_patterns.iter().cloned());
        self
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            skip_hidden: self.skip_hidden,
            min_size: self.min_size,
            max_size: self.max_size,
            ignore_patterns: self.ignore_patterns.clone(),
        }
    }

    /// Indexer settings for one strategy run.
    #[must_use]
    pub fn indexer_config(&self, strategy: Strategy) -> IndexerConfig {
        IndexerConfig::default()
            .with_strategy(strategy)
            .with_io_threads(self.io_threads)
            .with_paranoid(self.paranoid)
    }

    /// Write this configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Write this configuration to the platform default path.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory exists for this platform, or
    /// if writing fails.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    /// The platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "dupecount", "dupecount")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
