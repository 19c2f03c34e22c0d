use clap::Parser;
use dupecount::cli::{Cli, Commands, DigestArg, OutputFormat, StrategyArg};
use dupecount::config::Config;
use figment::providers::Serialized;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Figment directly, without Env, to avoid interference from other tests
    let figment = figment::Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.io_threads, 4);
    assert_eq!(config.strategy, StrategyArg::Hashed);
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("DUPECOUNT_STRATEGY", "direct");
    std::env::set_var("DUPECOUNT_IO_THREADS", "16");

    use figment::{providers::Env, Figment};
    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("DUPECOUNT_"));
    let config: Config = figment.extract().unwrap();

    std::env::remove_var("DUPECOUNT_STRATEGY");
    std::env::remove_var("DUPECOUNT_IO_THREADS");

    assert_eq!(config.strategy, StrategyArg::Direct);
    assert_eq!(config.io_threads, 16);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
strategy = "both"
digest = "sha256"
paranoid = true
io_threads = 8
follow_symlinks = true
ignore_patterns = ["*.tmp", "build/"]
min_size = 1024
output = "json"
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load_from_path(&config_path).unwrap();

    assert_eq!(config.strategy, StrategyArg::Both);
    assert_eq!(config.digest, DigestArg::Sha256);
    assert!(config.paranoid);
    assert_eq!(config.io_threads, 8);
    assert!(config.follow_symlinks);
    assert!(!config.skip_hidden);
    assert_eq!(config.ignore_patterns, vec!["*.tmp", "build/"]);
    assert_eq!(config.min_size, Some(1024));
    assert_eq!(config.max_size, None);
    assert_eq!(config.output, OutputFormat::Json);
}

#[test]
fn test_config_partial_toml_keeps_defaults() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "paranoid = true\n").unwrap();

    let config = Config::load_from_path(&config_path).unwrap();

    assert!(config.paranoid);
    assert_eq!(config.io_threads, 4);
    assert_eq!(config.strategy, StrategyArg::Hashed);
}

#[test]
fn test_config_save_round_trip() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        strategy: StrategyArg::Direct,
        io_threads: 2,
        max_size: Some(4096),
        ..Default::default()
    };
    config.save_to_path(&config_path).unwrap();

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("strategy = \"direct\""));
    assert!(saved.contains("io_threads = 2"));
    assert!(!saved.contains("min_size"));

    assert_eq!(Config::load_from_path(&config_path).unwrap(), config);
}

#[test]
fn test_config_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "strategy = \"sideways\"\n").unwrap();

    assert!(Config::load_from_path(&config_path).is_err());

    fs::write(&config_path, "this is not toml = = =").unwrap();
    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
fn test_explicit_config_file_applies_to_scan() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "strategy = \"direct\"\nio_threads = 3\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    let cli = Cli::try_parse_from(["dupecount", "scan", "/data", "--io-threads", "5"]).unwrap();
    let Commands::Scan(args) = cli.command else {
        panic!("Expected Scan command");
    };
    let merged = config.merge_scan_args(&args);

    assert_eq!(merged.strategy, StrategyArg::Direct);
    assert_eq!(merged.io_threads, 5);
}

#[test]
fn test_init_config_writes_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("fresh.toml");
    let path_arg = config_path.to_str().unwrap();

    let cli = Cli::try_parse_from(["dupecount", "-q", "--config", path_arg, "init-config"]).unwrap();
    assert!(dupecount::run_app(cli).is_ok());
    assert_eq!(Config::load_from_path(&config_path).unwrap(), Config::default());

    // A second run refuses to overwrite without --force
    let cli = Cli::try_parse_from(["dupecount", "-q", "--config", path_arg, "init-config"]).unwrap();
    assert!(dupecount::run_app(cli).is_err());

    let cli = Cli::try_parse_from([
        "dupecount",
        "-q",
        "--config",
        path_arg,
        "init-config",
        "--force",
    ])
    .unwrap();
    assert!(dupecount::run_app(cli).is_ok());
}
