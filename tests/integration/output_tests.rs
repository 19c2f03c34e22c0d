use dupecount::cli::{OutputFormat, StrategyArg};
use dupecount::config::Config;
use dupecount::error::ExitCode;
use dupecount::{run_scan, ScanOptions};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn abcd(root: &Path) {
    write(&root.join("A"), b"hello");
    write(&root.join("B"), b"world");
    write(&root.join("C"), b"hello");
    write(&root.join("D"), b"hello");
}

fn run(root: &Path, config: &Config) -> (ExitCode, String) {
    let mut out = Vec::new();
    let code = run_scan(root, config, ScanOptions::default(), &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_text_report_for_abcd() {
    let dir = tempdir().unwrap();
    abcd(dir.path());

    let (code, text) = run(dir.path(), &Config::default());

    assert_eq!(code, ExitCode::Success);
    let a = dir.path().join("A").display().to_string();
    let c = dir.path().join("C").display().to_string();
    let d = dir.path().join("D").display().to_string();
    let expected_head = format!(
        "Number of files found: 4\n\
         The file with the most duplicates is:\n\
         {a}\n\
         Here are its 2 copies:\n\
         {c}\n\
         {d}\n\
         \n\
         The most disk space (10 B) could be recovered, by deleting copies of this file:\n\
         {a}\n"
    );
    assert!(text.starts_with(&expected_head), "unexpected output:\n{text}");
    assert!(text.contains("Runtime: "));
    assert!(text.trim_end().ends_with("secs"));
}

#[test]
fn test_text_report_empty_directory() {
    let dir = tempdir().unwrap();

    let (code, text) = run(dir.path(), &Config::default());

    assert_eq!(code, ExitCode::NoDuplicates);
    assert!(text.starts_with("Number of files found: 0\n"));
    assert!(text.contains("Error: Empty file dictionary found.\n"));
}

#[test]
fn test_all_unique_is_no_duplicates() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("x"), b"1");
    write(&dir.path().join("y"), b"2");

    let (code, text) = run(dir.path(), &Config::default());

    assert_eq!(code, ExitCode::NoDuplicates);
    assert!(text.contains("Here are its 0 copies:"));
}

#[test]
fn test_both_strategies_print_two_runtimes() {
    let dir = tempdir().unwrap();
    abcd(dir.path());
    let config = Config {
        strategy: StrategyArg::Both,
        ..Default::default()
    };

    let (code, text) = run(dir.path(), &config);

    assert_eq!(code, ExitCode::Success);
    assert_eq!(text.matches("Runtime: ").count(), 2);
    assert_eq!(text.matches("The file with the most duplicates is:").count(), 2);
    assert!(text.contains("Direct comparison:"));
    assert!(text.contains("hash-assisted"));
    assert!(!text.contains("disagree"));
}

#[test]
fn test_json_output_single_strategy() {
    let dir = tempdir().unwrap();
    abcd(dir.path());
    let config = Config {
        output: OutputFormat::Json,
        ..Default::default()
    };

    let (code, text) = run(dir.path(), &config);
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(parsed["total_files"], 4);
    assert_eq!(parsed["runs"].as_array().unwrap().len(), 1);
    assert_eq!(parsed["runs"][0]["strategy"], "hashed");
    assert_eq!(parsed["runs"][0]["groups"].as_array().unwrap().len(), 1);
    assert_eq!(parsed["report"]["most_duplicated"]["duplicate_count"], 2);
    assert!(parsed["summary"]["strategies_agree"].is_null());
    assert_eq!(parsed["summary"]["exit_code_name"], "DC000");
}

#[test]
fn test_json_output_both_strategies_agree() {
    let dir = tempdir().unwrap();
    abcd(dir.path());
    let config = Config {
        output: OutputFormat::Json,
        strategy: StrategyArg::Both,
        ..Default::default()
    };

    let (_, text) = run(dir.path(), &config);
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed["runs"][0]["strategy"], "direct");
    assert_eq!(parsed["runs"][1]["strategy"], "hashed");
    assert_eq!(parsed["summary"]["strategies_agree"], true);
}

#[test]
fn test_json_output_empty_directory() {
    let dir = tempdir().unwrap();
    let config = Config {
        output: OutputFormat::Json,
        ..Default::default()
    };

    let (code, text) = run(dir.path(), &config);
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(code, ExitCode::NoDuplicates);
    assert!(parsed["report"].is_null());
    assert_eq!(parsed["summary"]["exit_code"], 2);
}

#[test]
fn test_missing_root_is_error() {
    let dir = tempdir().unwrap();
    let mut out = Vec::new();

    let result = run_scan(
        &dir.path().join("missing"),
        &Config::default(),
        ScanOptions::default(),
        &mut out,
    );

    assert!(result.is_err());
    assert!(out.is_empty());
}
