//! Runs of the CLI entry point against temporary note directories

use autotag_cli::{run, Cli, CliError};
use clap::Parser;
use std::fs;
use std::path::Path;

/// Config pointing at a closed port; short notes never reach it.
fn write_config(dir: &Path) -> String {
    let path = dir.join("autotag.toml");
    fs::write(
        &path,
        "[service]\nendpoint = \"http://127.0.0.1:9/v1/chat/completions\"\ntimeout_secs = 1\n\n[run]\ncolor = false\n",
    )
    .unwrap();
    path.to_string_lossy().into_owned()
}

fn parse(args: &[&str]) -> Cli {
    let mut full = vec!["autotag"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).unwrap()
}

#[test]
fn test_missing_root_is_fatal() {
    let cfg_dir = tempfile::tempdir().unwrap();
    let config = write_config(cfg_dir.path());

    let err = run(parse(&["/no/such/vault", "--config", config.as_str()])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CliError>(),
        Some(CliError::InvalidRoot(_))
    ));
}

#[test]
fn test_no_documents_is_fatal() {
    let vault = tempfile::tempdir().unwrap();
    let cfg_dir = tempfile::tempdir().unwrap();
    let config = write_config(cfg_dir.path());
    let root = vault.path().to_string_lossy().into_owned();

    let err = run(parse(&[root.as_str(), "--config", config.as_str()])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CliError>(),
        Some(CliError::NoDocuments(_))
    ));
}

#[test]
fn test_dry_run_writes_report() {
    let vault = tempfile::tempdir().unwrap();
    let cfg_dir = tempfile::tempdir().unwrap();
    let config = write_config(cfg_dir.path());
    let note = vault.path().join("(2024-2-3) Groceries.md");
    fs::write(&note, "eggs, milk").unwrap();
    let root = vault.path().to_string_lossy().into_owned();

    run(parse(&[root.as_str(), "--config", config.as_str()])).unwrap();

    assert_eq!(fs::read_to_string(&note).unwrap(), "eggs, milk");
    let json = fs::read_to_string(vault.path().join("metadata_dryrun.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(records[0]["path"], "(2024-2-3) Groceries.md");
    assert_eq!(records[0]["date_source"], "Filename");
    assert_eq!(records[0]["metadata"]["Date"], "2024-02-03");
    assert_eq!(records[0]["metadata"]["autoAiTag"], true);
}

#[test]
fn test_dry_run_report_survives_odd_header_keys() {
    let vault = tempfile::tempdir().unwrap();
    let cfg_dir = tempfile::tempdir().unwrap();
    let config = write_config(cfg_dir.path());
    fs::write(vault.path().join("odd.md"), "---\n~: odd\ntitle: x\n---\nbody").unwrap();
    fs::write(vault.path().join("plain.md"), "plain body").unwrap();
    let root = vault.path().to_string_lossy().into_owned();

    run(parse(&[root.as_str(), "--config", config.as_str()])).unwrap();

    let json = fs::read_to_string(vault.path().join("metadata_dryrun.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&json).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .any(|r| r["path"] == "odd.md" && r["metadata"]["null"] == "odd"));
    assert!(records.iter().any(|r| r["path"] == "plain.md"));
}

#[test]
fn test_write_mode_updates_notes() {
    let vault = tempfile::tempdir().unwrap();
    let cfg_dir = tempfile::tempdir().unwrap();
    let config = write_config(cfg_dir.path());
    let note = vault.path().join("todo.md");
    fs::write(&note, "call the bank").unwrap();
    let root = vault.path().to_string_lossy().into_owned();

    run(parse(&[root.as_str(), "--config", config.as_str(), "--write"])).unwrap();

    let content = fs::read_to_string(&note).unwrap();
    assert!(content.starts_with("---\n"));
    assert!(content.contains("autoAiTag: true"));
    assert!(content.contains("title: todo"));
    assert!(content.ends_with("call the bank"));
    assert!(!vault.path().join("metadata_dryrun.json").exists());
}
