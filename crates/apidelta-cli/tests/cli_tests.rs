//! CLI integration tests
//!
//! These tests run the `apidelta` binary against Go package fixtures written
//! into temporary directories.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const OLD_CLIENT: &str = r#"package armwidget

type WidgetsClient struct{}

func (client *WidgetsClient) BeginCreate(ctx context.Context, name string) (*runtime.Poller[WidgetsClientCreateResponse], error) {
	return nil, nil
}
"#;

const NEW_CLIENT: &str = r#"package armwidget

type WidgetsClient struct{}

func (client *WidgetsClient) Create(ctx context.Context, name string) (WidgetsClientCreateResponse, error) {
	return WidgetsClientCreateResponse{}, nil
}

func NewWidgetsClient(subscriptionID string) (*WidgetsClient, error) {
	return &WidgetsClient{}, nil
}

func (client *WidgetsClient) createRequest() {
	reqQP.Set("api-version", "2024-03-01-preview")
}
"#;

fn write_package(root: &Path, name: &str, source: &str) -> std::path::PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("client.go"), source).unwrap();
    dir
}

fn apidelta(args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_apidelta");
    Command::new(cli_bin)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_changelog_markdown() {
    let temp_dir = TempDir::new().unwrap();
    let old = write_package(temp_dir.path(), "old", OLD_CLIENT);
    let new = write_package(temp_dir.path(), "new", NEW_CLIENT);

    let output = apidelta(&[
        "changelog",
        "--old",
        old.to_str().unwrap(),
        "--new",
        new.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout(&output),
        "### Breaking Changes

- Operation `*WidgetsClient.BeginCreate` has been changed to non-LRO, use `*WidgetsClient.Create` instead.

### Features Added

- New function `NewWidgetsClient(string) (*WidgetsClient, error)`
"
    );
}

#[test]
fn test_changelog_summary_and_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let old = write_package(temp_dir.path(), "old", OLD_CLIENT);
    let new = write_package(temp_dir.path(), "new", NEW_CLIENT);
    let out_file = temp_dir.path().join("summary.txt");

    let output = apidelta(&[
        "changelog",
        "--old",
        old.to_str().unwrap(),
        "--new",
        new.to_str().unwrap(),
        "--format",
        "summary",
        "--output",
        out_file.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(&out_file).unwrap(),
        "Total 1 breaking change(s), 1 additive change(s)."
    );
}

#[test]
fn test_missing_old_directory_is_new_package() {
    let temp_dir = TempDir::new().unwrap();
    let new = write_package(temp_dir.path(), "new", NEW_CLIENT);
    let missing = temp_dir.path().join("never-existed");

    let output = apidelta(&[
        "changelog",
        "--old",
        missing.to_str().unwrap(),
        "--new",
        new.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "This is a new package\n");
}

#[test]
fn test_both_directories_missing_reports_no_changes() {
    let temp_dir = TempDir::new().unwrap();
    let old = temp_dir.path().join("old-gone");
    let new = temp_dir.path().join("new-gone");

    let output = apidelta(&[
        "changelog",
        "--old",
        old.to_str().unwrap(),
        "--new",
        new.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "No exported changes\n");
}

#[test]
fn test_version_detects_preview() {
    let temp_dir = TempDir::new().unwrap();
    let old = write_package(temp_dir.path(), "old", OLD_CLIENT);
    let new = write_package(temp_dir.path(), "new", NEW_CLIENT);

    let output = apidelta(&[
        "version",
        "--old",
        old.to_str().unwrap(),
        "--new",
        new.to_str().unwrap(),
        "--previous",
        "v1.2.0",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "2.0.0-beta.1 Beta,BreakingChange\n");
}

#[test]
fn test_version_json_and_config() {
    let temp_dir = TempDir::new().unwrap();
    let old = write_package(temp_dir.path(), "old", OLD_CLIENT);
    let new = write_package(temp_dir.path(), "new", NEW_CLIENT);
    let config = temp_dir.path().join("apidelta.toml");
    fs::write(&config, "report = \"additive_only\"\n").unwrap();

    let output = apidelta(&[
        "version",
        "--old",
        old.to_str().unwrap(),
        "--new",
        new.to_str().unwrap(),
        "--previous",
        "0.3.0",
        "--preview",
        "--json",
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["version"], "0.4.0");
    assert_eq!(json["label"], "Beta");
}

#[test]
fn test_stable_from_beta_fails_with_code() {
    let temp_dir = TempDir::new().unwrap();
    let old = write_package(temp_dir.path(), "old", OLD_CLIENT);

    let output = apidelta(&[
        "version",
        "--old",
        old.to_str().unwrap(),
        "--new",
        old.to_str().unwrap(),
        "--previous",
        "1.2.0-beta.1",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_INVALID_PREVIOUS_VERSION"), "stderr: {}", stderr);
}

#[test]
fn test_exports_json() {
    let temp_dir = TempDir::new().unwrap();
    let new = write_package(temp_dir.path(), "new", NEW_CLIENT);

    let output = apidelta(&["exports", new.to_str().unwrap()]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["funcs"]["NewWidgetsClient"]["returns"], "*WidgetsClient, error");
    assert!(json["funcs"].get("*WidgetsClient.createRequest").is_none());
}

#[test]
fn test_exports_empty_directory_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = apidelta(&["exports", temp_dir.path().to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_PACKAGE_NOT_FOUND"));
}
