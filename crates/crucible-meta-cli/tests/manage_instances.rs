//! End-to-end tests for the `manage-instances` binary.
//!
//! Each test runs the built binary against a registry file in a temporary
//! directory and checks the exit status, stdout and the file left behind.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn manage_instances(cfg: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_manage-instances"))
        .arg("--cfg")
        .arg(cfg)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("CRUCIBLE_INSTANCES_CFG")
        .output()
        .expect("failed to run manage-instances")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn create_registry() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("instances.json");
    let initial = json!({
        "instances": [
            {"name": "a", "host": "H1", "cdmver": "v1"},
            {"name": "b", "host": "H2", "cdmver": "v2", "userpass": "U2"}
        ],
        "index-to": "a",
        "query-from": ["a", "b"]
    });
    fs::write(&path, serde_json::to_string_pretty(&initial).unwrap()).unwrap();
    (temp_dir, path)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_add_to_missing_file_creates_it() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("new.json");

    let output = manage_instances(
        &path,
        &["add", "--name", "lab", "--host", "lab:9200", "--cdmver", "v8dev", "--query"],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("Instance 'lab' added to 'instances' list."));

    assert_eq!(
        read_json(&path),
        json!({
            "instances": [
                {"name": "local", "host": "localhost:9200", "cdmver": "v8dev"},
                {"name": "lab", "host": "lab:9200", "cdmver": "v8dev"}
            ],
            "index-to": "local",
            "query-from": ["local", "lab"]
        })
    );
}

#[test]
fn test_read_only_action_on_missing_file_still_creates_it() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("new.json");

    let output = manage_instances(&path, &["query-opt"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(" --host localhost:9200\n"));
    assert!(path.exists());
}

#[test]
fn test_duplicate_add_leaves_file_untouched() {
    let (_temp_dir, path) = create_registry();
    let before = fs::read(&path).unwrap();

    let output = manage_instances(&path, &["add", "--name", "a", "--host", "X", "--cdmver", "v"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("already exists"));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_add_bare_userpass_writes_empty_value() {
    let (_temp_dir, path) = create_registry();
    let output = manage_instances(
        &path,
        &["add", "--name", "c", "--host", "H3", "--cdmver", "v3", "--userpass"],
    );
    assert!(output.status.success());
    assert_eq!(read_json(&path)["instances"][2]["userpass"], "");
}

#[test]
fn test_query_opt_output() {
    let (_temp_dir, path) = create_registry();
    let output = manage_instances(&path, &["query-opt"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), " --host H1 --host H2 --userpass U2\n");
}

#[test]
fn test_remove_index_target_warns() {
    let (_temp_dir, path) = create_registry();
    let output = manage_instances(&path, &["remove", "--name", "a"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No instance is currently configured for 'index-to'"));

    let saved = read_json(&path);
    assert_eq!(saved["index-to"], Value::Null);
    assert_eq!(saved["query-from"], json!(["b"]));
}

#[test]
fn test_update_without_fields_is_rejected_by_parser() {
    let (_temp_dir, path) = create_registry();
    let before = fs::read(&path).unwrap();

    let output = manage_instances(&path, &["update", "--name", "a"]);
    assert!(!output.status.success());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_update_reports_no_changes() {
    let (_temp_dir, path) = create_registry();
    let before = fs::read(&path).unwrap();

    let output = manage_instances(&path, &["update", "--name", "a", "--remove-userpass"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("no changes were applicable"));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_update_summary_line() {
    let (_temp_dir, path) = create_registry();
    let output = manage_instances(&path, &["update", "--name", "b", "--host", "H9", "--index"]);
    assert!(output.status.success());
    assert!(stdout(&output)
        .contains("Instance 'b' updated: host set to 'H9'; 'index-to' set to 'b'."));
    assert_eq!(read_json(&path)["index-to"], "b");
}

#[test]
fn test_malformed_json_exits_with_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{not_json: ").unwrap();

    let output = manage_instances(&path, &["add", "--name", "x", "--host", "h", "--cdmver", "v"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{not_json: ");
}

#[test]
fn test_info_prints_document() {
    let (_temp_dir, path) = create_registry();
    let output = manage_instances(&path, &["info"]);
    assert!(output.status.success());

    let out = stdout(&output);
    let (heading, body) = out.split_once('\n').unwrap();
    assert!(heading.starts_with("Current configuration from"));
    let printed: Value = serde_json::from_str(body).unwrap();
    assert_eq!(printed, read_json(&path));
}

#[test]
fn test_info_warns_about_dangling_references_after_dump() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("instances.json");
    let doc = json!({
        "instances": [{"name": "a", "host": "H1", "cdmver": "v1"}],
        "index-to": "gone",
        "query-from": ["a"]
    });
    fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

    let output = manage_instances(&path, &["info"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.starts_with("Current configuration from"));
    let (_, rest) = out.split_once('\n').unwrap();
    let (body, warnings) = rest.split_at(rest.find("\n}\n").unwrap() + 3);
    let printed: Value = serde_json::from_str(body).unwrap();
    assert_eq!(printed, doc);
    assert!(warnings.contains("'gone' is referenced but has no matching instance."));
}

#[test]
fn test_log_level_option_is_accepted() {
    let (_temp_dir, path) = create_registry();
    let output = manage_instances(&path, &["--log-level", "debug", "query-opt"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(" --host H1 --host H2 --userpass U2"));
}
