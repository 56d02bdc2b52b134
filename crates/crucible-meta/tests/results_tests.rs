//! Integration tests for result listing and tagging.

use crucible_meta::results::{
    add_tags, describe_result_dir, list_results, load_run, matches_filters, read_tags,
    remove_tags, replace_run, run_id, RunFileFormat,
};
use crucible_meta::{MetaError, Tag, TagFilter};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create `<run_dir>/<name>/run/rickshaw-run.json` with the given content.
fn create_result(run_dir: &Path, name: &str, run: serde_json::Value) -> PathBuf {
    let result = run_dir.join(name);
    fs::create_dir_all(result.join("run")).unwrap();
    fs::write(
        result.join("run/rickshaw-run.json"),
        serde_json::to_string(&run).unwrap(),
    )
    .unwrap();
    result
}

fn backups(result: &Path) -> Vec<String> {
    fs::read_dir(result.join("run"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("rickshaw-run.json."))
        .collect()
}

#[test]
fn test_add_and_remove_tags_rewrites_run() {
    let temp_dir = TempDir::new().unwrap();
    let result = create_result(temp_dir.path(), "fio-old", json!({"id": "r-1"}));

    let (file, mut data) = load_run(&result).unwrap().unwrap();
    assert_eq!(file.format, RunFileFormat::Plain);
    add_tags(&mut data, &["os:rhel9".to_string(), "env:lab a".to_string()]).unwrap();
    replace_run(&result, &data).unwrap();

    let (_, data) = load_run(&result).unwrap().unwrap();
    assert_eq!(
        read_tags(&data).unwrap(),
        vec![
            Tag {
                name: "os".into(),
                val: "rhel9".into()
            },
            Tag {
                name: "env".into(),
                val: "lab a".into()
            },
        ]
    );
    assert_eq!(backups(&result).len(), 1);

    let mut data = data;
    remove_tags(&mut data, &["env".to_string()]).unwrap();
    replace_run(&result, &data).unwrap();
    let (_, data) = load_run(&result).unwrap().unwrap();
    assert_eq!(read_tags(&data).unwrap().len(), 1);
}

#[test]
fn test_rejected_tag_edit_does_not_touch_run() {
    let temp_dir = TempDir::new().unwrap();
    let result = create_result(temp_dir.path(), "fio-old", json!({"id": "r-1"}));

    let (_, mut data) = load_run(&result).unwrap().unwrap();
    let err = remove_tags(&mut data, &["os".to_string()]).unwrap_err();
    assert!(matches!(err, MetaError::NoTags));
    assert!(backups(&result).is_empty());
}

#[test]
fn test_listing_with_tag_filters() {
    let temp_dir = TempDir::new().unwrap();
    create_result(
        temp_dir.path(),
        "uperf--2024-02-01_10:00:00--0a1b2c3d",
        json!({"tags": [{"name": "os", "val": "rhel"}]}),
    );
    create_result(
        temp_dir.path(),
        "fio-legacy",
        json!({"run-id": "legacy-1", "tags": [{"name": "os", "val": "fedora"}]}),
    );
    fs::create_dir(temp_dir.path().join("empty")).unwrap();

    let filters = vec![TagFilter::parse("os:rhel")];
    let mut kept = Vec::new();
    for path in list_results(temp_dir.path()).unwrap() {
        let run = load_run(&path).unwrap().map(|(_, data)| data);
        if matches_filters(run.as_ref(), &filters) {
            let entry = describe_result_dir(&path);
            kept.push((entry.name.clone(), run_id(&entry.name, run.as_ref())));
        }
    }

    assert_eq!(
        kept,
        vec![(
            "uperf--2024-02-01_10:00:00--0a1b2c3d".to_string(),
            Some("0a1b2c3d".to_string())
        )]
    );
}

#[test]
fn test_legacy_run_id() {
    let temp_dir = TempDir::new().unwrap();
    let result = create_result(temp_dir.path(), "fio-legacy", json!({"run-id": "legacy-1"}));
    let (_, data) = load_run(&result).unwrap().unwrap();
    assert_eq!(run_id("fio-legacy", Some(&data)).as_deref(), Some("legacy-1"));
}
