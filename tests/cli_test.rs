use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Get the path to the go-repack binary
fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_go-repack"))
}

/// Write a small Go tree into a fresh temporary directory
fn sample_tree() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("util")).unwrap();
    fs::create_dir_all(root.join("vendor/dep")).unwrap();
    fs::write(
        root.join("file.go"),
        "package pkgsource\n\nimport (\n\t\"fmt\"\n\tu \"example.com/user/pkgsource/util\"\n)\n",
    )
    .unwrap();
    fs::write(root.join("util/util.go"), "package util\n").unwrap();
    fs::write(
        root.join("vendor/dep/dep.go"),
        "package dep\n\nimport \"example.com/user/pkgsource\"\n",
    )
    .unwrap();
    tmp
}

fn run(root: &Path, extra: &[&str]) -> Output {
    Command::new(bin_path())
        .arg(root)
        .args(extra)
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn test_rewrites_tree_from_flags() {
    let tmp = sample_tree();

    let output = run(
        tmp.path(),
        &[
            "--package",
            "vanity.fake/newsy",
            "--import",
            "example.com/user/pkgsource=vanity.fake/newsy",
            "--exclude",
            "vendor",
        ],
    );

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rewrote file.go"), "Unexpected output: {}", stdout);
    assert!(stdout.contains("skipped vendor"), "Unexpected output: {}", stdout);
    assert!(stdout.contains("Visited 2 file(s): 2 changed"), "Unexpected output: {}", stdout);

    assert_eq!(
        fs::read_to_string(tmp.path().join("file.go")).unwrap(),
        "package pkgsource // import \"vanity.fake/newsy\"\n\nimport (\n\t\"fmt\"\n\tu \"vanity.fake/newsy/util\"\n)\n"
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("util/util.go")).unwrap(),
        "package util // import \"vanity.fake/newsy/util\"\n"
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("vendor/dep/dep.go")).unwrap(),
        "package dep\n\nimport \"example.com/user/pkgsource\"\n"
    );
}

#[test]
fn test_config_file_with_json_output() {
    let tmp = sample_tree();
    let config = tmp.path().join("repack.json");
    fs::write(
        &config,
        r#"{
            "package": "vanity.fake/newsy",
            "imports": {"example.com/user/pkgsource": "vanity.fake/newsy"},
            "exclude": ["vendor"],
            "policy": "rename"
        }"#,
    )
    .unwrap();

    let output = run(tmp.path(), &["--config", config.to_str().unwrap(), "--json"]);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert_eq!(json["success"], true);
    assert_eq!(json["report"]["dry_run"], false);
    assert!(json["report"]["run_id"].is_string());
    assert_eq!(json["report"]["files"].as_array().unwrap().len(), 2);
    assert_eq!(json["report"]["files"][0]["path"], "file.go");
    assert_eq!(json["report"]["files"][0]["replacements"][0]["replacement"], "newsy");

    assert!(
        fs::read_to_string(tmp.path().join("file.go"))
            .unwrap()
            .starts_with("package newsy\n")
    );
}

#[test]
fn test_dry_run_leaves_files() {
    let tmp = sample_tree();
    let before = fs::read_to_string(tmp.path().join("file.go")).unwrap();

    let output = run(tmp.path(), &["--package", "vanity.fake/newsy", "--dry-run"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("would rewrite file.go"), "Unexpected output: {}", stdout);
    assert_eq!(fs::read_to_string(tmp.path().join("file.go")).unwrap(), before);
}

#[test]
fn test_syntax_error_exits_nonzero() {
    let tmp = sample_tree();
    fs::write(tmp.path().join("bad.go"), "package\n").unwrap();

    let output = run(tmp.path(), &["--package", "vanity.fake/newsy"]);

    assert!(!output.status.success(), "Binary should have failed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bad.go"), "Expected file name in error, got: {}", stdout);
    assert!(stdout.contains("expected package name"), "Unexpected error: {}", stdout);
}

#[test]
fn test_invalid_import_rule_rejected() {
    let tmp = sample_tree();

    let output = run(tmp.path(), &["--import", "no-separator"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OLD=NEW"), "Unexpected error: {}", stderr);
}

#[test]
fn test_duplicate_import_rule_rejected() {
    let tmp = sample_tree();
    let before = fs::read_to_string(tmp.path().join("file.go")).unwrap();

    let output = run(
        tmp.path(),
        &[
            "--import",
            "example.com/user/pkgsource=vanity.fake/a",
            "--import",
            "example.com/user/pkgsource=vanity.fake/b",
        ],
    );

    assert!(!output.status.success(), "Binary should have failed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("duplicate import rule"), "Unexpected error: {}", stdout);
    assert_eq!(fs::read_to_string(tmp.path().join("file.go")).unwrap(), before);
}

#[test]
fn test_output_to_file() {
    let tmp = sample_tree();
    let report_path = tmp.path().join("report.json");

    let output = run(
        tmp.path(),
        &["--json", "--dry-run", "--output", report_path.to_str().unwrap()],
    );

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["report"]["dry_run"], true);
}
