use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("jsonschema-engine").expect("Binary exists")
}

fn create_temp_file(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
    let file_path = dir.path().join(name);
    fs::write(&file_path, content).expect("Writable file");
    file_path.to_str().expect("UTF-8 path").to_string()
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

const SCHEMA: &str = r#"{"type": "object", "properties": {"name": {"type": "string"}}}"#;

#[test]
fn version() {
    let output = cli().arg("--version").output().expect("Runs");
    assert!(output.status.success());
    assert_eq!(stdout(&output), format!("Version: {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn valid_instance() {
    let dir = tempdir().expect("Temporary directory");
    let schema = create_temp_file(&dir, "schema.json", SCHEMA);
    let instance = create_temp_file(&dir, "instance.json", r#"{"name": "John Doe"}"#);

    let output = cli()
        .arg(&schema)
        .arg("--instance")
        .arg(&instance)
        .output()
        .expect("Runs");
    assert!(output.status.success());
    assert_eq!(stdout(&output), format!("{instance} - VALID\n"));
}

#[test]
fn invalid_instance() {
    let dir = tempdir().expect("Temporary directory");
    let schema = create_temp_file(&dir, "schema.json", SCHEMA);
    let instance = create_temp_file(&dir, "instance.json", r#"{"name": 123}"#);

    let output = cli()
        .arg(&schema)
        .arg("--instance")
        .arg(&instance)
        .output()
        .expect("Runs");
    assert!(!output.status.success());
    assert_eq!(
        stdout(&output),
        format!("{instance} - INVALID. Errors:\n1. must be of type string at '/name'\n")
    );
}

#[test]
fn invalid_schema() {
    let dir = tempdir().expect("Temporary directory");
    let schema = create_temp_file(&dir, "schema.json", r#"{"type": "invalid"}"#);
    let instance = create_temp_file(&dir, "instance.json", "{}");

    let output = cli()
        .arg(&schema)
        .arg("--instance")
        .arg(&instance)
        .output()
        .expect("Runs");
    assert!(!output.status.success());
    assert!(stdout(&output).starts_with("Schema is invalid. Error: "));
}

#[test]
fn multiple_instances() {
    let dir = tempdir().expect("Temporary directory");
    let schema = create_temp_file(&dir, "schema.json", SCHEMA);
    let first = create_temp_file(&dir, "instance1.json", r#"{"name": "John Doe"}"#);
    let second = create_temp_file(&dir, "instance2.json", r#"{"name": 123}"#);

    let output = cli()
        .arg(&schema)
        .arg("--instance")
        .arg(&first)
        .arg("--instance")
        .arg(&second)
        .output()
        .expect("Runs");
    assert!(!output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains(&format!("{first} - VALID")));
    assert!(stdout.contains(&format!("{second} - INVALID")));
}

#[test]
fn flag_output() {
    let dir = tempdir().expect("Temporary directory");
    let schema = create_temp_file(&dir, "schema.json", SCHEMA);
    let instance = create_temp_file(&dir, "instance.json", r#"{"name": 123}"#);

    let output = cli()
        .args([schema.as_str(), "--instance", instance.as_str(), "--output", "flag"])
        .output()
        .expect("Runs");
    assert!(!output.status.success());
    let value: Value = serde_json::from_str(stdout(&output).trim()).expect("JSON output");
    assert_eq!(value, json!({"valid": false, "instance": instance}));
}

#[test]
fn list_output() {
    let dir = tempdir().expect("Temporary directory");
    let schema = create_temp_file(&dir, "schema.json", SCHEMA);
    let instance = create_temp_file(&dir, "instance.json", r#"{"name": 123}"#);

    let output = cli()
        .args([schema.as_str(), "--instance", instance.as_str(), "--output", "list"])
        .output()
        .expect("Runs");
    let value: Value = serde_json::from_str(stdout(&output).trim()).expect("JSON output");
    assert_eq!(value["valid"], json!(false));
    assert_eq!(value["details"][0]["instanceLocation"], json!("/name"));
    assert_eq!(
        value["details"][0]["errors"],
        json!({"type": "must be of type string"})
    );
}

#[test]
fn draft_and_format_flags() {
    let dir = tempdir().expect("Temporary directory");
    let schema = create_temp_file(&dir, "schema.json", r#"{"format": "ipv4"}"#);
    let instance = create_temp_file(&dir, "instance.json", r#""not an address""#);

    let output = cli()
        .args([schema.as_str(), "--instance", instance.as_str()])
        .output()
        .expect("Runs");
    assert!(output.status.success());
    for flags in [["--draft", "7"], ["--assert-format", "--fail-fast"]] {
        let output = cli()
            .args([schema.as_str(), "--instance", instance.as_str()])
            .args(flags)
            .output()
            .expect("Runs");
        assert!(!output.status.success());
    }
}

#[test]
fn no_instances() {
    let dir = tempdir().expect("Temporary directory");
    let schema = create_temp_file(&dir, "schema.json", r#"{"type": "object"}"#);

    let output = cli().arg(&schema).output().expect("Runs");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
}
