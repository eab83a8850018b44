use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("nfe-core")
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Command with the user config directory pointed at an empty temp dir.
fn nfe(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("nfe").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path());
    cmd
}

fn reply(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn process_prints_json_record() {
    let home = TempDir::new().unwrap();

    nfe(&home)
        .arg("process")
        .arg(fixture("valid_nfe.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"id\": \"NFe43211011222333000181550010000123451000000009\"",
        ))
        .stdout(predicate::str::contains("PRODUTO DE TESTE 2"));
}

#[test]
fn process_prints_text_summary() {
    let home = TempDir::new().unwrap();

    nfe(&home)
        .args(["process", "--format", "text"])
        .arg(fixture("valid_nfe.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Items (2):"))
        .stdout(predicate::str::contains("CNPJ: 11.222.333/0001-81"))
        .stdout(predicate::str::contains("Total:    150,00"));
}

#[test]
fn process_accepts_fenced_reply() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let input = reply(
        &dir,
        "reply.txt",
        "```json\n{\"chave_acesso\": \"123\", \"itens\": []}\n```\n",
    );

    nfe(&home)
        .args(["process", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("access_key,number"))
        .stdout(predicate::str::contains("\n123,"));
}

#[test]
fn non_mapping_reply_is_a_mapping_error() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let input = reply(&dir, "reply.json", "[1, 2, 3]");

    nfe(&home)
        .arg("process")
        .arg(&input)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Mapping error: input must be a mapping"))
        .stderr(predicate::str::contains("could not be converted into an NF-e record"));
}

#[test]
fn malformed_item_is_a_mapping_error() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let input = reply(&dir, "reply.json", "{\"itens\": [\"CABO\"]}");

    nfe(&home)
        .arg("process")
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Mapping error: unexpected error during mapping: item 0 must be a mapping",
        ));
}

#[test]
fn invalid_json_reply_fails() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let input = reply(&dir, "reply.txt", "Desculpe, não consegui ler a nota.");

    nfe(&home)
        .arg("process")
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Mapping error").not());
}

#[test]
fn missing_input_fails() {
    let home = TempDir::new().unwrap();

    nfe(&home)
        .args(["process", "does-not-exist.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does-not-exist.json"));
}

#[test]
fn validate_reports_issues() {
    let home = TempDir::new().unwrap();

    nfe(&home)
        .args(["process", "--validate"])
        .arg(fixture("incomplete_nfe.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Validation issues:"))
        .stderr(predicate::str::contains("Missing issuer CNPJ"))
        .stderr(predicate::str::contains("Missing access key"));
}

#[test]
fn validate_clean_record() {
    let home = TempDir::new().unwrap();

    nfe(&home)
        .args(["process", "--validate"])
        .arg(fixture("valid_nfe.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("No validation issues"));
}

#[test]
fn validate_flags_access_key_mismatch() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let mut json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fixture("valid_nfe.json")).unwrap()).unwrap();
    json["chave_acesso"] = serde_json::json!("43211011222333000144550010000123451000000001");
    let input = reply(&dir, "reply.json", &json.to_string());

    nfe(&home)
        .args(["process", "--validate"])
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Access key CNPJ 11222333000144 does not match issuer CNPJ 11222333000181",
        ))
        .stderr(predicate::str::contains("does not match invoice number").not());
}

#[test]
fn process_writes_output_file() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("nfe.json");

    nfe(&home)
        .arg("process")
        .arg(fixture("valid_nfe.json"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("EMPRESA EMITENTE LTDA"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    reply(&dir, "a.json", &fs::read_to_string(fixture("valid_nfe.json")).unwrap());
    reply(&dir, "b.txt", "\"texto\"");
    let out = dir.path().join("out");

    nfe(&home)
        .arg("batch")
        .arg(format!("{}/*", dir.path().display()))
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(out.join("a.json").exists());
    assert!(!out.join("b.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,"));
    assert!(summary.contains("a.json,success,43211011222333000181550010000123451000000009"));
    assert!(summary.contains("b.txt,error,"));
    assert!(summary.contains("input must be a mapping"));
}

#[test]
fn batch_stops_on_first_error() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    reply(&dir, "bad.json", "42");

    nfe(&home)
        .arg("batch")
        .arg(format!("{}/*.json", dir.path().display()))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Mapping error"));
}

#[test]
fn config_defaults_and_set() {
    let home = TempDir::new().unwrap();

    nfe(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));

    nfe(&home)
        .args(["config", "set", "output.format", "text"])
        .assert()
        .success();

    nfe(&home)
        .args(["config", "get", "output.format"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"text\""));

    nfe(&home)
        .arg("process")
        .arg(fixture("valid_nfe.json"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("NF-e: NFe"));
}

#[test]
fn config_rejects_unknown_key() {
    let home = TempDir::new().unwrap();

    nfe(&home)
        .args(["config", "get", "ocr.threshold"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration key not found"));
}
