//! End-to-end tests for the shopify-hmac binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const SECRET: &str = "shhh";
const QUERY: &str = "code=123&shop=a.myshopify.com";
const QUERY_HMAC: &str = "a4e65d7d1296a53a76e535f99dbcb96a42d74173f5da08065b746749116736a1";
const BODY: &str = r#"{"id":1}"#;
const BODY_HMAC: &str = "Lcc9Yf2U6zbkFFL44wuL0uEJMTo4Q8mC5iIG3KWCtLA=";

/// Run from an empty directory so no stray settings file is picked up
fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shopify-hmac").unwrap();
    cmd.current_dir(dir.path()).env_remove("SHOPIFY_API_SECRET").env_remove("RUST_LOG");
    cmd
}

fn settings_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_sign_query() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--secret", SECRET, "sign-query", QUERY])
        .assert()
        .success()
        .stdout(format!("{}\n", QUERY_HMAC));
}

#[test]
fn test_sign_query_ignores_existing_hmac() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--secret", SECRET, "sign-query", "shop=a.myshopify.com&hmac=old&code=123"])
        .assert()
        .success()
        .stdout(format!("{}\n", QUERY_HMAC));
}

#[test]
fn test_secret_from_env() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .env("SHOPIFY_API_SECRET", SECRET)
        .args(["sign-query", QUERY])
        .assert()
        .success()
        .stdout(format!("{}\n", QUERY_HMAC));
}

#[test]
fn test_sign_without_secret_is_config_error() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["sign-query", QUERY])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_verify_query_allowed() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--secret", SECRET, "verify-query"])
        .arg(format!("{}&hmac={}", QUERY, QUERY_HMAC))
        .assert()
        .success()
        .stdout(predicate::str::contains("Signature verified"));
}

#[test]
fn test_verify_query_tampered() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--secret", SECRET, "verify-query"])
        .arg(format!("code=456&shop=a.myshopify.com&hmac={}", QUERY_HMAC))
        .assert()
        .code(5)
        .stderr(predicate::str::contains("HMAC validation failed"))
        .stderr(predicate::str::contains("signature_mismatch"))
        .stderr(predicate::str::contains(QUERY_HMAC).not());
}

#[test]
fn test_verify_query_timestamp() {
    let dir = TempDir::new().unwrap();
    let query = "code=123&shop=a.myshopify.com&timestamp=1000\
                 &hmac=531be3651ad72282d6e6beb98d3d744826b6b95c3587ca48589de588ad2a43ac";

    cmd(&dir)
        .args(["--secret", SECRET, "verify-query", query, "--now", "2000"])
        .assert()
        .success();

    cmd(&dir)
        .args(["--secret", SECRET, "verify-query", query, "--now", "100000"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("HMAC timestamp expired"));
}

#[test]
fn test_verify_query_shop_pattern() {
    let dir = TempDir::new().unwrap();
    let query = "code=123&shop=evil.example.com\
                 &hmac=d9fc3adfe85df73540993b17e13747b1c1a4b49fd8b3936199c7bd8c1d54f652";

    cmd(&dir)
        .args(["--secret", SECRET, "verify-query", query])
        .assert()
        .success();

    cmd(&dir)
        .args(["--secret", SECRET, "verify-query", query, "--shop-pattern"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Shop parameter invalid"));
}

#[test]
fn test_verify_query_json() {
    let dir = TempDir::new().unwrap();
    let output = cmd(&dir)
        .args(["--secret", SECRET, "--json", "verify-query", QUERY])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["allowed"], false);
    assert_eq!(report["reason"], "missing_signature");
    assert_eq!(report["message"], "HMAC validation failed");
}

#[test]
fn test_sign_body_stdin() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--secret", SECRET, "sign-body", "-"])
        .write_stdin(BODY)
        .assert()
        .success()
        .stdout(format!("{}\n", BODY_HMAC));
}

#[test]
fn test_verify_body_file() {
    let dir = TempDir::new().unwrap();
    let body = settings_file(BODY);

    cmd(&dir)
        .args(["--secret", SECRET, "verify-body"])
        .arg(body.path())
        .args(["--hmac", BODY_HMAC])
        .assert()
        .success();

    cmd(&dir)
        .args(["--secret", SECRET, "verify-body"])
        .arg(body.path())
        .args(["--hmac", "bm9wZQ=="])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("HMAC validation failed"));
}

#[test]
fn test_verify_body_missing_secret_denied() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--json", "verify-body", "-", "--hmac", BODY_HMAC])
        .write_stdin(BODY)
        .assert()
        .code(5)
        .stdout(predicate::str::contains("missing_config"));
}

#[test]
fn test_verify_body_missing_file() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--secret", SECRET, "verify-body", "no-such-body.json", "--hmac", BODY_HMAC])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-body.json"));
}

#[test]
fn test_settings_file_custom_names() {
    let dir = TempDir::new().unwrap();
    let file = settings_file(
        r#"
[shopify]
api_secret_key = "shhh"
query_hmac = "signature"
"#,
    );

    cmd(&dir)
        .arg("--config")
        .arg(file.path())
        .arg("verify-query")
        .arg(format!("{}&signature={}", QUERY, QUERY_HMAC))
        .assert()
        .success();
}

#[test]
fn test_cli_secret_overrides_file() {
    let dir = TempDir::new().unwrap();
    let file = settings_file("[shopify]\napi_secret_key = \"other\"\n");

    cmd(&dir)
        .arg("--config")
        .arg(file.path())
        .args(["--secret", SECRET, "sign-query", QUERY])
        .assert()
        .success()
        .stdout(format!("{}\n", QUERY_HMAC));
}

#[test]
fn test_settings_file_discovered_in_working_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".shopify-guards.toml"),
        "[shopify]\napi_secret_key = \"shhh\"\n",
    )
    .unwrap();

    cmd(&dir)
        .args(["sign-query", QUERY])
        .assert()
        .success()
        .stdout(format!("{}\n", QUERY_HMAC));
}

#[test]
fn test_check_config_valid() {
    let dir = TempDir::new().unwrap();
    let file = settings_file(
        r#"
[shopify]
api_secret_key = "0123456789abcdef0123456789abcdef"
shop_regex = '^[a-z0-9][a-z0-9\-]*\.myshopify\.com$'
"#,
    );

    cmd(&dir)
        .arg("--config")
        .arg(file.path())
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings valid"))
        .stdout(predicate::str::contains("set (32 bytes)"))
        .stdout(predicate::str::contains("0123456789abcdef").not());
}

#[test]
fn test_check_config_without_secret() {
    let dir = TempDir::new().unwrap();
    let output = cmd(&dir).args(["--json", "check-config"]).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["settings"]["secret_configured"], false);
    assert_eq!(report["errors"][0]["field"], "api_secret_key");
}

#[test]
fn test_check_config_bad_regex() {
    let dir = TempDir::new().unwrap();
    let file = settings_file("[shopify]\nshop_regex = \"(unclosed\"\n");

    cmd(&dir)
        .arg("--config")
        .arg(file.path())
        .arg("check-config")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("shop_regex"));
}

#[test]
fn test_explicit_config_not_found() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--config", "missing.toml", "check-config"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not found"));
}
