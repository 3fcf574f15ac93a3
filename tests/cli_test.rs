use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn extractor_in(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("merchant-extract"));
    cmd.current_dir(dir)
        .env_remove("PAYENGINE_BASE_URL")
        .env_remove("PAYENGINE_PRIVATE_KEY")
        .env("RUST_LOG", "info");
    cmd
}

fn read_report(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("report should be written");
    serde_json::from_str(&text).expect("report should be valid JSON")
}

#[test]
fn test_cli_replay_end_to_end() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("report.json");

    extractor_in(dir.path())
        .arg("--replay")
        .arg(fixture("replay.json"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Processing merchant 1/3: mer_001"))
        .stderr(predicate::str::contains("listing row has no id"));

    let report = read_report(&output);
    assert_eq!(report["status"], "success");
    assert_eq!(report["message"], "Successfully extracted data for 3 merchants");
    assert_eq!(report["total_merchants"], 3);

    let harbor = &report["merchants"][0];
    assert_eq!(harbor["merchant_id"], "mer_001");
    assert_eq!(harbor["merchant_data"]["name"], "Harbor Coffee");
    assert_eq!(harbor["details"]["mcc"], "5814");
    assert_eq!(harbor["bank_accounts"]["data"][0]["last4"], "6789");
    assert_eq!(
        harbor["transactions"],
        json!({
            "merchant_id": "mer_001",
            "successful_payments_summary": {
                "total_amount": 124.99,
                "total_fees": 3.68,
                "total_transactions": 3
            },
            "monthly_transactions": [
                {"month": "12/2023", "total_successful_volume": 19.99, "fees": 0.88, "transaction_count": 1},
                {"month": "03/2024", "total_successful_volume": 100.0, "fees": 2.5, "transaction_count": 1}
            ]
        })
    );

    let lakeside = &report["merchants"][1];
    assert_eq!(
        lakeside["documents"],
        json!({"error": "HTTP 404", "merchant_id": "mer_002"})
    );
    assert_eq!(lakeside["transactions"]["successful_payments_summary"]["total_transactions"], 0);
    assert_eq!(lakeside["transactions"]["monthly_transactions"], json!([]));

    let kiosk = &report["merchants"][2];
    assert_eq!(kiosk["merchant_id"], Value::Null);
    assert_eq!(kiosk["transactions"], Value::Null);
}

#[test]
fn test_cli_requires_base_url() {
    let dir = tempdir().unwrap();

    extractor_in(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("PAYENGINE_BASE_URL"));

    assert!(!dir.path().join("merchant_data.json").exists());
}

#[test]
fn test_cli_replaces_previous_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("merchant_data.json");
    std::fs::write(&output, "{\"stale\": true}").unwrap();

    extractor_in(dir.path())
        .arg("--replay")
        .arg(fixture("replay.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Replacing previous output file"));

    let report = read_report(&output);
    assert_eq!(report.get("stale"), None);
    assert_eq!(report["total_merchants"], 3);
}

#[test]
fn test_cli_unreachable_api_writes_error_report() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("merchant_data.json");

    extractor_in(dir.path())
        .env("PAYENGINE_BASE_URL", "http://127.0.0.1:1")
        .env("PAYENGINE_PRIVATE_KEY", "test-key")
        .arg("--timeout-secs")
        .arg("2")
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to list merchants"))
        .stderr(predicate::str::contains("test-key").not());

    let report = read_report(&output);
    assert_eq!(report["status"], "error");
    assert_eq!(report["message"], "No merchants found or error occurred");
    assert_eq!(report["merchants"], json!([]));
}

#[test]
fn test_cli_rejects_malformed_replay_fixture() {
    let dir = tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{\"merchants\": [").unwrap();

    extractor_in(dir.path())
        .arg("--replay")
        .arg(&broken)
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));
}

#[test]
fn test_cli_rejects_zero_timeout() {
    let dir = tempdir().unwrap();

    extractor_in(dir.path())
        .arg("--replay")
        .arg(fixture("replay.json"))
        .arg("--timeout-secs")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout-secs"));

    assert!(!dir.path().join("merchant_data.json").exists());
}
