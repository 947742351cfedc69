use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

struct TestEnv {
    _tmp: TempDir,
    store: String,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let store = tmp
            .path()
            .join("reports.json")
            .to_string_lossy()
            .into_owned();
        Self { _tmp: tmp, store }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("contact-tracker").unwrap();
        cmd.arg("--store").arg(&self.store);
        cmd
    }

    fn report(&self, contact: &str, reason: &str) {
        self.cmd()
            .args(["report", contact, "--reason", reason])
            .assert()
            .success();
    }
}

#[test]
fn report_confirms_and_counts() {
    let env = TestEnv::new();

    env.cmd()
        .args(["report", "+15550000000", "--reason", "spam calls"])
        .assert()
        .success()
        .stdout(contains("Reported +15550000000 (PHONE), id "))
        .stdout(contains("1 contacts flagged"));
}

#[test]
fn report_json_output() {
    let env = TestEnv::new();

    let out = env
        .cmd()
        .args([
            "--json",
            "report",
            "scam@example.com",
            "--reason",
            "phishing",
            "--reporter",
            "Ana",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(value["ok"], true);
    assert_eq!(value["data"]["contact"], "scam@example.com");
    assert_eq!(value["data"]["type"], "EMAIL");
    assert_eq!(value["data"]["reporterName"], "Ana");
}

#[test]
fn reports_empty_store() {
    let env = TestEnv::new();

    env.cmd()
        .arg("reports")
        .assert()
        .success()
        .stdout(contains("No reports yet"));
}

#[test]
fn reports_truncates_to_six() {
    let env = TestEnv::new();
    for i in 0..8 {
        env.report(&format!("+1555000000{i}"), "spam calls");
    }

    env.cmd()
        .arg("reports")
        .assert()
        .success()
        .stdout(contains("8 contacts flagged"))
        .stdout(contains("(2 more not shown)"))
        // Newest first: the two oldest fall off the visible list.
        .stdout(contains("+15550000007"))
        .stdout(contains("+15550000001").not());
}

#[test]
fn reports_limit_override() {
    let env = TestEnv::new();
    for i in 0..3 {
        env.report(&format!("+1555000000{i}"), "spam calls");
    }

    env.cmd()
        .args(["reports", "--limit", "1"])
        .assert()
        .success()
        .stdout(contains("(2 more not shown)"));
}

#[test]
fn check_reported_contact_needs_no_api_key() {
    let env = TestEnv::new();
    env.report("+15550000000", "spam calls");

    // A local report answers the lookup before the enrichment client is
    // ever built, so the missing key must not matter.
    env.cmd()
        .env_remove("GEMINI_API_KEY")
        .args(["check", "+15550000000"])
        .assert()
        .code(1)
        .stdout(contains("FLAGGED"))
        .stdout(contains("95/100"))
        .stdout(contains("spam calls"));
}

#[test]
fn check_without_api_key_fails_cleanly() {
    let env = TestEnv::new();

    env.cmd()
        .env_remove("GEMINI_API_KEY")
        .args(["check", "+15550000000"])
        .assert()
        .code(3)
        .stderr(contains("API key"));
}

#[test]
fn malformed_store_does_not_break_commands() {
    let env = TestEnv::new();
    std::fs::write(&env.store, "not json at all").unwrap();

    env.cmd()
        .arg("reports")
        .assert()
        .success()
        .stdout(contains("No reports yet"));

    env.report("+15550000000", "spam calls");

    env.cmd()
        .arg("reports")
        .assert()
        .success()
        .stdout(contains("1 contacts flagged"));
}
