mod support;

use predicates::str::contains;
use serde_json::Value;

use support::TestHome;

#[test]
fn init_creates_data_directory() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::empty();

    let output = home
        .cmd()
        .args(["init", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["schema_version"].as_str(), Some("td.v1"));
    assert_eq!(value["command"].as_str(), Some("init"));
    assert_eq!(value["data"]["created"]["config"].as_bool(), Some(true));
    assert_eq!(value["data"]["created"]["tasks_dir"].as_bool(), Some(true));
    assert_eq!(value["data"]["created"]["prefs"].as_bool(), Some(true));

    assert!(home.data_dir().join("config.toml").exists());
    assert!(home.data_dir().join("prefs.json").exists());
    assert!(home.data_dir().join("tasks").exists());

    Ok(())
}

#[test]
fn init_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::init();

    let output = home
        .cmd()
        .args(["init", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["created"]["config"].as_bool(), Some(false));
    assert_eq!(value["data"]["created"]["prefs"].as_bool(), Some(false));

    Ok(())
}

#[test]
fn commands_require_init() {
    let home = TestHome::empty();

    home.cmd()
        .args(["task", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Not initialized"))
        .stderr(contains("td init"));
}

#[test]
fn task_commands_require_login() {
    let home = TestHome::init();

    home.cmd()
        .args(["task", "list"])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("Not logged in"))
        .stderr(contains("td login"));
}

#[test]
fn json_errors_use_the_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::init();

    let output = home
        .cmd()
        .args(["task", "list", "--json"])
        .assert()
        .failure()
        .code(3)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["command"].as_str(), Some("task list"));
    assert_eq!(value["status"].as_str(), Some("error"));
    assert_eq!(value["error"]["kind"].as_str(), Some("gate_denied"));
    assert_eq!(value["error"]["code"].as_i64(), Some(3));

    Ok(())
}

#[test]
fn quiet_suppresses_human_output() {
    let home = TestHome::init();
    home.signup("alice", "pw");

    home.cmd()
        .args(["task", "counts", "--quiet"])
        .assert()
        .success()
        .stdout("");
}
