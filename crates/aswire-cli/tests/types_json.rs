//! Integration tests for `aswire types` and `aswire version`.

use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "aswire-cli", "--bin", "aswire", "--"]);
    cmd
}

#[test]
fn test_types_json_lists_notification_params() {
    let output = cargo_bin()
        .args(["--json", "types"])
        .output()
        .expect("Failed to run types command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["schema_version"].as_u64(), Some(1));

    let types = json["types"].as_array().expect("types should be an array");
    let navigation = types
        .iter()
        .find(|t| t["name"] == "AnalysisNavigationParams")
        .expect("AnalysisNavigationParams should be listed");
    assert_eq!(navigation["role"], "notification");
    assert_eq!(navigation["message"], "analysis.navigation");

    let position = types
        .iter()
        .find(|t| t["name"] == "Position")
        .expect("Position should be listed");
    assert_eq!(position["role"], "value");
    assert!(position.get("message").is_none());
}

#[test]
fn test_version_json() {
    let output = cargo_bin()
        .args(["--json", "version"])
        .output()
        .expect("Failed to run version command");

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert!(json["version"].is_string());
    assert_eq!(json["protocol_version"], "1.38.0");
}

#[test]
fn test_version_human() {
    let output = cargo_bin()
        .arg("version")
        .output()
        .expect("Failed to run version command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("aswire "), "stdout: {stdout}");
}
