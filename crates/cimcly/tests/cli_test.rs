//! Integration tests for the `cimcly` binary.
//!
//! Argument parsing, help output, completions and error exits need no
//! device; the end-to-end cases run against a wiremock stand-in.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `cimcly` binary with env isolation.
///
/// Clears all `CIMCLY_*` env vars and points config lookups at a
/// nonexistent path so tests never touch the user's real configuration.
fn cimcly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("cimcly");
    cmd.env("HOME", "/tmp/cimcly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/cimcly-cli-test-nonexistent")
        .env("CIMCLY_CONFIG", "/tmp/cimcly-cli-test-nonexistent/config.toml")
        .env_remove("CIMCLY_SERVER")
        .env_remove("CIMCLY_OUTPUT")
        .env_remove("CIMCLY_INSECURE")
        .env_remove("CIMCLY_TIMEOUT")
        .env_remove("CIMCLY_USERNAME")
        .env_remove("CIMCLY_PASSWORD")
        .env_remove("CIMCLY_USER_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// `cimcly_cmd` with credentials supplied through the environment.
fn cimcly_with_creds() -> assert_cmd::Command {
    let mut cmd = cimcly_cmd();
    cmd.env("CIMCLY_USERNAME", "admin")
        .env("CIMCLY_PASSWORD", "password");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const LOGIN_OK: &str = r#"<aaaLogin cookie="" response="yes" outCookie="1394044707/abc" outRefreshPeriod="600" outPriv="admin" outVersion="4.1(2f)"/>"#;
const LOGOUT_OK: &str = r#"<aaaLogout cookie="" response="yes" outStatus="success"/>"#;

async fn mount_reply(mock: &MockServer, needle: &str, body: String) {
    Mock::given(method("POST"))
        .and(path("/nuova"))
        .and(body_string_contains(needle))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(mock)
        .await;
}

async fn mount_session(mock: &MockServer) {
    mount_reply(mock, "<aaaLogin", LOGIN_OK.into()).await;
    Mock::given(method("POST"))
        .and(path("/nuova"))
        .and(body_string_contains("<aaaLogout"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGOUT_OK))
        .expect(1)
        .mount(mock)
        .await;
}

fn resolve_reply(class_id: &str, objects: &str) -> String {
    format!(
        r#"<configResolveClass cookie="1394044707/abc" response="yes" classId="{class_id}"><outConfigs>{objects}</outConfigs></configResolveClass>"#
    )
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = cimcly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    cimcly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("CIMC")
            .and(predicate::str::contains("inventory"))
            .and(predicate::str::contains("drives"))
            .and(predicate::str::contains("--server")),
    );
}

#[test]
fn test_version_flag() {
    cimcly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cimcly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    cimcly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    cimcly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = cimcly_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_power_state() {
    let output = cimcly_cmd()
        .args(["-s", "10.0.0.10", "power", "sideways"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("possible values"), "Expected value list:\n{text}");
}

#[test]
fn test_no_target() {
    let output = cimcly_cmd().arg("chassis").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(text.contains("No target servers"), "Unexpected output:\n{text}");
}

#[test]
fn test_no_credentials() {
    let output = cimcly_cmd()
        .args(["-s", "10.0.0.10", "chassis"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(text.contains("No credentials"), "Unexpected output:\n{text}");
}

#[test]
fn test_unreachable_target() {
    let output = cimcly_with_creds()
        .args(["-s", "127.0.0.1:1", "chassis"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "Expected connection exit code");
}

#[test]
fn test_destructive_command_needs_yes_without_tty() {
    let output = cimcly_with_creds()
        .args(["-s", "10.0.0.10", "power", "down"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("requires confirmation"), "Unexpected output:\n{text}");
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    cimcly_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_show_masks_passwords() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "servers = [\"10.0.0.10\"]\n\n[credentials.\"0.0.0.0\"]\nusername = \"admin\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    cimcly_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.0.0.10").and(predicate::str::contains("hunter2").not()));
}

#[test]
fn test_config_path_follows_flag() {
    cimcly_cmd()
        .args(["--config", "/tmp/elsewhere/cimcly.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/elsewhere/cimcly.toml"));
}

// ── Against a mock device ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_psu_json_from_mock_device() {
    let mock = MockServer::start().await;
    mount_session(&mock).await;
    mount_reply(
        &mock,
        r#"classId="equipmentPsu""#,
        resolve_reply(
            "equipmentPsu",
            r#"<equipmentPsu dn="sys/rack-unit-1/psu-1" id="1" model="UCSC-PSU1-770W" operability="operable"/>"#,
        ),
    )
    .await;

    let output = cimcly_with_creds()
        .args(["-s", &mock.uri(), "-o", "json-compact", "psu"])
        .output()
        .unwrap();

    let text = combined_output(&output);
    assert!(output.status.success(), "Expected success:\n{text}");
    assert!(
        String::from_utf8_lossy(&output.stdout).contains(r#""model":"UCSC-PSU1-770W""#),
        "Unexpected output:\n{text}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_interface_inventory_line() {
    let mock = MockServer::start().await;
    mount_session(&mock).await;
    mount_reply(
        &mock,
        r#"classId="adaptorUnit""#,
        resolve_reply(
            "adaptorUnit",
            r#"<adaptorUnit dn="sys/rack-unit-1/adaptor-2" pciSlot="2" id="2"/>"#,
        ),
    )
    .await;
    mount_reply(
        &mock,
        r#"classId="adaptorExtEthIf""#,
        resolve_reply(
            "adaptorExtEthIf",
            r#"<adaptorExtEthIf dn="sys/rack-unit-1/adaptor-2/ext-eth-0" portId="0" adminSpeed="40Gbps" linkState="up"/>"#,
        ),
    )
    .await;
    mount_reply(
        &mock,
        r#"classId="adaptorHostEthIf""#,
        resolve_reply(
            "adaptorHostEthIf",
            r#"<adaptorHostEthIf dn="sys/rack-unit-1/adaptor-2/host-eth-eth0" name="eth0" mac="AA:BB:CC:00:00:01" uplinkPort="0"/>"#,
        ),
    )
    .await;

    let host = mock.uri();
    let output = cimcly_with_creds()
        .args(["-s", &host, "inventory"])
        .output()
        .unwrap();

    let text = combined_output(&output);
    assert!(output.status.success(), "Expected success:\n{text}");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("{host},SLOT-2,port-0,40Gbps,up,eth0,AA:BB:CC:00:00:01")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_login_exits_with_auth_code() {
    let mock = MockServer::start().await;
    mount_reply(
        &mock,
        "<aaaLogin",
        r#"<aaaLogin response="yes" errorCode="551" errorDescr="Authentication failed"/>"#.into(),
    )
    .await;

    let output = cimcly_with_creds()
        .args(["-s", &mock.uri(), "chassis"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("Authentication failed"), "Unexpected output:\n{text}");
}
