//! `wsops update` end to end: token, git status, accepted update, polling.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use mockito::{Matcher, Mock, Server};
use predicates::str::contains;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_settings(dir: &TempDir, server: &Server) -> PathBuf {
    let path = dir.path().join("settings.yaml");
    let yaml = format!(
        "api_base_url: {url}/v1\n\
         authority_host: {url}\n\
         request_timeout_secs: 5\n\
         poll:\n  initial_delay_secs: 0\n  interval_secs: 0\n",
        url = server.url()
    );
    fs::write(&path, yaml).expect("write settings");
    path
}

fn wsops_cmd(home: &Path, settings: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wsops"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("RUST_LOG")
        .arg("--settings")
        .arg(settings);
    cmd
}

fn update_args() -> [&'static str; 13] {
    [
        "update",
        "--workspace-id",
        "ws-1",
        "--tenant-id",
        "tenant-1",
        "--client-id",
        "client-1",
        "--client-secret",
        "s3cr3t",
        "--user-name",
        "ops@example.com",
        "--password",
        "hunter2",
    ]
}

fn token_mock(server: &mut Server) -> Mock {
    server
        .mock("POST", "/tenant-1/oauth2/v2.0/token")
        .match_body(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token_type":"Bearer","access_token":"tkn"}"#)
        .create()
}

fn status_mock(server: &mut Server) -> Mock {
    server
        .mock("GET", "/v1/workspaces/ws-1/git/status")
        .match_header("authorization", "Bearer tkn")
        .with_status(200)
        .with_body(r#"{"remoteCommitHash":"abc","workspaceHead":"def"}"#)
        .create()
}

fn accepted_update_mock(server: &mut Server, location: &str) -> Mock {
    server
        .mock("POST", "/v1/workspaces/ws-1/git/updateFromGit")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "remoteCommitHash": "abc",
            "workspaceHead": "def"
        })))
        .with_status(202)
        .with_header("Location", location)
        .create()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn accepted_update_polls_until_done() {
    let mut server = Server::new();
    let location = format!("{}/ops/123", server.url());
    let token = token_mock(&mut server);
    status_mock(&mut server);
    accepted_update_mock(&mut server, &location);
    let running = server
        .mock("GET", "/ops/123")
        .match_header("authorization", "Bearer tkn")
        .with_status(202)
        .with_body(r#"{"Status":"Running"}"#)
        .expect(2)
        .create();
    let done = server
        .mock("GET", "/ops/123")
        .with_status(200)
        .with_body(r#"{"status":"Succeeded"}"#)
        .expect(1)
        .create();

    let home = TempDir::new().unwrap();
    let settings = write_settings(&home, &server);
    wsops_cmd(home.path(), &settings)
        .args(update_args())
        .assert()
        .success()
        .stdout(contains("synced from git"))
        .stderr(contains("git sync completed"));

    token.assert();
    running.assert();
    done.assert();
}

#[test]
fn synchronous_update_succeeds_without_polling() {
    let mut server = Server::new();
    token_mock(&mut server);
    status_mock(&mut server);
    server
        .mock("POST", "/v1/workspaces/ws-1/git/updateFromGit")
        .with_status(200)
        .create();
    let ops = server
        .mock("GET", Matcher::Regex("^/ops/".into()))
        .expect(0)
        .create();

    let home = TempDir::new().unwrap();
    let settings = write_settings(&home, &server);
    wsops_cmd(home.path(), &settings)
        .args(update_args())
        .assert()
        .success()
        .stdout(contains("synced from git"));
    ops.assert();
}

#[test]
fn failed_operation_is_a_warning_unless_strict() {
    let mut server = Server::new();
    let location = format!("{}/ops/bad", server.url());
    token_mock(&mut server);
    status_mock(&mut server);
    accepted_update_mock(&mut server, &location);
    server
        .mock("GET", "/ops/bad")
        .with_status(400)
        .with_body(r#"{"Status":"Failed"}"#)
        .create();

    let home = TempDir::new().unwrap();
    let settings = write_settings(&home, &server);

    wsops_cmd(home.path(), &settings)
        .args(update_args())
        .assert()
        .success()
        .stdout(contains("status 'Failed'"));

    wsops_cmd(home.path(), &settings)
        .args(update_args())
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("ended with status 'Failed'"));
}

#[test]
fn rejected_sign_in_aborts_before_any_api_call() {
    let mut server = Server::new();
    server
        .mock("POST", "/tenant-1/oauth2/v2.0/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"AADSTS50126"}"#)
        .create();
    let status = server
        .mock("GET", "/v1/workspaces/ws-1/git/status")
        .expect(0)
        .create();

    let home = TempDir::new().unwrap();
    let settings = write_settings(&home, &server);
    wsops_cmd(home.path(), &settings)
        .args(update_args())
        .assert()
        .failure()
        .stderr(contains("could not sign in"))
        .stderr(contains("invalid_grant"));
    status.assert();
}

#[test]
fn rejected_update_exits_non_zero_with_status() {
    let mut server = Server::new();
    token_mock(&mut server);
    status_mock(&mut server);
    server
        .mock("POST", "/v1/workspaces/ws-1/git/updateFromGit")
        .with_status(409)
        .with_body(r#"{"errorCode":"WorkspacePreviousOperationInProgress"}"#)
        .create();

    let home = TempDir::new().unwrap();
    let settings = write_settings(&home, &server);
    wsops_cmd(home.path(), &settings)
        .args(update_args())
        .assert()
        .failure()
        .stderr(contains("status 409"));
}

#[test]
fn conflict_policy_flag_overrides_settings() {
    let mut server = Server::new();
    token_mock(&mut server);
    status_mock(&mut server);
    let update = server
        .mock("POST", "/v1/workspaces/ws-1/git/updateFromGit")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "conflictResolution": {"conflictResolutionPolicy": "PreferWorkspace"}
        })))
        .with_status(200)
        .create();

    let home = TempDir::new().unwrap();
    let settings = write_settings(&home, &server);
    wsops_cmd(home.path(), &settings)
        .args(update_args())
        .args(["--conflict-policy", "prefer-workspace"])
        .assert()
        .success();
    update.assert();
}
