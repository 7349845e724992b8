use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the CLI binary with arguments from `dir`, with no config override.
pub fn run_cli(dir: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cloudcms"));
    cmd.args(args);
    cmd.current_dir(dir);
    cmd.env_remove("CLOUDCMS_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI off the async runtime so the mock server keeps serving.
pub async fn run_cli_async(dir: &Path, args: &[&str]) -> Output {
    let dir = dir.to_path_buf();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli(&dir, &args)
    })
    .await
    .expect("CLI task panicked")
}

/// Run the CLI and expect success.
pub async fn run_cli_success(dir: &Path, args: &[&str]) -> String {
    let output = run_cli_async(dir, args).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub async fn run_cli_failure(dir: &Path, args: &[&str]) -> String {
    let output = run_cli_async(dir, args).await;
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// A working directory holding a `gitana.json` pointed at `server`.
pub fn workspace(server: &MockServer) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let config = json!({
        "clientKey": "test-client",
        "clientSecret": "test-secret",
        "username": "alice",
        "password": "secret123",
        "baseURL": server.uri(),
    });
    std::fs::write(dir.path().join("gitana.json"), config.to_string()).unwrap();
    dir
}

/// Start a mock server that accepts the password grant.
pub async fn mock_platform() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "token_type": "bearer",
            "refresh_token": "refresh-1",
            "expires_in": 3600,
        })))
        .mount(&server)
        .await;
    server
}
