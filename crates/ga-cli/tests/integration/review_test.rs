use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{git_agent, repo_with_staged_change};

fn review(status: &str, critical: usize) -> String {
    let bugs: Vec<_> = (0..critical)
        .map(|i| {
            json!({"file": "NOTES.md", "line": i + 1, "severity": "critical",
                   "description": "leaks a secret", "suggestion": "remove it"})
        })
        .collect();
    json!({
        "summary": format!("verdict {status}"),
        "critical_bugs": bugs,
        "commit_proposals": [{"type": "docs", "scope": "notes", "description": "add notes",
                              "files": ["NOTES.md"]}],
        "approval_status": status
    })
    .to_string()
}

async fn mount_model(server: &MockServer, model: &str, body: String) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": model })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": body })))
        .mount(server)
        .await;
}

async fn mount_tags(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "approver"}, {"name": "rejecter"}]
        })))
        .mount(server)
        .await;
}

// The binary blocks this thread; the mock server keeps running on the
// other runtime workers.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn single_model_approved_exits_0() {
    let server = MockServer::start().await;
    mount_tags(&server).await;
    mount_model(&server, "approver", review("approved", 0)).await;

    let uri = server.uri();
    let home = TempDir::new().unwrap();
    let dir = repo_with_staged_change();
    git_agent(home.path())
        .args(["--host", uri.as_str(), "--models", "approver", "please", "check"])
        .current_dir(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Model: approver"))
        .stdout(predicate::str::contains("STATUS: APPROVED | Files reviewed: 1"))
        .stdout(predicate::str::contains("docs(notes): add notes"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_rejection_exits_1() {
    let server = MockServer::start().await;
    mount_tags(&server).await;
    mount_model(&server, "approver", review("approved", 0)).await;
    mount_model(&server, "rejecter", review("rejected", 1)).await;

    let uri = server.uri();
    let home = TempDir::new().unwrap();
    let dir = repo_with_staged_change();
    git_agent(home.path())
        .args(["--host", uri.as_str(), "--models", "approver,rejecter"])
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Model Comparison"))
        .stdout(predicate::str::contains("verdict rejected"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_failure_one_approval_exits_0() {
    let server = MockServer::start().await;
    mount_tags(&server).await;
    mount_model(&server, "approver", review("approved", 0)).await;

    let uri = server.uri();
    let home = TempDir::new().unwrap();
    let dir = repo_with_staged_change();
    // "ghost" has no mock, so the server answers 404 for it.
    git_agent(home.path())
        .args(["--host", uri.as_str(), "--models", "approver,ghost"])
        .current_dir(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("verdict approved"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn models_from_config_file() {
    let server = MockServer::start().await;
    mount_tags(&server).await;
    mount_model(&server, "rejecter", review("rejected", 1)).await;

    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("git-agent");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!("[ollama]\nhost = \"{}\"\n\n[review]\nmodels = [\"rejecter\"]\n", server.uri()),
    )
    .unwrap();

    let dir = repo_with_staged_change();
    git_agent(home.path())
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Model: rejecter"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_models_prints_tags() {
    let server = MockServer::start().await;
    mount_tags(&server).await;

    let uri = server.uri();
    let home = TempDir::new().unwrap();
    git_agent(home.path())
        .args(["--host", uri.as_str(), "--list-models"])
        .assert()
        .success()
        .stdout(predicate::str::contains("approver\nrejecter"));
}
