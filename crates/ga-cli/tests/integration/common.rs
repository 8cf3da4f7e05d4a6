use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use tempfile::TempDir;

/// `git-agent` isolated from the user's config and environment.
#[allow(deprecated)]
pub fn git_agent(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("git-agent").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("NO_COLOR", "1")
        .env_remove("GIT_AGENT_MODELS")
        .env_remove("OLLAMA_HOST")
        .env_remove("RUST_LOG")
        .env_remove("GIT_INDEX_FILE")
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE");
    cmd
}

pub fn git(dir: &Path, args: &[&str]) {
    let out = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(out.status.success(), "git {args:?}: {}", String::from_utf8_lossy(&out.stderr));
}

pub fn init_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q"]);
    dir
}

/// Repo with one staged markdown file (no linter runs for it).
pub fn repo_with_staged_change() -> TempDir {
    let dir = init_repo();
    std::fs::write(dir.path().join("NOTES.md"), "# Notes\n\nFirst entry.\n").unwrap();
    git(dir.path(), &["add", "NOTES.md"]);
    dir
}

/// An address nothing listens on.
pub const DEAD_HOST: &str = "http://127.0.0.1:9";
