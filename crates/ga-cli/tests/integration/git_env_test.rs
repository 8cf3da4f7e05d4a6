use std::process::Command as StdCommand;

use predicates::prelude::*;
use tempfile::TempDir;

use crate::common::{git_agent, init_repo, DEAD_HOST};

// Pre-commit hooks run with GIT_INDEX_FILE pointing at a temporary index.
#[test]
fn alternate_index_is_reviewed() {
    let home = TempDir::new().unwrap();
    let dir = init_repo();
    let index = dir.path().join(".git").join("hook-index");
    std::fs::write(dir.path().join("app.md"), "# App\n").unwrap();

    let out = StdCommand::new("git")
        .args(["add", "app.md"])
        .env("GIT_INDEX_FILE", &index)
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(out.status.success());

    // Nothing is staged in the regular index.
    git_agent(home.path())
        .args(["--host", DEAD_HOST])
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No changes detected"));

    git_agent(home.path())
        .args(["--host", DEAD_HOST, "--models", "m1"])
        .env("GIT_INDEX_FILE", &index)
        .current_dir(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn git_dir_and_work_tree_from_environment() {
    let home = TempDir::new().unwrap();
    let repo = crate::common::repo_with_staged_change();
    let elsewhere = TempDir::new().unwrap();

    git_agent(home.path())
        .args(["--host", DEAD_HOST, "--models", "m1"])
        .env("GIT_DIR", repo.path().join(".git"))
        .env("GIT_WORK_TREE", repo.path())
        .current_dir(elsewhere.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("FAILED"));
}
