use predicates::prelude::*;
use tempfile::TempDir;

use crate::common::{git_agent, init_repo, repo_with_staged_change, DEAD_HOST};

#[test]
fn help_lists_options() {
    let home = TempDir::new().unwrap();
    git_agent(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--models"))
        .stdout(predicate::str::contains("--unstaged"));
}

#[test]
fn outside_repository_exits_2() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    git_agent(home.path())
        .args(["--host", DEAD_HOST])
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Not a git repository"));
}

#[test]
fn nothing_staged_exits_2() {
    let home = TempDir::new().unwrap();
    let dir = init_repo();
    std::fs::write(dir.path().join("draft.py"), "x = 1\n").unwrap();

    git_agent(home.path())
        .args(["--host", DEAD_HOST])
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No changes detected"));
}

#[test]
fn duplicate_models_exit_2() {
    let home = TempDir::new().unwrap();
    let dir = repo_with_staged_change();
    git_agent(home.path())
        .args(["--host", DEAD_HOST, "--models", "a,b,a"])
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Model listed more than once: a"));
}

#[test]
fn broken_config_file_exits_2() {
    let home = TempDir::new().unwrap();
    let dir = repo_with_staged_change();
    let config = home.path().join("broken.toml");
    std::fs::write(&config, "[review\nmodels = ").unwrap();

    git_agent(home.path())
        .arg("--config")
        .arg(&config)
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn all_models_unreachable_exits_0() {
    let home = TempDir::new().unwrap();
    let dir = repo_with_staged_change();
    git_agent(home.path())
        .args(["--host", DEAD_HOST, "--models", "m1,m2"])
        .current_dir(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Model Comparison"))
        .stdout(predicate::str::contains("FAILED"));
}
