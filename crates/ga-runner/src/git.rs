use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use ga_core::{DiffError, DiffSource, GitDiff};

use crate::executor::{CommandOutput, CommandStatus, Executor};

const GIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Find the working tree root of the repository containing `path`.
///
/// Honors `GIT_DIR` and `GIT_WORK_TREE`, as git does inside hooks.
pub fn discover_root(path: &Path) -> Result<PathBuf, DiffError> {
    let repo =
        gix::discover_with_environment_overrides(path).map_err(|_| DiffError::NotARepository)?;
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or(DiffError::NotARepository)
}

/// Reads the pending change set by shelling out to the `git` executable.
pub struct GitDiffSource {
    executor: Arc<dyn Executor>,
    root: PathBuf,
    git: OsString,
}

impl GitDiffSource {
    pub fn new(executor: Arc<dyn Executor>, root: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            root: root.into(),
            git: gix::path::env::exe_invocation().as_os_str().to_owned(),
        }
    }

    async fn git(&self, args: &[&str]) -> CommandOutput {
        let mut full = vec!["-c".to_string(), "core.quotepath=off".to_string()];
        full.extend(args.iter().map(|a| a.to_string()));
        self.executor
            .run_command(&self.git, &full, &self.root, GIT_TIMEOUT)
            .await
    }

    async fn checked(&self, args: &[&str]) -> Result<String, DiffError> {
        let out = self.git(args).await;
        match out.status {
            CommandStatus::Success => Ok(out.stdout),
            CommandStatus::SpawnFailed => Err(DiffError::GitUnavailable(out.stderr)),
            CommandStatus::Failure | CommandStatus::Timeout => Err(DiffError::Command {
                command: args.join(" "),
                stderr: out.stderr.trim().to_string(),
            }),
        }
    }
}

fn with_staged<'a>(mut args: Vec<&'a str>, staged_only: bool) -> Vec<&'a str> {
    if staged_only {
        args.push("--staged");
    }
    args
}

#[async_trait]
impl DiffSource for GitDiffSource {
    async fn get_diff(&self, staged_only: bool) -> Result<GitDiff, DiffError> {
        let probe = self.git(&["rev-parse", "--git-dir"]).await;
        match probe.status {
            CommandStatus::Success => {}
            CommandStatus::SpawnFailed => return Err(DiffError::GitUnavailable(probe.stderr)),
            CommandStatus::Failure | CommandStatus::Timeout => return Err(DiffError::NotARepository),
        }

        let diff = self
            .checked(&with_staged(vec!["diff", "--no-color", "--unified=0"], staged_only))
            .await?;
        let files_changed: Vec<String> = self
            .checked(&with_staged(vec!["diff", "--name-only"], staged_only))
            .await?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        if diff.trim().is_empty() && files_changed.is_empty() {
            return Err(DiffError::NoChanges);
        }

        debug!(
            staged_only,
            files = files_changed.len(),
            bytes = diff.len(),
            "collected git diff"
        );
        Ok(GitDiff {
            diff,
            files_changed,
        })
    }
}
