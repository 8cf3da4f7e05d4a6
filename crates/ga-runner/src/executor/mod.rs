pub mod process;

use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure,
    Timeout,
    /// The program could not be started at all (missing binary, bad cwd).
    SpawnFailed,
}

impl CommandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Timeout => "timeout",
            Self::SpawnFailed => "spawn-failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: CommandStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

#[async_trait::async_trait]
pub trait Executor: Send + Sync {
    async fn run_command(
        &self,
        program: &OsStr,
        args: &[String],
        work_dir: &Path,
        timeout: Duration,
    ) -> CommandOutput;
}
