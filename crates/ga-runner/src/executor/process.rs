use std::ffi::OsStr;
use std::path::Path;
use std::time::{Duration, Instant};
use super::{CommandOutput, CommandStatus, Executor};

/// Runs programs directly (no shell), inheriting the caller's environment.
pub struct ProcessExecutor;

impl ProcessExecutor {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self { Self }
}

#[async_trait::async_trait]
impl Executor for ProcessExecutor {
    async fn run_command(
        &self,
        program: &OsStr,
        args: &[String],
        work_dir: &Path,
        timeout: Duration,
    ) -> CommandOutput {
        let start = Instant::now();
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args);
        cmd.current_dir(work_dir);
        cmd.kill_on_drop(true);
        let result = tokio::time::timeout(timeout, cmd.output()).await;
        let duration = start.elapsed();
        match result {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                let status = if output.status.success() { CommandStatus::Success } else { CommandStatus::Failure };
                CommandOutput { status, stdout, stderr, duration }
            }
            Ok(Err(e)) => CommandOutput {
                status: CommandStatus::SpawnFailed, stdout: String::new(),
                stderr: format!("{}: {e}", program.to_string_lossy()), duration,
            },
            Err(_) => CommandOutput {
                status: CommandStatus::Timeout, stdout: String::new(),
                stderr: format!("command timed out after {}s", timeout.as_secs()), duration,
            },
        }
    }
}
