use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use ga_core::{LintError, LintIssue, LintReport, Linter};

use crate::executor::{CommandStatus, Executor};
use crate::fs::detect_language;

pub const LINT_TIMEOUT: Duration = Duration::from_secs(30);

const NOT_FOUND_MESSAGE: &str = "Linter timeout or not found";

/// Linter invocation for a language, as `(program, leading args)`.
fn linter_for(language: &str) -> Option<(&'static str, &'static [&'static str])> {
    match language {
        "python" => Some(("ruff", &["check"])),
        "javascript" | "typescript" => Some(("npx", &["eslint"])),
        _ => None,
    }
}

/// Runs the per-language linters on each changed file, one process per file.
pub struct ProcessLinter {
    executor: Arc<dyn Executor>,
    root: PathBuf,
    timeout: Duration,
}

impl ProcessLinter {
    pub fn new(executor: Arc<dyn Executor>, root: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            root: root.into(),
            timeout: LINT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn lint_file(&self, path: &str) -> Vec<LintIssue> {
        let language = detect_language(Path::new(path));
        let Some((program, base_args)) = linter_for(language) else {
            return Vec::new();
        };

        let mut args: Vec<String> = base_args.iter().map(|a| a.to_string()).collect();
        args.push(path.to_string());

        let out = self
            .executor
            .run_command(OsStr::new(program), &args, &self.root, self.timeout)
            .await;

        let issue = |message: String| LintIssue {
            file: path.to_string(),
            language: language.to_string(),
            linter: program.to_string(),
            message,
        };

        let lines = |text: &str| -> Vec<LintIssue> {
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(|l| issue(l.to_string()))
                .collect()
        };

        match out.status {
            // A clean run may still warn on stderr (bad config, deprecated rules).
            CommandStatus::Success => lines(&out.stderr),
            CommandStatus::Timeout | CommandStatus::SpawnFailed => {
                debug!(
                    linter = program,
                    file = path,
                    status = out.status.as_str(),
                    "{}",
                    out.stderr.trim()
                );
                vec![issue(NOT_FOUND_MESSAGE.to_string())]
            }
            CommandStatus::Failure => {
                let mut issues = lines(&out.stdout);
                issues.extend(lines(&out.stderr));
                issues
            }
        }
    }
}

#[async_trait]
impl Linter for ProcessLinter {
    async fn run(&self, paths: &[String]) -> Result<LintReport, LintError> {
        if !self.root.is_dir() {
            return Err(LintError::Environment(format!(
                "working directory {} is not accessible",
                self.root.display()
            )));
        }

        let mut issues = Vec::new();
        for path in paths {
            issues.extend(self.lint_file(path).await);
        }

        let report = LintReport::from_issues(issues);
        if !report.linters_used().is_empty() {
            let used: Vec<&str> = report.linters_used().iter().map(String::as_str).collect();
            info!("Linters: {} | {} issue(s)", used.join(", "), report.issues().len());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::CommandOutput;
    use std::sync::Mutex;

    /// Replays a canned output and records every invocation.
    struct FakeExecutor {
        output: CommandOutput,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl FakeExecutor {
        fn new(status: CommandStatus, stdout: &str, stderr: &str) -> Arc<Self> {
            Arc::new(Self {
                output: CommandOutput {
                    status,
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                    duration: Duration::ZERO,
                },
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Executor for FakeExecutor {
        async fn run_command(
            &self,
            program: &OsStr,
            args: &[String],
            _work_dir: &Path,
            _timeout: Duration,
        ) -> CommandOutput {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string_lossy().into_owned(), args.to_vec()));
            self.output.clone()
        }
    }

    fn paths(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_only_supported_languages_are_linted() {
        let exec = FakeExecutor::new(CommandStatus::Success, "", "");
        let linter = ProcessLinter::new(exec.clone(), std::env::temp_dir());

        let report = linter
            .run(&paths(&["a.py", "README.md", "web/app.ts", "main.rs"]))
            .await
            .unwrap();
        assert!(report.is_empty());

        let calls = exec.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("ruff".to_string(), paths(&["check", "a.py"])));
        assert_eq!(calls[1], ("npx".to_string(), paths(&["eslint", "web/app.ts"])));
    }

    #[tokio::test]
    async fn test_failure_output_becomes_issues() {
        let exec = FakeExecutor::new(
            CommandStatus::Failure,
            "a.py:1:1: F401 unused import\n\na.py:3:5: E711 comparison to None\n",
            "",
        );
        let linter = ProcessLinter::new(exec, std::env::temp_dir());

        let report = linter.run(&paths(&["a.py"])).await.unwrap();
        assert_eq!(report.issues().len(), 2);
        assert_eq!(report.by_language()["python"].len(), 2);
        assert_eq!(report.issues()[0].linter, "ruff");
        assert_eq!(report.issues()[1].message, "a.py:3:5: E711 comparison to None");
    }

    #[tokio::test]
    async fn test_failure_keeps_both_streams() {
        let exec = FakeExecutor::new(
            CommandStatus::Failure,
            "a.py:1:1: F401 unused import\n",
            "warning: unknown rule selector `E999`\n",
        );
        let linter = ProcessLinter::new(exec, std::env::temp_dir());

        let report = linter.run(&paths(&["a.py"])).await.unwrap();
        let messages: Vec<&str> = report.issues().iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "a.py:1:1: F401 unused import",
                "warning: unknown rule selector `E999`"
            ]
        );
    }

    #[tokio::test]
    async fn test_success_reports_stderr_only() {
        let exec = FakeExecutor::new(
            CommandStatus::Success,
            "All checks passed!\n",
            "warning: `ruff` config uses deprecated settings\n",
        );
        let linter = ProcessLinter::new(exec, std::env::temp_dir());

        let report = linter.run(&paths(&["a.py"])).await.unwrap();
        assert_eq!(report.issues().len(), 1);
        assert!(report.issues()[0].message.contains("deprecated settings"));
    }

    #[tokio::test]
    async fn test_missing_linter_is_an_issue_not_an_error() {
        let exec = FakeExecutor::new(CommandStatus::SpawnFailed, "", "npx: not found");
        let linter = ProcessLinter::new(exec, std::env::temp_dir());

        let report = linter.run(&paths(&["index.js"])).await.unwrap();
        assert_eq!(report.issues().len(), 1);
        assert_eq!(report.issues()[0].message, NOT_FOUND_MESSAGE);
        assert_eq!(report.issues()[0].language, "javascript");
    }

    #[tokio::test]
    async fn test_unusable_work_dir_is_environment_error() {
        let exec = FakeExecutor::new(CommandStatus::Success, "", "");
        let linter = ProcessLinter::new(exec, "/definitely/not/a/dir");

        let err = linter.run(&paths(&["a.py"])).await.unwrap_err();
        assert!(matches!(err, LintError::Environment(_)));
    }
}
