use std::path::PathBuf;

use thiserror::Error;

/// Failure of the diff source. Always fatal for a review run.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Git not found: {0}")]
    GitUnavailable(String),

    #[error("No changes detected")]
    NoChanges,

    #[error("git {command} failed: {stderr}")]
    Command { command: String, stderr: String },
}

/// Failure of the linter subsystem as a whole (not of a single file).
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Linter environment unusable: {0}")]
    Environment(String),
}

/// Raised while assembling the review context. Aborts the whole run.
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Cannot obtain git diff: {0}")]
    Diff(#[from] DiffError),

    #[error("Linter failed: {0}")]
    Lint(#[from] LintError),
}

/// A single changed file could not be read. Recovered by the gatherer.
#[derive(Error, Debug)]
pub enum FileReadError {
    #[error("File not found. Path: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Error read {}. Cause: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of one model's review. Isolated to that model's slot.
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Model did not return valid JSON: {0}")]
    MalformedResponse(String),

    #[error("Response does not match schema: {0}")]
    Schema(String),

    #[error("Review contract violated: {0}")]
    ContractViolation(String),

    #[error("Review task aborted: {0}")]
    Task(String),
}

/// Invalid input to the model run coordinator.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("No models configured")]
    NoModels,

    #[error("Model listed more than once: {0}")]
    DuplicateModel(String),
}
