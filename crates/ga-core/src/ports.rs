//! Seams between the review pipeline and the outside world.
//!
//! Every collaborator the pipeline consumes is an async trait object so the
//! coordinator and the context gatherer can be exercised with in-memory
//! fakes.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{DiffError, FileReadError, LintError, ReviewError};
use crate::types::{FileContent, GitDiff, LintReport, ReviewContext, ReviewResult};

/// Why a readable file was left out of the review context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Matches the lockfile/binary ignore list.
    Ignored,
    Empty,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignored => "File ignored by policy",
            Self::Empty => "File is empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Read(FileContent),
    Skipped(SkipReason),
}

#[async_trait]
pub trait DiffSource: Send + Sync {
    async fn get_diff(&self, staged_only: bool) -> Result<GitDiff, DiffError>;
}

#[async_trait]
pub trait FileReader: Send + Sync {
    async fn read(&self, path: &Path, max_lines: Option<usize>) -> Result<ReadOutcome, FileReadError>;
}

#[async_trait]
pub trait Linter: Send + Sync {
    async fn run(&self, paths: &[String]) -> Result<LintReport, LintError>;
}

/// A language-model reviewer bound to one model id.
#[async_trait]
pub trait ReviewAgent: Send + Sync {
    fn model(&self) -> &str;

    async fn review(
        &self,
        context: &ReviewContext,
        user_note: &str,
    ) -> Result<ReviewResult, ReviewError>;
}
