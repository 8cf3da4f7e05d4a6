use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

// ── File content ──

/// Content of one changed file as sent to the reviewers.
///
/// `line_count` is derived from `content` and cannot drift from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    language: String,
    content: String,
    line_count: usize,
}

impl FileContent {
    pub fn new(language: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let line_count = content.lines().count();
        Self {
            language: language.into(),
            content,
            line_count,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }
}

// ── Lint report ──

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LintIssue {
    pub file: String,
    pub language: String,
    pub linter: String,
    pub message: String,
}

/// Linter findings for the changed files.
///
/// `by_language` is always an exact partition of `issues`: it is derived in
/// [`LintReport::from_issues`] and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintReport {
    issues: Vec<LintIssue>,
    by_language: BTreeMap<String, Vec<LintIssue>>,
    linters_used: BTreeSet<String>,
}

impl LintReport {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_issues(issues: Vec<LintIssue>) -> Self {
        let mut by_language: BTreeMap<String, Vec<LintIssue>> = BTreeMap::new();
        let mut linters_used = BTreeSet::new();
        for issue in &issues {
            linters_used.insert(issue.linter.clone());
            by_language
                .entry(issue.language.clone())
                .or_default()
                .push(issue.clone());
        }
        Self {
            issues,
            by_language,
            linters_used,
        }
    }

    pub fn issues(&self) -> &[LintIssue] {
        &self.issues
    }

    pub fn by_language(&self) -> &BTreeMap<String, Vec<LintIssue>> {
        &self.by_language
    }

    pub fn linters_used(&self) -> &BTreeSet<String> {
        &self.linters_used
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

// ── Git diff ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitDiff {
    pub diff: String,
    pub files_changed: Vec<String>,
}

// ── Review context ──

/// Everything a reviewer sees. Built once per invocation and shared
/// read-only (behind an `Arc`) by every concurrent model run.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewContext {
    diff: String,
    files_changed: Vec<String>,
    file_contents: BTreeMap<String, FileContent>,
    linter_results: LintReport,
}

impl ReviewContext {
    pub fn new(
        diff: String,
        files_changed: Vec<String>,
        file_contents: BTreeMap<String, FileContent>,
        linter_results: LintReport,
    ) -> Self {
        Self {
            diff,
            files_changed,
            file_contents,
            linter_results,
        }
    }

    pub fn diff(&self) -> &str {
        &self.diff
    }

    pub fn files_changed(&self) -> &[String] {
        &self.files_changed
    }

    pub fn file_contents(&self) -> &BTreeMap<String, FileContent> {
        &self.file_contents
    }

    pub fn linter_results(&self) -> &LintReport {
        &self.linter_results
    }

    /// Changed files that were actually read, in `files_changed` order.
    pub fn readable_files(&self) -> impl Iterator<Item = (&str, &FileContent)> {
        self.files_changed
            .iter()
            .filter_map(|path| self.file_contents.get(path).map(|c| (path.as_str(), c)))
    }

    pub fn languages(&self) -> BTreeSet<String> {
        self.file_contents
            .values()
            .map(|c| c.language().to_string())
            .collect()
    }
}

// ── Review enums ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Formatting,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Formatting => "formatting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Approved,
    NeedsFixes,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::NeedsFixes => "needs_fixes",
            Self::Rejected => "rejected",
        }
    }

    /// Process exit value contributed by a review with this status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Approved | Self::NeedsFixes => 0,
            Self::Rejected => 1,
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "needs_fixes" => Ok(Self::NeedsFixes),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown ApprovalStatus: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommitType {
    Feat,
    Fix,
    Refactor,
    Docs,
    Style,
    Test,
    Chore,
    Perf,
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Refactor => "refactor",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Test => "test",
            Self::Chore => "chore",
            Self::Perf => "perf",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StyleCategory {
    Naming,
    Structure,
    Documentation,
    Complexity,
    Duplication,
    Formatting,
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Naming => "naming",
            Self::Structure => "structure",
            Self::Documentation => "documentation",
            Self::Complexity => "complexity",
            Self::Duplication => "duplication",
            Self::Formatting => "formatting",
        };
        write!(f, "{s}")
    }
}

// ── Review result ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CodeIssue {
    pub file: String,
    pub line: u32,
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
    #[serde(default)]
    pub code_snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StyleSuggestion {
    pub category: StyleCategory,
    pub description: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CommitMessage {
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    pub scope: String,
    pub description: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub breaking: bool,
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl CommitMessage {
    pub const DEFAULT_CHUNK_SIZE: usize = 10;

    /// Conventional-commit rendering of this proposal.
    pub fn format(&self) -> String {
        let mut parts = vec![format!(
            "{}({}): {}",
            self.commit_type, self.scope, self.description
        )];

        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            parts.push(String::new());
            parts.push(body.to_string());
        }
        if self.breaking {
            parts.push(String::new());
            parts.push("BREAKING CHANGE: This introduces breaking changes".to_string());
        }
        if let Some(footer) = self.footer.as_deref().filter(|f| !f.is_empty()) {
            parts.push(String::new());
            parts.push(footer.to_string());
        }

        parts.join("\n")
    }

    /// Shell commands that stage `files` in chunks and create the commit.
    pub fn commit_commands(&self, chunk_size: usize) -> Vec<String> {
        let msg = self.format().replace('"', "\\\"");
        let mut cmds: Vec<String> = self
            .files
            .chunks(chunk_size.max(1))
            .map(|chunk| {
                let files = chunk
                    .iter()
                    .map(|f| format!("\"{f}\""))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("git add {files}")
            })
            .collect();
        cmds.push(format!("git commit -m \"{msg}\""));
        cmds
    }
}

/// Structured verdict produced by one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewResult {
    pub summary: String,
    #[serde(default)]
    pub critical_bugs: Vec<CodeIssue>,
    #[serde(default)]
    pub warnings: Vec<CodeIssue>,
    #[serde(default)]
    pub style_suggestions: Vec<StyleSuggestion>,
    pub commit_proposals: Vec<CommitMessage>,
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub files_reviewed: usize,
    #[serde(default)]
    pub languages_detected: BTreeSet<String>,
    #[serde(default)]
    pub additional_notes: Option<String>,
}

impl ReviewResult {
    /// JSON schema handed to backends that support constrained output.
    pub fn json_schema() -> serde_json::Value {
        schemars::schema_for!(ReviewResult).to_value()
    }

    /// Check the invariants a reviewer is contracted to uphold.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if self.commit_proposals.is_empty() {
            return Err(ReviewError::Schema(
                "commit_proposals must contain at least one proposal".to_string(),
            ));
        }
        if !self.critical_bugs.is_empty() && self.approval_status != ApprovalStatus::Rejected {
            return Err(ReviewError::ContractViolation(format!(
                "{} critical bug(s) reported but status is '{}' instead of 'rejected'",
                self.critical_bugs.len(),
                self.approval_status
            )));
        }
        Ok(())
    }
}

// ── Model run outcome ──

/// A successful review by one model, with its wall-clock duration.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRunOutcome {
    pub model: String,
    pub result: ReviewResult,
    pub duration: Duration,
}

impl ModelRunOutcome {
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}
