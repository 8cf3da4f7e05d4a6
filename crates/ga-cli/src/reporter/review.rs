use std::fmt::Write as _;
use std::time::Duration;

use colored::{ColoredString, Colorize};

use ga_core::{ApprovalStatus, CodeIssue, CommitMessage, ReviewResult, StyleSuggestion};

pub fn paint(status: ApprovalStatus, text: &str) -> ColoredString {
    match status {
        ApprovalStatus::Approved => text.green(),
        ApprovalStatus::NeedsFixes => text.yellow(),
        ApprovalStatus::Rejected => text.red(),
    }
}

/// Model / time / status block printed above a single review.
pub fn render_model_header(model: &str, duration: Option<Duration>, status: Option<ApprovalStatus>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Model:".cyan(), model.bold());
    if let Some(d) = duration {
        let _ = writeln!(out, "{} {:.2}s", "Time:".cyan(), d.as_secs_f64());
    }
    match status {
        Some(s) => {
            let _ = writeln!(out, "{} {}", "Status:".cyan(), paint(s, s.as_str()).bold());
        }
        None => {
            let _ = writeln!(out, "{} {}", "Status:".cyan(), "FAILED".red().bold());
        }
    }
    out
}

fn render_issues(out: &mut String, title: &str, issues: &[CodeIssue], status: ApprovalStatus) {
    let _ = writeln!(out, "\n{}", paint(status, &title.to_uppercase()).bold());
    for issue in issues {
        let line = format!("• {}:{} - {}", issue.file, issue.line, issue.description);
        let _ = writeln!(out, "{}", paint(status, &line));
        let _ = writeln!(out, "  {}", format!("Suggestion: {}", issue.suggestion).dimmed());
        if let Some(snippet) = issue.code_snippet.as_deref().filter(|s| !s.trim().is_empty()) {
            for l in snippet.lines() {
                let _ = writeln!(out, "    {}", l.dimmed());
            }
        }
    }
}

fn render_style(out: &mut String, suggestions: &[StyleSuggestion]) {
    let _ = writeln!(out, "\n{}", "STYLE SUGGESTIONS".cyan().bold());
    for s in suggestions {
        let location = match (&s.file, s.line) {
            (Some(file), Some(line)) => format!("{file}:{line}"),
            (Some(file), None) => file.clone(),
            _ => "General".to_string(),
        };
        let _ = writeln!(out, "- [{}] {}: {}", s.category, location, s.description);
        if let Some(example) = &s.example {
            let _ = writeln!(out, "  {}", format!("Example: {example}").dimmed());
        }
    }
}

fn render_commits(out: &mut String, commits: &[CommitMessage]) {
    let _ = writeln!(out, "\n{}", "COMMIT PROPOSALS".cyan().bold());
    for (i, commit) in commits.iter().enumerate() {
        let _ = writeln!(out, "\n{}", format!("Option {}", i + 1).bold());
        for line in commit.format().lines() {
            let _ = writeln!(out, "  {line}");
        }
        if !commit.files.is_empty() {
            let _ = writeln!(out, "  {}", "Commands:".dimmed());
            for cmd in commit.commit_commands(CommitMessage::DEFAULT_CHUNK_SIZE) {
                let _ = writeln!(out, "    {}", cmd.dimmed());
            }
        }
    }
}

/// Full body of one model's review.
pub fn render_review(result: &ReviewResult) -> String {
    let status = result.approval_status;
    let mut out = String::new();

    let header = format!(
        "STATUS: {} | Files reviewed: {}",
        status.as_str().to_uppercase(),
        result.files_reviewed
    );
    let _ = writeln!(out, "\n{}", paint(status, &header).bold());
    let _ = writeln!(out, "\n{}\n{}", "Summary".cyan().bold(), result.summary);

    if !result.critical_bugs.is_empty() {
        render_issues(&mut out, "Critical Bugs", &result.critical_bugs, ApprovalStatus::Rejected);
    }
    if !result.warnings.is_empty() {
        render_issues(&mut out, "Warnings", &result.warnings, ApprovalStatus::NeedsFixes);
    }
    if !result.style_suggestions.is_empty() {
        render_style(&mut out, &result.style_suggestions);
    }
    render_commits(&mut out, &result.commit_proposals);

    if let Some(notes) = result.additional_notes.as_deref().filter(|n| !n.is_empty()) {
        let _ = writeln!(out, "\n{}\n{}", "Additional Notes".dimmed().bold(), notes);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::tests::sample;
    use ga_core::Severity;

    #[test]
    fn test_header_for_success_and_failure() {
        colored::control::set_override(false);
        let ok = render_model_header("qwen3:8b", Some(Duration::from_millis(1234)), Some(ApprovalStatus::Approved));
        assert!(ok.contains("Model: qwen3:8b"));
        assert!(ok.contains("Time: 1.23s"));
        assert!(ok.contains("Status: approved"));

        let failed = render_model_header("qwen3:8b", None, None);
        assert!(failed.contains("Status: FAILED"));
        assert!(!failed.contains("Time:"));
    }

    #[test]
    fn test_review_body() {
        colored::control::set_override(false);
        let mut result = sample(ApprovalStatus::Rejected);
        result.critical_bugs.push(CodeIssue {
            file: "src/db.rs".to_string(),
            line: 42,
            severity: Severity::Critical,
            description: "SQL built from user input".to_string(),
            suggestion: "use bound parameters".to_string(),
            code_snippet: Some("format!(\"SELECT {id}\")".to_string()),
        });
        result.commit_proposals[0].files = vec!["src/db.rs".to_string()];
        result.additional_notes = Some("Consider a migration test.".to_string());

        let out = render_review(&result);
        assert!(out.contains("STATUS: REJECTED | Files reviewed: 3"));
        assert!(out.contains("CRITICAL BUGS"));
        assert!(out.contains("• src/db.rs:42 - SQL built from user input"));
        assert!(out.contains("Suggestion: use bound parameters"));
        assert!(out.contains("Option 1"));
        assert!(out.contains("fix(db): escape input"));
        assert!(out.contains("git add \"src/db.rs\""));
        assert!(out.contains("Additional Notes"));
        assert!(!out.contains("WARNINGS"));
    }
}
