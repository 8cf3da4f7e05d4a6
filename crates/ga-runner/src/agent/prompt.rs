use std::fmt::Write as _;

use ga_core::{ReviewContext, ReviewResult};

const MAX_DIFF_CHARS: usize = 50_000;

const REVIEWER_ROLE: &str = r#"### ROLE

You are a pragmatic Senior Software Architect and Security Auditor. You value robustness, maintainability, and security over trivial style preferences.

### INPUT DATA EXPLANATION

You will receive:

1. **User Context**: Additional instructions from the developer.
2. **Git Diff**: The raw changes.
3. **File Context**: The full content of modified files with LINE NUMBERS (format: `line_number | content`).
4. **Linter Results**: Automated checks. Trust these results; do not invent linter errors if they say "passed".

### REVIEW GUIDELINES

1. **Be Honest**: If the code is good, approve it. Do not invent bugs to look busy.
2. **Be Specific**: When citing a bug, you MUST refer to an existing line number from the "File Context".
3. **Fail Closed**: If you find a `critical` bug (security, data loss, crash), the status MUST be `rejected`.
4. **Language**: Write the human explanations in the language detected in the code.
5. **Commits**: Propose at least one conventional commit covering the staged files.

### OUTPUT STRUCTURE (JSON ONLY)

You must output a single valid JSON object and nothing else. This is the JSON Schema:
"#;

/// System prompt with the `ReviewResult` JSON schema appended.
pub fn system_prompt() -> String {
    format!("{REVIEWER_ROLE}\n{}", ReviewResult::json_schema())
}

/// Cut `s` to at most `max` bytes without splitting a character.
fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn number_lines(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let width = lines.len().to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$} | {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_review_prompt(context: &ReviewContext, user_note: &str) -> String {
    let mut out = String::from("# Request Code Review\n\n");

    if !user_note.trim().is_empty() {
        let _ = writeln!(out, "## User Context\n{user_note}\n");
    }

    let diff = truncate_on_char_boundary(context.diff(), MAX_DIFF_CHARS);
    let _ = writeln!(out, "## Git Changes (Diff)\n\n```diff\n{diff}\n```\n");

    let files: Vec<_> = context.readable_files().collect();
    let _ = writeln!(out, "## File Content Context ({} files)\n", files.len());
    for (path, file) in files {
        let _ = writeln!(
            out,
            "### File: {path} ({})\n```text\n{}\n```\n",
            file.language(),
            number_lines(file.content())
        );
    }

    let lint = context.linter_results();
    if lint.is_empty() {
        out.push_str("## Linter Results\nNo linter issues found.\n");
    } else {
        let _ = writeln!(
            out,
            "## Linter Results (Automated Checks)\n\nTotal Issues: {}\n",
            lint.issues().len()
        );
        for (language, issues) in lint.by_language() {
            let _ = writeln!(out, "### {language} Issues\n");
            for issue in issues {
                let _ = writeln!(out, "- [{}] {}: {}", issue.linter, issue.file, issue.message);
            }
        }
    }

    out
}
