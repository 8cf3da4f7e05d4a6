use std::fmt::Write as _;

use colored::Colorize;

use ga_runner::Aggregate;

use super::review::{paint, render_review};

const COLUMNS: [(&str, usize); 7] = [
    ("Model", 22),
    ("Status", 12),
    ("Critical", 9),
    ("Warnings", 9),
    ("Files", 6),
    ("Languages", 20),
    ("Time (s)", 9),
];

fn row(cells: &[String]) -> String {
    cells
        .iter()
        .zip(COLUMNS.iter())
        .map(|(cell, (_, width))| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

/// Comparison table plus one section per model, in `models` order.
pub fn render_multi(models: &[String], agg: &Aggregate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", "Model Comparison".cyan().bold());

    let header: Vec<String> = COLUMNS.iter().map(|(name, _)| name.to_string()).collect();
    let _ = writeln!(out, "{}", row(&header).bold());
    let total_width = COLUMNS.iter().map(|(_, w)| w + 1).sum::<usize>() - 1;
    let _ = writeln!(out, "{}", "─".repeat(total_width).dimmed());

    for model in models {
        match agg.results.get(model) {
            Some(result) => {
                let time = agg
                    .durations
                    .get(model)
                    .map(|d| format!("{:.2}", d.as_secs_f64()))
                    .unwrap_or_else(|| "-".to_string());
                let languages = result
                    .languages_detected
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                let line = row(&[
                    model.clone(),
                    result.approval_status.as_str().to_string(),
                    result.critical_bugs.len().to_string(),
                    result.warnings.len().to_string(),
                    result.files_reviewed.to_string(),
                    languages,
                    time,
                ]);
                let _ = writeln!(out, "{}", paint(result.approval_status, &line));
            }
            None => {
                let line = row(&[
                    model.clone(),
                    "FAILED".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ]);
                let _ = writeln!(out, "{}", line.red());
            }
        }
    }

    for model in models {
        let _ = writeln!(out, "\n{}", format!("═══ {model} ═══").bold());
        match agg.results.get(model) {
            Some(result) => out.push_str(&render_review(result)),
            None => {
                let _ = writeln!(out, "{}", "FAILED: no review produced (see log for the cause)".red());
            }
        }
    }
    out
}
