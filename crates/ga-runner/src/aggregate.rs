use std::collections::HashMap;
use std::time::Duration;

use ga_core::{ModelRunOutcome, ReviewResult};

/// Merged view over one coordinator run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub results: HashMap<String, ReviewResult>,
    pub durations: HashMap<String, Duration>,
    /// Worst status over the successful models. 0 when no model succeeded.
    pub exit_code: i32,
}

impl Aggregate {
    /// Models from `models` that produced no result, in input order.
    pub fn failed_models<'a>(&self, models: &'a [String]) -> Vec<&'a str> {
        models
            .iter()
            .filter(|m| !self.results.contains_key(m.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn all_failed(&self) -> bool {
        self.results.is_empty()
    }
}

/// Fold per-model outcomes into lookup maps and a single exit code.
///
/// Pure: the same input always yields the same aggregate.
pub fn aggregate(outcomes: &[Option<ModelRunOutcome>]) -> Aggregate {
    let mut agg = Aggregate::default();
    for outcome in outcomes.iter().flatten() {
        agg.exit_code = agg.exit_code.max(outcome.result.approval_status.exit_code());
        agg.results.insert(outcome.model.clone(), outcome.result.clone());
        agg.durations.insert(outcome.model.clone(), outcome.duration);
    }
    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use ga_core::{ApprovalStatus, CommitMessage, CommitType};
    use std::collections::BTreeSet;

    fn outcome(model: &str, status: ApprovalStatus, secs: u64) -> Option<ModelRunOutcome> {
        Some(ModelRunOutcome {
            model: model.to_string(),
            result: ReviewResult {
                summary: format!("{model} review"),
                critical_bugs: vec![],
                warnings: vec![],
                style_suggestions: vec![],
                commit_proposals: vec![CommitMessage {
                    commit_type: CommitType::Chore,
                    scope: "repo".to_string(),
                    description: "update".to_string(),
                    body: None,
                    breaking: false,
                    footer: None,
                    files: vec![],
                }],
                approval_status: status,
                files_reviewed: 1,
                languages_detected: BTreeSet::new(),
                additional_notes: None,
            },
            duration: Duration::from_secs(secs),
        })
    }

    fn models(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_approved_exits_zero() {
        let agg = aggregate(&[
            outcome("a", ApprovalStatus::Approved, 1),
            outcome("b", ApprovalStatus::NeedsFixes, 2),
        ]);
        assert_eq!(agg.exit_code, 0);
        assert_eq!(agg.results.len(), 2);
        assert_eq!(agg.durations["b"], Duration::from_secs(2));
    }

    #[test]
    fn test_any_rejection_exits_one() {
        let agg = aggregate(&[
            outcome("a", ApprovalStatus::Approved, 1),
            None,
            outcome("c", ApprovalStatus::Rejected, 3),
        ]);
        assert_eq!(agg.exit_code, 1);
        assert_eq!(agg.failed_models(&models(&["a", "b", "c"])), vec!["b"]);
    }

    #[test]
    fn test_all_failed_exits_zero() {
        let agg = aggregate(&[None, None]);
        assert_eq!(agg.exit_code, 0);
        assert!(agg.all_failed());
        assert!(agg.results.is_empty());
        assert!(agg.durations.is_empty());
        assert_eq!(agg.failed_models(&models(&["x", "y"])), vec!["x", "y"]);
    }

    #[test]
    fn test_failed_model_skipped() {
        let agg = aggregate(&[outcome("m1", ApprovalStatus::Approved, 4), None]);
        assert_eq!(agg.results.keys().collect::<Vec<_>>(), vec!["m1"]);
        assert_eq!(agg.durations.keys().collect::<Vec<_>>(), vec!["m1"]);
        assert_eq!(agg.exit_code, 0);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let input = vec![
            outcome("a", ApprovalStatus::Rejected, 1),
            None,
            outcome("c", ApprovalStatus::Approved, 2),
        ];
        assert_eq!(aggregate(&input), aggregate(&input));
    }
}
