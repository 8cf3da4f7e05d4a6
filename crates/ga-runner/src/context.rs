use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use ga_core::{ContextError, DiffSource, FileReader, Linter, ReadOutcome, ReviewContext};

/// Builds the [`ReviewContext`] every model reviews.
///
/// Diff and linter failures abort the run. A changed file that cannot be
/// read stays in `files_changed` but has no entry in `file_contents`.
pub struct ContextGatherer {
    diff_source: Arc<dyn DiffSource>,
    file_reader: Arc<dyn FileReader>,
    linter: Arc<dyn Linter>,
    staged_only: bool,
    max_lines: Option<usize>,
}

impl ContextGatherer {
    pub fn new(
        diff_source: Arc<dyn DiffSource>,
        file_reader: Arc<dyn FileReader>,
        linter: Arc<dyn Linter>,
    ) -> Self {
        Self {
            diff_source,
            file_reader,
            linter,
            staged_only: true,
            max_lines: None,
        }
    }

    pub fn staged_only(mut self, staged_only: bool) -> Self {
        self.staged_only = staged_only;
        self
    }

    pub fn max_lines(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub async fn gather(&self) -> Result<ReviewContext, ContextError> {
        debug!("Gathering context...");
        let diff = self.diff_source.get_diff(self.staged_only).await?;
        debug!("{} modified file(s)", diff.files_changed.len());

        let mut file_contents = BTreeMap::new();
        for path in &diff.files_changed {
            match self.file_reader.read(Path::new(path), self.max_lines).await {
                Ok(ReadOutcome::Read(content)) => {
                    debug!("Read {path}");
                    file_contents.insert(path.clone(), content);
                }
                Ok(ReadOutcome::Skipped(reason)) => {
                    debug!("Skipped {path}: {}", reason.as_str());
                }
                Err(e) => warn!("Could not read {path}: {e}"),
            }
        }

        debug!("Running linters...");
        let linter_results = self.linter.run(&diff.files_changed).await?;

        Ok(ReviewContext::new(
            diff.diff,
            diff.files_changed,
            file_contents,
            linter_results,
        ))
    }
}
