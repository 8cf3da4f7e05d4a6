use std::fmt;

use tracing::{debug, info};

/// Lifecycle of one model's run as seen by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelState {
    Starting,
    Running,
    Done,
    Failed(String),
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => f.write_str("starting"),
            Self::Running => f.write_str("running"),
            Self::Done => f.write_str("done"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Receives state transitions for every model.
///
/// Calls for different models interleave arbitrarily and may arrive from
/// worker tasks, so implementations must be thread-safe.
pub trait ProgressObserver: Send + Sync {
    fn on_state(&self, model: &str, state: &ModelState);
}

pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_state(&self, _model: &str, _state: &ModelState) {}
}

/// Reports transitions through `tracing`. Failures are already logged by
/// the coordinator, so they only show up here at debug level.
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_state(&self, model: &str, state: &ModelState) {
        match state {
            ModelState::Starting => info!(model, "Queued model {model}"),
            ModelState::Running => info!(model, "Model {model} analyzing..."),
            ModelState::Done => info!(model, "Model {model} completed"),
            ModelState::Failed(reason) => debug!(model, "Model {model} finished with error: {reason}"),
        }
    }
}
