pub mod ollama;
pub mod parse;
pub mod prompt;

use std::sync::Arc;

use ga_core::{ReviewAgent, ReviewError};

/// Builds the reviewer for one model id.
///
/// A build failure counts as that model's failure only; the other models
/// still run.
pub trait AgentFactory: Send + Sync {
    fn build(&self, model: &str) -> Result<Arc<dyn ReviewAgent>, ReviewError>;
}

impl<F> AgentFactory for F
where
    F: Fn(&str) -> Result<Arc<dyn ReviewAgent>, ReviewError> + Send + Sync,
{
    fn build(&self, model: &str) -> Result<Arc<dyn ReviewAgent>, ReviewError> {
        self(model)
    }
}
