//! # ga-runner
//!
//! The review pipeline: adapters for git, the filesystem and linters, the
//! context gatherer, the Ollama review backend, and the coordinator that
//! runs several models side by side.

pub mod agent;
pub mod aggregate;
pub mod context;
pub mod coordinator;
pub mod executor;
pub mod fs;
pub mod git;
pub mod linter;
pub mod progress;

pub use agent::AgentFactory;
pub use aggregate::{aggregate, Aggregate};
pub use context::ContextGatherer;
pub use coordinator::{Coordinator, DEFAULT_MAX_WORKERS};
pub use executor::{CommandOutput, CommandStatus, Executor};
pub use progress::{LogObserver, ModelState, NoopObserver, ProgressObserver};
