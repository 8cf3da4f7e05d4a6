//! # ga-core
//!
//! Data model, error taxonomy and port traits shared by the git-agent
//! crates. Nothing in here performs I/O.

pub mod error;
pub mod ports;
pub mod types;

pub use error::{ContextError, CoordinatorError, DiffError, FileReadError, LintError, ReviewError};
pub use ports::{DiffSource, FileReader, Linter, ReadOutcome, ReviewAgent, SkipReason};
pub use types::*;
