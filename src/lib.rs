// Paritycheck - Documentation/Code Parity Validation
// Reconciles specifications, API docs, test plans and cross-references with a Rust codebase

pub mod cli;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod validator;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};
pub use models::{Finding, FindingKind, ParityConfig, ParityReport, Severity};
pub use validator::ParityChecker;
