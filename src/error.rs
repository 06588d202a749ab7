//! Engine error types
//!
//! Only two tiers of failure are expressed as errors: the fatal inability to
//! enumerate the code root, and stage-level failures that the parity checker
//! converts into warning findings. Everything finer grained is data.

use std::path::PathBuf;

/// Failure raised by one of the engine's subsystems
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The code root could not be walked at all
    #[error("failed to walk code root '{}': {source}", path.display())]
    CodeRootUnreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A configured input directory does not exist
    #[error("{what} directory not found: {}", path.display())]
    DirectoryMissing { what: &'static str, path: PathBuf },

    /// A directory walk failed part-way
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// A document glob pattern could not be built
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A recognizer pattern failed to compile
    #[error("invalid recognizer pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl EngineError {
    pub fn missing(what: &'static str, path: impl Into<PathBuf>) -> Self {
        EngineError::DirectoryMissing {
            what,
            path: path.into(),
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
