pub mod api;
pub mod code;
pub mod config;
pub mod coverage;
pub mod mismatch;
pub mod reference;
pub mod report;
pub mod spec;

pub use api::{ApiFunction, ApiMatch, ApiMatchReport};
pub use code::{CodeAnalysis, CodeItem, CodeKind};
pub use config::{
    find_project_root, DirectoryConfig, MatchingConfig, ParityConfig, ReferenceConfig, SpecConfig,
};
pub use coverage::{TestAnalysisReport, TestRequirement};
pub use mismatch::{Mismatch, MismatchKind};
pub use reference::{BrokenKind, BrokenReference, Reference, ReferenceKind, ReferenceReport};
pub use report::{Finding, FindingKind, ParityReport, Severity, Stage};
pub use spec::{MatchType, SpecMatch, SpecMatchReport, SpecRequirement};
