use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Why a documented item and the code disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// Documented or specified, but no implementation was found
    NotImplemented,
    /// Implemented publicly, but never documented
    NotDocumented,
    /// Implementation found, but its signature disagrees with the docs
    SignatureDiff,
}

impl MismatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchKind::NotImplemented => "not_implemented",
            MismatchKind::NotDocumented => "not_documented",
            MismatchKind::SignatureDiff => "signature_diff",
        }
    }
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unmatched or disagreeing item, shared by the spec and API matchers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    pub kind: MismatchKind,
    /// Name of the unmatched item
    pub name: String,
    /// What the documentation declares (empty for undocumented code)
    pub expected: String,
    /// What the code declares (empty when nothing was found)
    pub actual: String,
    pub issue: String,
    pub fix: String,
    pub file_path: PathBuf,
    /// 1-indexed source line, 0 when unknown
    pub line: usize,
}

impl Mismatch {
    pub fn location(&self) -> String {
        format!("{}:{}", self.file_path.display(), self.line)
    }
}
