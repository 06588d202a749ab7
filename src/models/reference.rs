use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::path::PathBuf;

/// Classification of a link, inferred from its target path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Generic,
    Spec,
    Api,
    Phase,
}

impl ReferenceKind {
    pub fn classify(target_path: &str) -> Self {
        if target_path.contains("specification") {
            ReferenceKind::Spec
        } else if target_path.contains("api") {
            ReferenceKind::Api
        } else if target_path.contains("phase") {
            ReferenceKind::Phase
        } else {
            ReferenceKind::Generic
        }
    }
}

/// One `[text](target#anchor)` occurrence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    pub source_file: PathBuf,
    pub source_line: usize,
    pub target_path: String,
    pub target_anchor: Option<String>,
    pub text: String,
    pub kind: ReferenceKind,
}

impl Reference {
    pub fn location(&self) -> String {
        format!("{}:{}", self.source_file.display(), self.source_line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokenKind {
    FileMissing,
    SectionMissing,
    InvalidFormat,
}

impl BrokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrokenKind::FileMissing => "file_missing",
            BrokenKind::SectionMissing => "section_missing",
            BrokenKind::InvalidFormat => "invalid_format",
        }
    }
}

impl fmt::Display for BrokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokenReference {
    pub reference: Reference,
    pub kind: BrokenKind,
    pub fix: String,
}

impl BrokenReference {
    pub fn new(reference: Reference, kind: BrokenKind) -> Self {
        let location = reference.location();
        let fix = match kind {
            BrokenKind::FileMissing => format!(
                "Create missing file '{}' or update reference in {}",
                reference.target_path, location
            ),
            BrokenKind::SectionMissing => format!(
                "Add section '#{}' to '{}' or update reference in {}",
                reference.target_anchor.as_deref().unwrap_or_default(),
                reference.target_path,
                location
            ),
            BrokenKind::InvalidFormat => format!("Fix reference in {}", location),
        };
        Self {
            reference,
            kind,
            fix,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferenceReport {
    pub total_refs: usize,
    pub valid_refs: usize,
    pub broken_refs: Vec<BrokenReference>,
    /// Documentation files no reference points to
    pub orphaned_docs: Vec<PathBuf>,
}

impl ReferenceReport {
    pub fn to_compact_json(&self) -> Value {
        let broken: Vec<Value> = self
            .broken_refs
            .iter()
            .map(|b| {
                json!({
                    "src": b.reference.location(),
                    "tgt": b.reference.target_path,
                    "type": b.kind.as_str(),
                    "fix": b.fix,
                })
            })
            .collect();
        let orphaned: Vec<String> = self
            .orphaned_docs
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        json!({
            "total": self.total_refs,
            "valid": self.valid_refs,
            "broken_cnt": self.broken_refs.len(),
            "orphaned_cnt": self.orphaned_docs.len(),
            "broken": broken,
            "orphaned": orphaned,
        })
    }
}
