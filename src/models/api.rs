use super::code::CodeItem;
use super::mismatch::Mismatch;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

/// A function entry declared by an API document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiFunction {
    pub name: String,
    /// Declared signature text as written in the document
    pub signature: String,
    /// Declared return type, if any
    pub returns: Option<String>,
    pub file_path: PathBuf,
    /// 1-indexed line in the document
    pub line: usize,
}

/// A documented function paired with its implementation
#[derive(Debug, Clone, Serialize)]
pub struct ApiMatch<'a> {
    pub api_function: ApiFunction,
    pub code_item: &'a CodeItem,
    /// True when the signatures agree
    pub verified: bool,
    pub issues: Vec<String>,
}

/// Result of reconciling the API documentation against the inventory
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiMatchReport<'a> {
    pub matches: Vec<ApiMatch<'a>>,
    pub mismatches: Vec<Mismatch>,
    pub coverage: f64,
    pub total_documented: usize,
    pub total_implemented: usize,
    pub total_matched: usize,
}

impl ApiMatchReport<'_> {
    pub fn verified_count(&self) -> usize {
        self.matches.iter().filter(|m| m.verified).count()
    }

    pub fn to_compact_json(&self) -> Value {
        json!({
            "match_cnt": self.matches.len(),
            "mismatch_cnt": self.mismatches.len(),
            "coverage": self.coverage,
            "documented": self.total_documented,
            "implemented": self.total_implemented,
        })
    }
}
