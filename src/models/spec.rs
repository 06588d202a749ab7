use super::code::{CodeItem, CodeKind};
use super::mismatch::Mismatch;
use serde::Serialize;
use serde_json::{json, Value};

/// One requirement declared by a specification document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecRequirement {
    pub name: String,
    /// `None` when the declaration kind could not be determined
    pub kind: Option<CodeKind>,
    /// Heading that owns the requirement
    pub section: String,
    /// Raw declaration text
    pub description: String,
    /// 1-indexed line in the document
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Partial,
}

impl MatchType {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 1.0 {
            MatchType::Exact
        } else {
            MatchType::Partial
        }
    }
}

/// A requirement paired with the code item that satisfies it
#[derive(Debug, Clone, Serialize)]
pub struct SpecMatch<'a> {
    pub requirement: SpecRequirement,
    pub code_item: &'a CodeItem,
    pub match_type: MatchType,
    /// Always within `[threshold, 1.0]`
    pub confidence: f64,
}

/// Result of reconciling the specification tree against the inventory
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpecMatchReport<'a> {
    pub matches: Vec<SpecMatch<'a>>,
    pub mismatches: Vec<Mismatch>,
    /// Public items that no requirement matched
    pub unspecified: Vec<&'a CodeItem>,
    pub match_percentage: f64,
    pub total_spec: usize,
    pub total_matched: usize,
}

impl SpecMatchReport<'_> {
    pub fn to_compact_json(&self) -> Value {
        json!({
            "match_cnt": self.matches.len(),
            "mismatch_cnt": self.mismatches.len(),
            "unspec_cnt": self.unspecified.len(),
            "match_pct": self.match_percentage,
            "tot_spec": self.total_spec,
        })
    }
}
