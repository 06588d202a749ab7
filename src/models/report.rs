use super::mismatch::MismatchKind;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Severity level for a parity finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocking - fails the run
    Error,
    /// Advisory - lowers the health score only
    Warning,
}

impl Severity {
    /// Get display symbol for severity
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Error => "🔴",
            Severity::Warning => "🟡",
        }
    }

    /// Get display name for severity
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

/// Validation stage that can fail without aborting the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Spec,
    Api,
    Tests,
    References,
}

impl Stage {
    /// Key used in the report's details map
    pub fn detail_key(&self) -> &'static str {
        match self {
            Stage::Spec => "spec",
            Stage::Api => "api",
            Stage::Tests => "tests",
            Stage::References => "refs",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Spec => "Spec",
            Stage::Api => "API",
            Stage::Tests => "Test",
            Stage::References => "Reference",
        }
    }
}

/// What a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FindingKind {
    SpecCodeMismatch,
    CodeNotSpecified,
    ApiCodeMismatch(MismatchKind),
    TestCountMismatch,
    BrokenReference,
    OrphanedDocument,
    StageFailed(Stage),
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::SpecCodeMismatch => "spec_code_mismatch",
            FindingKind::CodeNotSpecified => "code_not_specified",
            FindingKind::ApiCodeMismatch(_) => "api_code_mismatch",
            FindingKind::TestCountMismatch => "test_count_mismatch",
            FindingKind::BrokenReference => "broken_reference",
            FindingKind::OrphanedDocument => "orphaned_document",
            FindingKind::StageFailed(Stage::Spec) => "spec_validation_failed",
            FindingKind::StageFailed(Stage::Api) => "api_validation_failed",
            FindingKind::StageFailed(Stage::Tests) => "test_validation_failed",
            FindingKind::StageFailed(Stage::References) => "ref_validation_failed",
        }
    }

    /// Severity table: documentation gaps and stage failures are advisory
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::SpecCodeMismatch => Severity::Error,
            FindingKind::CodeNotSpecified => Severity::Warning,
            FindingKind::ApiCodeMismatch(MismatchKind::NotDocumented) => Severity::Warning,
            FindingKind::ApiCodeMismatch(MismatchKind::NotImplemented) => Severity::Error,
            FindingKind::ApiCodeMismatch(MismatchKind::SignatureDiff) => Severity::Error,
            FindingKind::TestCountMismatch => Severity::Error,
            FindingKind::BrokenReference => Severity::Error,
            FindingKind::OrphanedDocument => Severity::Warning,
            FindingKind::StageFailed(_) => Severity::Warning,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unified parity finding; every subsystem record is translated into these
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    /// `path:line` or path of the offending artifact (empty for stage failures)
    pub source: String,
    pub issue: String,
    pub fix: String,
}

impl Finding {
    /// Create a finding; severity follows from the kind
    pub fn new(
        kind: FindingKind,
        source: impl Into<String>,
        issue: impl Into<String>,
        fix: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            source: source.into(),
            issue: issue.into(),
            fix: fix.into(),
        }
    }

    /// Format finding for display
    pub fn format(&self) -> String {
        if self.source.is_empty() {
            format!(
                "{} [{}] {} - {}",
                self.severity.symbol(),
                self.severity.name(),
                self.kind,
                self.issue
            )
        } else {
            format!(
                "{} [{}] {} - {}",
                self.severity.symbol(),
                self.severity.name(),
                self.source,
                self.issue
            )
        }
    }

    fn to_compact_json(&self, include_fix: bool) -> Value {
        let mut obj = json!({
            "type": self.kind.as_str(),
            "src": self.source,
            "issue": self.issue,
        });
        if include_fix {
            obj["fix"] = Value::String(self.fix.clone());
        }
        obj
    }
}

/// Health score: pass rate minus 2 per error and 0.5 per warning, clamped to [0, 100]
pub fn health_score(passed: usize, total: usize, errors: usize, warnings: usize) -> f64 {
    let pass_rate = if total == 0 {
        100.0
    } else {
        passed as f64 / total as f64 * 100.0
    };
    let score = pass_rate - errors as f64 * 2.0 - warnings as f64 * 0.5;
    score.clamp(0.0, 100.0)
}

/// Final output of a validation run
#[derive(Debug, Clone, Serialize)]
pub struct ParityReport {
    /// True iff there are no error-severity findings
    pub ok: bool,
    pub health_score: f64,
    pub total_checks: usize,
    pub passed_checks: usize,
    pub failed_checks: usize,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    /// Compact per-subsystem summaries keyed by subsystem name
    pub details: BTreeMap<String, Value>,
}

impl Default for ParityReport {
    fn default() -> Self {
        Self {
            ok: true,
            health_score: 100.0,
            total_checks: 0,
            passed_checks: 0,
            failed_checks: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            details: BTreeMap::new(),
        }
    }
}

impl ParityReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a finding by its severity; errors count as failed checks
    pub fn add(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Error => {
                self.failed_checks += 1;
                self.errors.push(finding);
            }
            Severity::Warning => self.warnings.push(finding),
        }
    }

    /// Derive `ok` and the health score from the accumulated findings
    pub fn finalize(&mut self) {
        self.health_score = health_score(
            self.passed_checks,
            self.total_checks,
            self.errors.len(),
            self.warnings.len(),
        );
        self.ok = self.errors.is_empty();
    }

    /// Human-readable one-line verdict
    pub fn message(&self) -> String {
        if self.ok {
            format!("Parity validation passed (health: {:.1}%)", self.health_score)
        } else {
            format!(
                "Parity validation failed ({} errors, health: {:.1}%)",
                self.errors.len(),
                self.health_score
            )
        }
    }

    /// Compact structured record; empty and zero-length fields are omitted
    pub fn to_compact_json(&self, include_fix: bool, include_details: bool) -> Value {
        let mut result = Map::new();
        result.insert("ok".into(), json!(self.ok));
        result.insert("health".into(), json!(self.health_score));
        result.insert("checks".into(), json!(self.total_checks));
        result.insert("passed".into(), json!(self.passed_checks));
        result.insert("failed".into(), json!(self.failed_checks));
        result.insert("err_cnt".into(), json!(self.errors.len()));
        result.insert("warn_cnt".into(), json!(self.warnings.len()));
        result.insert(
            "errors".into(),
            Value::Array(
                self.errors
                    .iter()
                    .map(|e| e.to_compact_json(include_fix))
                    .collect(),
            ),
        );
        result.insert(
            "warnings".into(),
            Value::Array(
                self.warnings
                    .iter()
                    .map(|w| w.to_compact_json(include_fix))
                    .collect(),
            ),
        );
        if include_details {
            let details: Map<String, Value> = self
                .details
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            result.insert("details".into(), Value::Object(details));
        }
        remove_empty(Value::Object(result))
    }
}

/// Drop null, empty-string, empty-array, and empty-object values recursively
pub fn remove_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, remove_empty(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(remove_empty).collect()),
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
