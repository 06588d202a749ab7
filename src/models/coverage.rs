use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

/// Declared minimum test count for one unit, and what was found
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRequirement {
    /// Instruction document that declared the requirement
    pub doc_path: PathBuf,
    /// Unit identifier (document file stem)
    pub unit_id: String,
    /// Category (name of the directory holding the document)
    pub category: String,
    pub required: usize,
    pub actual: usize,
    /// `required - actual`, floored at zero
    pub deficit: usize,
    pub met: bool,
    /// Test files that contributed to `actual`
    pub test_files: Vec<PathBuf>,
}

impl TestRequirement {
    pub fn new(doc_path: PathBuf, unit_id: String, category: String, required: usize) -> Self {
        Self {
            doc_path,
            unit_id,
            category,
            required,
            actual: 0,
            deficit: required,
            met: required == 0,
            test_files: Vec::new(),
        }
    }

    /// Record the observed test count and derive deficit/met
    pub fn record_actual(&mut self, actual: usize, test_files: Vec<PathBuf>) {
        self.actual = actual;
        self.test_files = test_files;
        self.deficit = self.required.saturating_sub(actual);
        self.met = actual >= self.required;
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestAnalysisReport {
    pub requirements: Vec<TestRequirement>,
    pub total_required: usize,
    pub total_actual: usize,
    pub total_met: usize,
    pub total_deficit: usize,
    /// `actual / required * 100`, clamped to 100
    pub coverage: f64,
}

impl TestAnalysisReport {
    /// Requirements whose declared minimum is not met
    pub fn deficits(&self) -> impl Iterator<Item = &TestRequirement> {
        self.requirements.iter().filter(|r| !r.met)
    }

    pub fn to_compact_json(&self) -> Value {
        let deficits: Vec<Value> = self
            .deficits()
            .map(|d| {
                json!({
                    "unit": d.unit_id,
                    "cat": d.category,
                    "req": d.required,
                    "actual": d.actual,
                    "deficit": d.deficit,
                })
            })
            .collect();

        json!({
            "required": self.total_required,
            "actual": self.total_actual,
            "coverage": self.coverage,
            "met_cnt": self.total_met,
            "deficit": self.total_deficit,
            "total_reqs": self.requirements.len(),
            "deficits": deficits,
        })
    }
}
