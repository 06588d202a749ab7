//! Test Analyzer
//!
//! Compares the minimum test counts declared by per-unit instruction
//! documents with the tests actually present in the test tree.

use super::walk_files;
use crate::error::{EngineError, EngineResult};
use crate::models::{TestAnalysisReport, TestRequirement};
use crate::parser::DeclPatterns;
use regex::Regex;
use std::path::{Path, PathBuf};

/// A test source file with at least one test
#[derive(Debug, Clone)]
struct TestFile {
    path: PathBuf,
    /// Path relative to the test directory, lowercased
    key: String,
    tests: usize,
}

/// Analyzes declared vs actual test counts
pub struct TestAnalyzer {
    instruction_dir: PathBuf,
    test_dir: PathBuf,
    patterns: DeclPatterns,
    count_patterns: Vec<Regex>,
}

impl TestAnalyzer {
    pub fn new(
        instruction_dir: impl Into<PathBuf>,
        test_dir: impl Into<PathBuf>,
    ) -> EngineResult<Self> {
        // Tried in order; the first that matches anywhere in a document wins
        let count_patterns = [
            r"(?i)minimum\s+test\s+count:\s*(\d+)",
            r"(?i)tests?\s+required:\s*(\d+)",
            r"(?i)\*\*minimum\s+test\s+count:\*\*\s*(\d+)",
            r"(?i)target:\s*(\d+)\+?\s+tests?",
        ]
        .into_iter()
        .map(Regex::new)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            instruction_dir: instruction_dir.into(),
            test_dir: test_dir.into(),
            patterns: DeclPatterns::new()?,
            count_patterns,
        })
    }

    /// Analyze every instruction document against the test tree
    pub fn analyze(&self) -> EngineResult<TestAnalysisReport> {
        if !self.instruction_dir.is_dir() {
            return Err(EngineError::missing("instruction", &self.instruction_dir));
        }
        if !self.test_dir.is_dir() {
            return Err(EngineError::missing("test", &self.test_dir));
        }

        let test_files = self.collect_test_files()?;
        let mut report = TestAnalysisReport::default();

        for entry in walk_files(&self.instruction_dir, "md") {
            let doc_path = match entry {
                Ok(path) => path,
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable instruction path");
                    continue;
                }
            };
            let content = match std::fs::read_to_string(&doc_path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!(path = %doc_path.display(), error = %e, "skipping unreadable instruction document");
                    continue;
                }
            };
            let Some(required) = self.extract_required(&content) else {
                continue;
            };

            let (unit_id, category) = unit_identity(&doc_path);
            let mut requirement = TestRequirement::new(doc_path, unit_id, category, required);

            let unit = requirement.unit_id.to_lowercase();
            let category = requirement.category.to_lowercase();
            let contributing: Vec<&TestFile> = test_files
                .iter()
                .filter(|f| {
                    (!category.is_empty() && f.key.contains(&category))
                        || (!unit.is_empty() && f.key.contains(&unit))
                })
                .collect();
            let actual = contributing.iter().map(|f| f.tests).sum();
            requirement.record_actual(actual, contributing.iter().map(|f| f.path.clone()).collect());

            tracing::debug!(
                unit = %requirement.unit_id,
                required = requirement.required,
                actual = requirement.actual,
                "test requirement evaluated"
            );

            report.total_required += requirement.required;
            report.total_actual += requirement.actual;
            if requirement.met {
                report.total_met += 1;
            }
            report.requirements.push(requirement);
        }

        report.total_deficit = report.total_required.saturating_sub(report.total_actual);
        if report.total_required > 0 {
            report.coverage =
                (report.total_actual as f64 / report.total_required as f64 * 100.0).min(100.0);
        }

        tracing::info!(
            requirements = report.requirements.len(),
            met = report.total_met,
            deficit = report.total_deficit,
            "test analysis complete"
        );
        Ok(report)
    }

    /// Declared minimum test count, if the document declares one
    pub fn extract_required(&self, content: &str) -> Option<usize> {
        self.count_patterns.iter().find_map(|pattern| {
            pattern
                .captures(content)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
    }

    fn collect_test_files(&self) -> EngineResult<Vec<TestFile>> {
        let mut files = Vec::new();
        for entry in walk_files(&self.test_dir, "rs") {
            let path = match entry {
                Ok(path) => path,
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable test path");
                    continue;
                }
            };
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            let tests = self.patterns.count_tests(&content);
            if tests == 0 {
                continue;
            }
            let key = path
                .strip_prefix(&self.test_dir)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/")
                .to_lowercase();
            files.push(TestFile { path, key, tests });
        }
        Ok(files)
    }
}

/// Unit identifier (file stem) and category (parent directory name)
fn unit_identity(doc_path: &Path) -> (String, String) {
    let unit_id = doc_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let category = doc_path
        .parent()
        .and_then(|p| p.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (unit_id, category)
}
