//! Parity Checker
//!
//! Runs the five validation stages in order and folds every subsystem
//! result into one [`ParityReport`]. Only the code analysis is fatal; any
//! later stage that fails is recorded as a single warning and the run
//! continues.

use super::{ApiMatcher, CodeAnalyzer, ReferenceValidator, SpecMatcher, TestAnalyzer};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ApiMatchReport, CodeAnalysis, Finding, FindingKind, ParityConfig, ParityReport,
    ReferenceReport, SpecMatchReport, Stage, TestAnalysisReport,
};
use std::path::{Path, PathBuf};

/// Orchestrates a full parity validation run
#[derive(Debug, Clone)]
pub struct ParityChecker {
    project_root: PathBuf,
    config: ParityConfig,
}

impl ParityChecker {
    /// Create a checker with default directories under `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config: ParityConfig::default(),
        }
    }

    /// Replace the whole configuration (directories included)
    pub fn with_config(mut self, config: ParityConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_code_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dirs.code = dir.into();
        self
    }

    pub fn with_spec_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dirs.spec = dir.into();
        self
    }

    pub fn with_api_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dirs.api = dir.into();
        self
    }

    pub fn with_instruction_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dirs.instructions = dir.into();
        self
    }

    pub fn with_test_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dirs.tests = dir.into();
        self
    }

    pub fn with_docs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dirs.docs = dir.into();
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &ParityConfig {
        &self.config
    }

    /// Directory resolved against the project root unless already absolute
    fn resolve(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.project_root.join(dir)
        }
    }

    fn stage_dir(&self, stage: Stage) -> PathBuf {
        let dirs = &self.config.dirs;
        match stage {
            Stage::Spec => self.resolve(&dirs.spec),
            Stage::Api => self.resolve(&dirs.api),
            Stage::Tests => self.resolve(&dirs.tests),
            Stage::References => self.resolve(&dirs.docs),
        }
    }

    /// Run every stage and produce the final report.
    ///
    /// Fails only when the code root cannot be enumerated.
    pub fn check(&self) -> EngineResult<ParityReport> {
        let mut report = ParityReport::new();

        // 1. Code inventory (fatal)
        let code_dir = self.resolve(&self.config.dirs.code);
        tracing::info!(root = %code_dir.display(), "analyzing code");
        let analysis = CodeAnalyzer::new(&code_dir)?.analyze()?;
        report
            .details
            .insert("code".to_string(), analysis.to_compact_json());

        // 2. Specification vs code
        match self.match_specs(&analysis) {
            Ok(spec) => {
                report
                    .details
                    .insert(Stage::Spec.detail_key().to_string(), spec.to_compact_json());
                process_spec(&mut report, &spec);
            }
            Err(e) => self.stage_failed(&mut report, Stage::Spec, &e),
        }

        // 3. API documentation vs code
        match self.match_apis(&analysis) {
            Ok(api) => {
                report
                    .details
                    .insert(Stage::Api.detail_key().to_string(), api.to_compact_json());
                process_api(&mut report, &api);
            }
            Err(e) => self.stage_failed(&mut report, Stage::Api, &e),
        }

        // 4. Declared vs actual test counts
        match self.analyze_tests() {
            Ok(tests) => {
                report
                    .details
                    .insert(Stage::Tests.detail_key().to_string(), tests.to_compact_json());
                process_tests(&mut report, &tests);
            }
            Err(e) => self.stage_failed(&mut report, Stage::Tests, &e),
        }

        // 5. Cross-references
        match self.validate_references() {
            Ok(refs) => {
                report.details.insert(
                    Stage::References.detail_key().to_string(),
                    refs.to_compact_json(),
                );
                process_references(&mut report, &refs);
            }
            Err(e) => self.stage_failed(&mut report, Stage::References, &e),
        }

        report.finalize();
        tracing::info!(
            ok = report.ok,
            health = report.health_score,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "parity check complete"
        );
        Ok(report)
    }

    fn match_specs<'a>(&self, analysis: &'a CodeAnalysis) -> EngineResult<SpecMatchReport<'a>> {
        SpecMatcher::new(self.stage_dir(Stage::Spec), analysis)?
            .with_matching(self.config.matching)
            .with_spec_config(self.config.spec.clone())
            .match_specs()
    }

    fn match_apis<'a>(&self, analysis: &'a CodeAnalysis) -> EngineResult<ApiMatchReport<'a>> {
        ApiMatcher::new(self.stage_dir(Stage::Api), analysis)?.match_apis()
    }

    fn analyze_tests(&self) -> EngineResult<TestAnalysisReport> {
        let instruction_dir = self.resolve(&self.config.dirs.instructions);
        TestAnalyzer::new(instruction_dir, self.stage_dir(Stage::Tests))?.analyze()
    }

    fn validate_references(&self) -> EngineResult<ReferenceReport> {
        ReferenceValidator::new(&self.project_root, self.stage_dir(Stage::References))
            .with_config(self.config.references.clone())
            .validate()
    }

    /// Record a failed stage as one warning; its totals stay at zero
    fn stage_failed(&self, report: &mut ParityReport, stage: Stage, err: &EngineError) {
        tracing::warn!(stage = stage.detail_key(), error = %err, "validation stage failed");

        let fix = match stage {
            Stage::Tests => format!(
                "Check instruction directory '{}' and test directory '{}'",
                self.resolve(&self.config.dirs.instructions).display(),
                self.stage_dir(stage).display()
            ),
            Stage::References => format!(
                "Check docs directory '{}'",
                self.stage_dir(stage).display()
            ),
            _ => format!(
                "Check {} directory '{}'",
                stage.display_name(),
                self.stage_dir(stage).display()
            ),
        };

        report.add(Finding::new(
            FindingKind::StageFailed(stage),
            "",
            format!("{} validation failed: {}", stage.display_name(), err),
            fix,
        ));
    }
}

// =============================================================================
// Result folding
// =============================================================================

fn process_spec(report: &mut ParityReport, spec: &SpecMatchReport<'_>) {
    report.total_checks += spec.total_spec;

    for mismatch in &spec.mismatches {
        report.add(Finding::new(
            FindingKind::SpecCodeMismatch,
            mismatch.location(),
            format!(
                "Spec requirement '{}' not implemented: {}",
                mismatch.name, mismatch.issue
            ),
            mismatch.fix.clone(),
        ));
    }

    for item in spec.unspecified.iter().filter(|item| item.public) {
        report.add(Finding::new(
            FindingKind::CodeNotSpecified,
            item.location(),
            format!("Public {} '{}' not specified", item.kind, item.name),
            format!("Add spec for '{}' or make it private", item.name),
        ));
    }

    report.passed_checks += spec.matches.len();
}

fn process_api(report: &mut ParityReport, api: &ApiMatchReport<'_>) {
    report.total_checks += api.total_documented;

    for mismatch in &api.mismatches {
        report.add(Finding::new(
            FindingKind::ApiCodeMismatch(mismatch.kind),
            mismatch.location(),
            mismatch.issue.clone(),
            mismatch.fix.clone(),
        ));
    }

    report.passed_checks += api.verified_count();
}

fn process_tests(report: &mut ParityReport, tests: &TestAnalysisReport) {
    report.total_checks += tests.requirements.len();
    report.passed_checks += tests.total_met;

    for req in tests.deficits() {
        report.add(Finding::new(
            FindingKind::TestCountMismatch,
            req.doc_path.display().to_string(),
            format!(
                "Unit '{}' requires {} tests but has {} (deficit: {})",
                req.unit_id, req.required, req.actual, req.deficit
            ),
            format!("Add {} more tests for unit '{}'", req.deficit, req.unit_id),
        ));
    }
}

fn process_references(report: &mut ParityReport, refs: &ReferenceReport) {
    report.total_checks += refs.total_refs;

    for broken in &refs.broken_refs {
        report.add(Finding::new(
            FindingKind::BrokenReference,
            broken.reference.location(),
            format!(
                "Broken {} reference to '{}'",
                broken.kind, broken.reference.target_path
            ),
            broken.fix.clone(),
        ));
    }

    for orphan in &refs.orphaned_docs {
        report.add(Finding::new(
            FindingKind::OrphanedDocument,
            orphan.display().to_string(),
            "Document not referenced anywhere",
            format!(
                "Add reference to '{}' or remove if obsolete",
                orphan.display()
            ),
        ));
    }

    report.passed_checks += refs.valid_refs;
}
