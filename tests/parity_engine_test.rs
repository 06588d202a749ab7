//! End-to-end tests for the parity engine
//!
//! Each test builds a small project tree in a temp directory and drives the
//! public API the way the CLI does.

use paritycheck::models::{
    BrokenKind, CodeKind, FindingKind, MatchType, MismatchKind, ParityReport, Severity, Stage,
};
use paritycheck::validator::{
    ApiMatcher, CodeAnalyzer, ParityChecker, ReferenceValidator, SpecMatcher, TestAnalyzer,
};
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn test_fns(count: usize) -> String {
    (0..count)
        .map(|i| format!("#[test]\nfn check_{}() {{}}\n\n", i))
        .collect()
}

/// A project with one finding of most kinds
fn mixed_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(
        root,
        "crates/math/src/lib.rs",
        "pub fn add(x: i32) -> i32 {\n    x\n}\n\npub struct Matrix {\n    rows: usize,\n}\n\nfn helper() {}\n",
    );
    write(root, "crates/math/tests/math_tests.rs", &test_fns(2));
    write(
        root,
        "docs/specification/math.md",
        "# Math\n\n## Functions\n\n```rust\npub fn add(x: i32) -> i32;\npub fn subtract(a: i32, b: i32) -> i32;\n```\n",
    );
    write(
        root,
        "docs/api/math.md",
        "# Math API\n\n## `add(x)`\n\nReturns: `i32`\n\n## `multiply(a, b)`\n",
    );
    write(root, "phases/math/phase-01.md", "# Phase 01\n\nMinimum test count: 5\n");
    write(
        root,
        "docs/README.md",
        "- [Spec](specification/math.md#math)\n- [API](api/math.md)\n- [Guide](guide.md)\n",
    );
    write(root, "docs/old-notes.md", "# Old notes\n");
    temp
}

fn assert_invariants(report: &ParityReport) {
    assert!((0.0..=100.0).contains(&report.health_score));
    assert_eq!(report.ok, report.errors.is_empty());
    assert_eq!(report.failed_checks, report.errors.len());
    assert!(report.errors.iter().all(|f| f.severity == Severity::Error));
    assert!(report.warnings.iter().all(|f| f.severity == Severity::Warning));
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_public_and_private_function() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "lib.rs", "pub fn add(x: i32) -> i32 {\nfn helper() {\n");

    let analysis = CodeAnalyzer::new(temp.path()).unwrap().analyze().unwrap();

    assert_eq!(analysis.functions.len(), 2);
    assert_eq!(analysis.public_functions().count(), 1);
    assert_eq!(analysis.public_functions().next().unwrap().name, "add");
    assert!(analysis.structs.is_empty());
    assert!(analysis.enums.is_empty());
    assert!(analysis.traits.is_empty());
    assert!(analysis.impls.is_empty());
    assert!(analysis.tests.is_empty());
}

#[test]
fn scenario_exact_spec_match() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/lib.rs", "pub fn add(x: i32) -> i32 {\n    x\n}\n");
    write(
        temp.path(),
        "spec/math.md",
        "# Math\n\n```rust\npub fn add(x: i32) -> i32;\n```\n",
    );
    let analysis = CodeAnalyzer::new(temp.path().join("src"))
        .unwrap()
        .analyze()
        .unwrap();

    let report = SpecMatcher::new(temp.path().join("spec"), &analysis)
        .unwrap()
        .match_specs()
        .unwrap();

    assert_eq!(report.matches.len(), 1);
    let m = &report.matches[0];
    assert_eq!(m.requirement.name, "add");
    assert_eq!(m.requirement.kind, Some(CodeKind::Function));
    assert_eq!(m.confidence, 1.0);
    assert_eq!(m.match_type, MatchType::Exact);
    assert!(report.mismatches.is_empty());
    assert!(report.unspecified.is_empty());
}

#[test]
fn scenario_documented_but_not_implemented() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/lib.rs", "fn unrelated() {}\n");
    write(temp.path(), "api/math.md", "# Math\n\n## `multiply(a, b)`\n");
    let analysis = CodeAnalyzer::new(temp.path().join("src"))
        .unwrap()
        .analyze()
        .unwrap();

    let report = ApiMatcher::new(temp.path().join("api"), &analysis)
        .unwrap()
        .match_apis()
        .unwrap();

    assert!(report.matches.is_empty());
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].kind, MismatchKind::NotImplemented);
    assert_eq!(report.mismatches[0].name, "multiply");
    assert_eq!(report.coverage, 0.0);
}

#[test]
fn scenario_test_count_deficit() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "phases/parser/phase-03.md",
        "# Phase 03\n\nMinimum test count: 10\n",
    );
    write(temp.path(), "tests/parser_tests.rs", &test_fns(7));

    let report = TestAnalyzer::new(temp.path().join("phases"), temp.path().join("tests"))
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(report.requirements.len(), 1);
    let req = &report.requirements[0];
    assert_eq!(req.required, 10);
    assert_eq!(req.actual, 7);
    assert_eq!(req.deficit, 3);
    assert!(!req.met);
}

#[test]
fn scenario_missing_link_target() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "docs/README.md", "Read the [guide](missing.md).\n");

    let report = ReferenceValidator::new(temp.path(), temp.path().join("docs"))
        .validate()
        .unwrap();

    assert_eq!(report.broken_refs.len(), 1);
    assert_eq!(report.broken_refs[0].kind, BrokenKind::FileMissing);
    assert!(report.broken_refs[0].fix.contains("missing.md"));
}

// =============================================================================
// Orchestration
// =============================================================================

#[test]
fn mixed_project_reports_every_finding_kind() {
    let temp = mixed_project();
    let report = ParityChecker::new(temp.path()).check().unwrap();
    assert_invariants(&report);

    let kinds: Vec<(FindingKind, Severity)> = report
        .errors
        .iter()
        .chain(&report.warnings)
        .map(|f| (f.kind, f.severity))
        .collect();

    // `subtract` is specified but missing
    assert!(kinds.contains(&(FindingKind::SpecCodeMismatch, Severity::Error)));
    // `Matrix` is public and unspecified
    assert!(kinds.contains(&(FindingKind::CodeNotSpecified, Severity::Warning)));
    // `multiply` is documented but missing
    assert!(kinds.contains(&(
        FindingKind::ApiCodeMismatch(MismatchKind::NotImplemented),
        Severity::Error
    )));
    // 5 tests required, 2 present
    assert!(kinds.contains(&(FindingKind::TestCountMismatch, Severity::Error)));
    // guide.md does not exist
    assert!(kinds.contains(&(FindingKind::BrokenReference, Severity::Error)));
    // old-notes.md is never linked
    assert!(kinds.contains(&(FindingKind::OrphanedDocument, Severity::Warning)));

    assert!(!report.ok);
    assert!(report.health_score < 100.0);
    for key in ["code", "spec", "api", "tests", "refs"] {
        assert!(report.details.contains_key(key), "missing details for {}", key);
    }
}

#[test]
fn missing_spec_directory_fails_only_that_stage() {
    let temp = mixed_project();
    let full = ParityChecker::new(temp.path()).check().unwrap();

    let partial = ParityChecker::new(temp.path())
        .with_spec_dir("docs/retired-specification")
        .check()
        .unwrap();
    assert_invariants(&partial);

    let stage_failures: Vec<_> = partial
        .warnings
        .iter()
        .filter(|w| matches!(w.kind, FindingKind::StageFailed(_)))
        .collect();
    assert_eq!(stage_failures.len(), 1);
    assert_eq!(stage_failures[0].kind, FindingKind::StageFailed(Stage::Spec));
    assert_eq!(stage_failures[0].kind.as_str(), "spec_validation_failed");
    assert!(stage_failures[0].source.is_empty());

    // API, test and reference findings are still there
    assert!(partial
        .errors
        .iter()
        .any(|f| f.kind == FindingKind::ApiCodeMismatch(MismatchKind::NotImplemented)));
    assert!(partial
        .errors
        .iter()
        .any(|f| f.kind == FindingKind::TestCountMismatch));
    assert!(partial
        .warnings
        .iter()
        .any(|f| f.kind == FindingKind::OrphanedDocument));

    // Only the spec stage's own findings disappear
    let spec_kinds = |r: &ParityReport| {
        r.errors
            .iter()
            .chain(&r.warnings)
            .filter(|f| {
                matches!(
                    f.kind,
                    FindingKind::SpecCodeMismatch | FindingKind::CodeNotSpecified
                )
            })
            .count()
    };
    assert_eq!(spec_kinds(&partial), 0);
    assert_eq!(
        partial.errors.len() + partial.warnings.len(),
        full.errors.len() + full.warnings.len() - spec_kinds(&full) + 1
    );
    assert!(!partial.details.contains_key("spec"));
}

#[test]
fn missing_code_root_produces_no_report() {
    let temp = mixed_project();
    let result = ParityChecker::new(temp.path())
        .with_code_dir("no-such-dir")
        .check();
    assert!(result.is_err());
}

#[test]
fn repeated_runs_are_identical() {
    let temp = mixed_project();
    let checker = ParityChecker::new(temp.path());

    let first = checker.check().unwrap().to_compact_json(true, true);
    let second = checker.check().unwrap().to_compact_json(true, true);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn compact_record_shape() {
    let temp = mixed_project();
    let report = ParityChecker::new(temp.path()).check().unwrap();

    let json = report.to_compact_json(true, false);
    assert_eq!(json["ok"], false);
    assert_eq!(json["err_cnt"], report.errors.len());
    assert_eq!(json["warn_cnt"], report.warnings.len());
    assert!(json.get("details").is_none());
    let first_error = &json["errors"][0];
    assert!(first_error.get("type").is_some());
    assert!(first_error.get("issue").is_some());
    assert!(first_error.get("fix").is_some());

    let detailed = report.to_compact_json(false, true);
    assert!(detailed["errors"][0].get("fix").is_none());
    assert!(detailed["details"]["code"]["fn_cnt"].as_u64().unwrap() >= 2);
}

#[test]
fn matches_stay_above_threshold_and_unmatched_items_are_listed_once() {
    let temp = mixed_project();
    let analysis = CodeAnalyzer::new(temp.path().join("crates"))
        .unwrap()
        .analyze()
        .unwrap();
    let report = SpecMatcher::new(temp.path().join("docs/specification"), &analysis)
        .unwrap()
        .match_specs()
        .unwrap();

    assert!(report
        .matches
        .iter()
        .all(|m| (0.70..=1.0).contains(&m.confidence)));

    for item in analysis.public_items() {
        let matched = report
            .matches
            .iter()
            .any(|m| std::ptr::eq(m.code_item, item));
        let listed = report
            .unspecified
            .iter()
            .filter(|u| std::ptr::eq(**u, item))
            .count();
        assert_eq!(listed, usize::from(!matched), "{}", item.name);
    }
}
