//! Spec Matcher
//!
//! Reconciles the requirements declared by specification documents against
//! the code inventory.

use super::scoring::{ConfidenceScorer, WeightedScorer};
use super::top_level_docs;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CodeAnalysis, CodeItem, CodeKind, MatchType, MatchingConfig, Mismatch, MismatchKind,
    SpecConfig, SpecMatch, SpecMatchReport, SpecRequirement,
};
use crate::parser::{DeclPatterns, Heading, MarkdownDoc, Section};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Matches specification requirements to code items
pub struct SpecMatcher<'a> {
    spec_dir: PathBuf,
    analysis: &'a CodeAnalysis,
    patterns: DeclPatterns,
    identifier: Regex,
    scorer: Box<dyn ConfidenceScorer + 'a>,
    threshold: f64,
    spec_config: SpecConfig,
}

impl<'a> SpecMatcher<'a> {
    pub fn new(spec_dir: impl Into<PathBuf>, analysis: &'a CodeAnalysis) -> EngineResult<Self> {
        let matching = MatchingConfig::default();
        Ok(Self {
            spec_dir: spec_dir.into(),
            analysis,
            patterns: DeclPatterns::new()?,
            identifier: Regex::new(r"^[A-Za-z_]\w*$")?,
            scorer: Box::new(WeightedScorer::new(matching)),
            threshold: matching.threshold,
            spec_config: SpecConfig::default(),
        })
    }

    /// Use configured weights and threshold
    pub fn with_matching(mut self, matching: MatchingConfig) -> Self {
        self.scorer = Box::new(WeightedScorer::new(matching));
        self.threshold = matching.threshold;
        self
    }

    /// Swap the scoring strategy, keeping the threshold
    pub fn with_scorer(mut self, scorer: impl ConfidenceScorer + 'a) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn with_spec_config(mut self, spec_config: SpecConfig) -> Self {
        self.spec_config = spec_config;
        self
    }

    /// Match every specification document in the directory
    pub fn match_specs(&self) -> EngineResult<SpecMatchReport<'a>> {
        if !self.spec_dir.is_dir() {
            return Err(EngineError::missing("spec", &self.spec_dir));
        }

        let mut report = SpecMatchReport::default();
        for doc_path in top_level_docs(&self.spec_dir)? {
            let content = match std::fs::read_to_string(&doc_path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %doc_path.display(), error = %e, "skipping unreadable spec document");
                    continue;
                }
            };
            tracing::debug!(path = %doc_path.display(), "matching spec document");

            for requirement in self.extract_requirements(&content) {
                self.match_requirement(requirement, &doc_path, &mut report);
            }
        }

        report.total_matched = report.matches.len();
        report.total_spec = report.matches.len() + report.mismatches.len();
        if report.total_spec > 0 {
            report.match_percentage =
                (report.total_matched as f64 / report.total_spec as f64 * 100.0).min(100.0);
        }
        report.unspecified = self.find_unspecified(&report.matches);

        tracing::info!(
            matched = report.total_matched,
            mismatched = report.mismatches.len(),
            unspecified = report.unspecified.len(),
            "spec matching complete"
        );
        Ok(report)
    }

    fn match_requirement(
        &self,
        requirement: SpecRequirement,
        doc_path: &Path,
        report: &mut SpecMatchReport<'a>,
    ) {
        match self.find_code_match(&requirement) {
            Some((code_item, confidence)) => report.matches.push(SpecMatch {
                requirement,
                code_item,
                match_type: MatchType::from_confidence(confidence),
                confidence,
            }),
            None => report.mismatches.push(Mismatch {
                kind: MismatchKind::NotImplemented,
                fix: fix_suggestion(&requirement),
                name: requirement.name,
                expected: requirement.description,
                actual: String::new(),
                issue: "Spec requirement not implemented in code".to_string(),
                file_path: doc_path.to_path_buf(),
                line: requirement.line,
            }),
        }
    }

    /// Requirements declared by one document, in document order
    pub fn extract_requirements(&self, content: &str) -> Vec<SpecRequirement> {
        let doc = MarkdownDoc::parse(content);
        let mut requirements = Vec::new();

        for block in &doc.code_blocks {
            if !self.spec_config.scans_language(&block.lang) {
                continue;
            }
            let section = block.section.clone().unwrap_or_default();
            for (line, text) in block.lines() {
                let Some(decl) = self.patterns.recognize(text) else {
                    continue;
                };
                if !CodeKind::specifiable().contains(&decl.kind) {
                    continue;
                }
                requirements.push(SpecRequirement {
                    name: decl.name,
                    kind: Some(decl.kind),
                    section: section.clone(),
                    description: text.trim().to_string(),
                    line,
                });
            }
        }

        for section in doc.sections() {
            self.collect_from_section(&section, None, &mut requirements);
        }

        requirements.sort_by_key(|r| r.line);
        let mut seen = HashSet::new();
        requirements.retain(|r| seen.insert((r.kind, r.name.clone())));
        requirements
    }

    fn collect_from_section(
        &self,
        section: &Section,
        parent: Option<&Heading>,
        out: &mut Vec<SpecRequirement>,
    ) {
        if let Some(requirement) = self.heading_requirement(&section.heading, parent) {
            out.push(requirement);
        }
        for child in &section.children {
            self.collect_from_section(child, Some(&section.heading), out);
        }
    }

    /// A heading written entirely as inline code names a requirement
    fn heading_requirement(
        &self,
        heading: &Heading,
        parent: Option<&Heading>,
    ) -> Option<SpecRequirement> {
        let inner = heading.raw.strip_prefix('`')?.strip_suffix('`')?.trim();
        if inner.is_empty() || inner.contains('`') {
            return None;
        }

        let (name, kind) = match self.patterns.recognize(inner) {
            Some(decl) if CodeKind::specifiable().contains(&decl.kind) => (decl.name, Some(decl.kind)),
            Some(_) => return None,
            None if self.identifier.is_match(inner) => (inner.to_string(), None),
            None => return None,
        };

        Some(SpecRequirement {
            name,
            kind,
            section: parent.unwrap_or(heading).text.clone(),
            description: inner.to_string(),
            line: heading.line,
        })
    }

    /// Highest-confidence candidate at or above the threshold
    fn find_code_match(&self, requirement: &SpecRequirement) -> Option<(&'a CodeItem, f64)> {
        let analysis = self.analysis;
        let candidates: Vec<&'a CodeItem> = match requirement.kind {
            Some(kind) => analysis.items(kind).iter().collect(),
            None => CodeKind::specifiable()
                .into_iter()
                .flat_map(|kind| analysis.items(kind).iter())
                .collect(),
        };

        let mut best: Option<(&'a CodeItem, f64)> = None;
        for candidate in candidates {
            let confidence = self.scorer.score(requirement, candidate);
            if confidence > best.map(|(_, c)| c).unwrap_or(0.0) {
                best = Some((candidate, confidence));
            }
        }

        best.filter(|(_, confidence)| *confidence >= self.threshold)
    }

    /// Public items no match claimed, keyed by identity
    fn find_unspecified(&self, matches: &[SpecMatch<'a>]) -> Vec<&'a CodeItem> {
        let matched: HashSet<(&Path, usize)> = matches
            .iter()
            .map(|m| (m.code_item.file_path.as_path(), m.code_item.line))
            .collect();

        self.analysis
            .public_items()
            .filter(|item| !matched.contains(&(item.file_path.as_path(), item.line)))
            .collect()
    }
}

fn fix_suggestion(requirement: &SpecRequirement) -> String {
    let action = match requirement.kind {
        Some(CodeKind::Function) => "Implement function",
        Some(CodeKind::Struct) => "Define struct",
        Some(CodeKind::Enum) => "Define enum",
        Some(CodeKind::Trait) => "Define trait",
        _ => "Implement",
    };
    format!(
        "{} '{}' as specified in section '{}'",
        action, requirement.name, requirement.section
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::CodeAnalyzer;
    use tempfile::TempDir;

    fn fixture(code: &str, spec: &str) -> (TempDir, CodeAnalysis) {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::create_dir_all(temp.path().join("spec")).unwrap();
        std::fs::write(temp.path().join("src/lib.rs"), code).unwrap();
        std::fs::write(temp.path().join("spec/math.md"), spec).unwrap();
        let analysis = CodeAnalyzer::new(temp.path().join("src"))
            .unwrap()
            .analyze()
            .unwrap();
        (temp, analysis)
    }

    #[test]
    fn test_exact_match_from_code_block() {
        let (temp, analysis) = fixture(
            "pub fn add(x: i32) -> i32 {\n    x\n}\n",
            "# Math\n\n## Arithmetic\n\n```rust\npub fn add(x: i32) -> i32;\n```\n",
        );
        let report = SpecMatcher::new(temp.path().join("spec"), &analysis)
            .unwrap()
            .match_specs()
            .unwrap();

        assert_eq!(report.matches.len(), 1);
        let m = &report.matches[0];
        assert_eq!(m.confidence, 1.0);
        assert_eq!(m.match_type, MatchType::Exact);
        assert_eq!(m.requirement.section, "Arithmetic");
        assert_eq!(m.requirement.line, 6);
        assert!(report.unspecified.is_empty());
        assert_eq!(report.match_percentage, 100.0);
    }

    #[test]
    fn test_unmatched_requirement_becomes_mismatch() {
        let (temp, analysis) = fixture(
            "pub fn add(x: i32) -> i32 {\n}\n",
            "## Shapes\n\n```rust\npub struct Polygon {\n```\n",
        );
        let report = SpecMatcher::new(temp.path().join("spec"), &analysis)
            .unwrap()
            .match_specs()
            .unwrap();

        assert!(report.matches.is_empty());
        assert_eq!(report.mismatches.len(), 1);
        let mismatch = &report.mismatches[0];
        assert_eq!(mismatch.kind, MismatchKind::NotImplemented);
        assert_eq!(
            mismatch.fix,
            "Define struct 'Polygon' as specified in section 'Shapes'"
        );
        assert_eq!(mismatch.line, 4);
        assert_eq!(report.unspecified.len(), 1);
        assert_eq!(report.match_percentage, 0.0);
    }

    #[test]
    fn test_heading_requirements_and_dedupe() {
        let (temp, analysis) = fixture(
            "pub struct Config {}\npub fn load() {}\n",
            "# API\n\n## `Config`\n\n### `pub fn load()`\n\n```rust\npub fn load();\n```\n",
        );
        let matcher = SpecMatcher::new(temp.path().join("spec"), &analysis).unwrap();
        let content = std::fs::read_to_string(temp.path().join("spec/math.md")).unwrap();
        let requirements = matcher.extract_requirements(&content);

        assert_eq!(requirements.len(), 2);
        assert_eq!(requirements[0].name, "Config");
        assert_eq!(requirements[0].kind, None);
        assert_eq!(requirements[0].section, "API");
        assert_eq!(requirements[1].name, "load");
        assert_eq!(requirements[1].kind, Some(CodeKind::Function));

        let report = matcher.match_specs().unwrap();
        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.matches[0].match_type, MatchType::Partial);
    }

    #[test]
    fn test_heading_with_attribute_block() {
        let (temp, analysis) = fixture(
            "pub struct Config {}\n",
            "# API\n\n## `Config` {#cfg}\n",
        );
        let matcher = SpecMatcher::new(temp.path().join("spec"), &analysis).unwrap();
        let content = std::fs::read_to_string(temp.path().join("spec/math.md")).unwrap();
        let requirements = matcher.extract_requirements(&content);

        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].name, "Config");
        assert_eq!(requirements[0].line, 3);

        let report = matcher.match_specs().unwrap();
        assert_eq!(report.matches.len(), 1);
        assert!(report.unspecified.is_empty());
    }

    #[test]
    fn test_same_named_items_reported_separately() {
        let (temp, analysis) = fixture(
            "pub fn new() {}\nmod inner {\n    pub fn new() {}\n}\n",
            "```rust\npub fn new();\n```\n",
        );
        let report = SpecMatcher::new(temp.path().join("spec"), &analysis)
            .unwrap()
            .match_specs()
            .unwrap();

        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].code_item.line, 1);
        assert_eq!(report.unspecified.len(), 1);
        assert_eq!(report.unspecified[0].line, 3);
    }

    #[test]
    fn test_other_languages_ignored() {
        let (temp, analysis) = fixture(
            "pub fn add() {}\n",
            "```python\ndef add():\n    pass\nfn ghost() {}\n```\n",
        );
        let report = SpecMatcher::new(temp.path().join("spec"), &analysis)
            .unwrap()
            .match_specs()
            .unwrap();
        assert_eq!(report.total_spec, 0);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let analysis = CodeAnalysis::new();
        let result = SpecMatcher::new("/nonexistent/spec", &analysis)
            .unwrap()
            .match_specs();
        assert!(matches!(result, Err(EngineError::DirectoryMissing { .. })));
    }

    #[test]
    fn test_threshold_is_configurable() {
        let (temp, analysis) = fixture(
            "pub fn parse_all() {}\n",
            "```rust\nfn parse() {}\n```\n",
        );
        let lenient = SpecMatcher::new(temp.path().join("spec"), &analysis)
            .unwrap()
            .match_specs()
            .unwrap();
        assert_eq!(lenient.matches.len(), 1);
        assert_eq!(lenient.matches[0].confidence, 0.7);

        let strict = SpecMatcher::new(temp.path().join("spec"), &analysis)
            .unwrap()
            .with_matching(MatchingConfig {
                threshold: 0.8,
                ..MatchingConfig::default()
            })
            .match_specs()
            .unwrap();
        assert!(strict.matches.is_empty());
        assert_eq!(strict.mismatches.len(), 1);
    }
}
