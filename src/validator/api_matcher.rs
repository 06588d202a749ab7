//! API Matcher
//!
//! Reconciles documented API functions against the public functions of the
//! code inventory and verifies their signatures.

use super::top_level_docs;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ApiFunction, ApiMatch, ApiMatchReport, CodeAnalysis, CodeItem, Mismatch, MismatchKind,
};
use crate::parser::{normalize_signature, similar_signatures, similar_types, ApiDocParser};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Matches API documentation to code
pub struct ApiMatcher<'a> {
    api_dir: PathBuf,
    analysis: &'a CodeAnalysis,
    parser: ApiDocParser,
}

impl<'a> ApiMatcher<'a> {
    pub fn new(api_dir: impl Into<PathBuf>, analysis: &'a CodeAnalysis) -> EngineResult<Self> {
        Ok(Self {
            api_dir: api_dir.into(),
            analysis,
            parser: ApiDocParser::new()?,
        })
    }

    /// Match every API document in the directory
    pub fn match_apis(&self) -> EngineResult<ApiMatchReport<'a>> {
        if !self.api_dir.is_dir() {
            return Err(EngineError::missing("API", &self.api_dir));
        }

        let mut report = ApiMatchReport::default();
        for doc_path in top_level_docs(&self.api_dir)? {
            let content = match std::fs::read_to_string(&doc_path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %doc_path.display(), error = %e, "skipping unreadable API document");
                    continue;
                }
            };
            tracing::debug!(path = %doc_path.display(), "matching API document");

            let entries = self.parser.parse(&content, &doc_path);
            report.total_documented += entries.len();
            for entry in entries {
                self.match_entry(entry, &doc_path, &mut report);
            }
        }

        self.find_undocumented(&mut report);

        report.total_implemented = self.analysis.public_functions().count();
        report.total_matched = report.matches.len();
        if report.total_documented > 0 {
            report.coverage = (report.total_matched as f64 / report.total_documented as f64
                * 100.0)
                .min(100.0);
        }

        tracing::info!(
            documented = report.total_documented,
            matched = report.total_matched,
            verified = report.verified_count(),
            mismatched = report.mismatches.len(),
            "API matching complete"
        );
        Ok(report)
    }

    fn match_entry(&self, entry: ApiFunction, doc_path: &Path, report: &mut ApiMatchReport<'a>) {
        let Some(code_item) = self.find_implementation(&entry.name) else {
            report.mismatches.push(Mismatch {
                kind: MismatchKind::NotImplemented,
                issue: "API function documented but not implemented".to_string(),
                fix: format!("Implement function '{}' or remove from API docs", entry.name),
                name: entry.name,
                expected: entry.signature,
                actual: String::new(),
                file_path: doc_path.to_path_buf(),
                line: entry.line,
            });
            return;
        };

        let issues = verify_signature(&entry, code_item);
        for issue in &issues {
            report.mismatches.push(Mismatch {
                kind: MismatchKind::SignatureDiff,
                name: entry.name.clone(),
                expected: entry.signature.clone(),
                actual: code_item.signature.clone(),
                issue: issue.clone(),
                fix: format!("Update API docs or code signature for '{}'", entry.name),
                file_path: doc_path.to_path_buf(),
                line: entry.line,
            });
        }

        report.matches.push(ApiMatch {
            api_function: entry,
            code_item,
            verified: issues.is_empty(),
            issues,
        });
    }

    /// Exact name, then case-insensitive name, then substring either way;
    /// public functions only
    fn find_implementation(&self, name: &str) -> Option<&'a CodeItem> {
        let analysis = self.analysis;
        let wanted = name.to_lowercase();

        analysis
            .public_functions()
            .find(|f| f.name == name)
            .or_else(|| {
                analysis
                    .public_functions()
                    .find(|f| f.name.to_lowercase() == wanted)
            })
            .or_else(|| {
                analysis.public_functions().find(|f| {
                    let found = f.name.to_lowercase();
                    found.contains(&wanted) || wanted.contains(&found)
                })
            })
    }

    /// Every public function no match claimed, keyed by identity
    fn find_undocumented(&self, report: &mut ApiMatchReport<'a>) {
        let claimed: HashSet<(&Path, usize)> = report
            .matches
            .iter()
            .map(|m| (m.code_item.file_path.as_path(), m.code_item.line))
            .collect();

        let undocumented: Vec<Mismatch> = self
            .analysis
            .public_functions()
            .filter(|f| !claimed.contains(&(f.file_path.as_path(), f.line)))
            .map(|f| Mismatch {
                kind: MismatchKind::NotDocumented,
                name: f.name.clone(),
                expected: String::new(),
                actual: f.signature.clone(),
                issue: "Public function not documented in API".to_string(),
                fix: format!("Add API documentation for '{}' in {}", f.name, f.location()),
                file_path: f.file_path.clone(),
                line: f.line,
            })
            .collect();

        report.mismatches.extend(undocumented);
    }
}

/// Discrepancies between a documented signature and its implementation
fn verify_signature(entry: &ApiFunction, code_item: &CodeItem) -> Vec<String> {
    let mut issues = Vec::new();

    if !similar_signatures(&entry.signature, &code_item.signature) {
        issues.push(format!(
            "Signature mismatch: API='{}' vs Code='{}'",
            entry.signature, code_item.signature
        ));
    }

    if let (Some(api_returns), Some(code_returns)) =
        (entry.returns.as_deref(), code_item.detail("returns"))
    {
        let api_ret = normalize_signature(api_returns);
        let code_ret = normalize_signature(code_returns);
        if api_ret != code_ret && !similar_types(&api_ret, &code_ret) {
            issues.push(format!(
                "Return type mismatch: API='{}' vs Code='{}'",
                api_returns, code_returns
            ));
        }
    }

    issues
}
