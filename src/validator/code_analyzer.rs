//! Code Analyzer
//!
//! Builds the declaration inventory of a source tree. Per-file failures are
//! recorded and scanning continues; only an unwalkable root is fatal.

use super::walk_files;
use crate::error::{EngineError, EngineResult};
use crate::models::CodeAnalysis;
use crate::parser::DeclPatterns;
use std::path::{Path, PathBuf};

/// Source tree analyzer
pub struct CodeAnalyzer {
    root: PathBuf,
    patterns: DeclPatterns,
}

impl CodeAnalyzer {
    pub fn new(root: impl Into<PathBuf>) -> EngineResult<Self> {
        Ok(Self {
            root: root.into(),
            patterns: DeclPatterns::new()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan every `.rs` file under the root
    pub fn analyze(&self) -> EngineResult<CodeAnalysis> {
        let mut analysis = CodeAnalysis::new();

        for entry in walk_files(&self.root, "rs") {
            let path = match entry {
                Ok(path) => path,
                Err(err) if err.depth() == 0 => {
                    return Err(EngineError::CodeRootUnreadable {
                        path: self.root.clone(),
                        source: err,
                    });
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| self.root.display().to_string());
                    analysis.parse_errors.push(format!("{}: {}", path, err));
                    continue;
                }
            };

            analysis.total_files += 1;
            if let Err(e) = self.analyze_file(&path, &mut analysis) {
                tracing::debug!(path = %path.display(), error = %e, "failed to scan source file");
                analysis
                    .parse_errors
                    .push(format!("{}: {}", path.display(), e));
            }
        }

        tracing::info!(
            files = analysis.total_files,
            functions = analysis.functions.len(),
            tests = analysis.tests.len(),
            parse_errors = analysis.parse_errors.len(),
            "code analysis complete"
        );
        Ok(analysis)
    }

    /// Scan one file into the inventory
    pub fn analyze_file(&self, path: &Path, analysis: &mut CodeAnalysis) -> std::io::Result<()> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "scanning source file");

        for decl in self.patterns.scan_source(&content) {
            analysis.push(decl.into_item(path));
        }
        Ok(())
    }
}
