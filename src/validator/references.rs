//! Cross-Reference Validator
//!
//! Validates markdown links between documents:
//! - Link targets resolve to existing files
//! - `#anchor` fragments name an existing heading in the target
//! - Every documentation file is targeted by some other document

use super::walk_files;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BrokenKind, BrokenReference, Reference, ReferenceConfig, ReferenceKind, ReferenceReport,
};
use crate::parser::MarkdownDoc;
use percent_encoding::percent_decode_str;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

/// Parsed link target (path#anchor), percent-decoded
#[derive(Debug, Clone, PartialEq)]
struct LinkTarget {
    path: String,
    anchor: Option<String>,
}

impl LinkTarget {
    fn parse(target: &str) -> Self {
        let (path, anchor) = match target.split_once('#') {
            Some((path, anchor)) => (path, Some(anchor).filter(|a| !a.is_empty())),
            None => (target, None),
        };
        LinkTarget {
            path: decode(path),
            anchor: anchor.map(decode),
        }
    }
}

fn decode(text: &str) -> String {
    percent_decode_str(text).decode_utf8_lossy().into_owned()
}

/// Outcome of resolving one link
enum Resolution {
    Valid(PathBuf),
    Broken(BrokenKind, Option<PathBuf>),
}

/// Cross-reference validator for a project's markdown documents
pub struct ReferenceValidator {
    root: PathBuf,
    docs_dir: PathBuf,
    config: ReferenceConfig,
}

impl ReferenceValidator {
    /// Create a validator scanning `root` and checking orphans within `docs_dir`
    pub fn new(root: impl Into<PathBuf>, docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            docs_dir: docs_dir.into(),
            config: ReferenceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReferenceConfig) -> Self {
        self.config = config;
        self
    }

    /// Run link resolution and orphan detection
    pub fn validate(&self) -> EngineResult<ReferenceReport> {
        if !self.root.is_dir() {
            return Err(EngineError::missing("project root", &self.root));
        }
        if !self.docs_dir.is_dir() {
            return Err(EngineError::missing("docs", &self.docs_dir));
        }

        let mut report = ReferenceReport::default();
        let mut targeted: HashSet<PathBuf> = HashSet::new();
        let mut documents: HashMap<PathBuf, Option<MarkdownDoc>> = HashMap::new();

        for entry in walk_files(&self.root, "md") {
            let source = match entry {
                Ok(path) => path,
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable document path");
                    continue;
                }
            };
            let content = match std::fs::read_to_string(&source) {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!(path = %source.display(), error = %e, "skipping unreadable document");
                    continue;
                }
            };
            let doc = MarkdownDoc::parse(&content);
            let source_abs = absolute(&source);

            for link in &doc.links {
                let target = link.target.trim();
                if link.email || has_scheme(target) {
                    continue;
                }
                report.total_refs += 1;

                let parsed = LinkTarget::parse(target);
                let target_path = if parsed.path.is_empty() && !target.is_empty() {
                    source.display().to_string()
                } else {
                    parsed.path.clone()
                };
                let reference = Reference {
                    source_file: source.clone(),
                    source_line: link.line,
                    kind: ReferenceKind::classify(&target_path),
                    target_path,
                    target_anchor: parsed.anchor.clone(),
                    text: link.text.clone(),
                };

                let resolution = if target.is_empty() {
                    Resolution::Broken(BrokenKind::InvalidFormat, None)
                } else {
                    self.resolve(&source_abs, &parsed, &mut documents)
                };

                match resolution {
                    Resolution::Valid(path) => {
                        report.valid_refs += 1;
                        if path != source_abs {
                            targeted.insert(path);
                        }
                    }
                    Resolution::Broken(kind, existing) => {
                        if let Some(path) = existing.filter(|p| *p != source_abs) {
                            targeted.insert(path);
                        }
                        tracing::debug!(src = %reference.location(), kind = %kind, "broken reference");
                        report.broken_refs.push(BrokenReference::new(reference, kind));
                    }
                }
            }
        }

        report.orphaned_docs = self.find_orphans(&targeted)?;

        tracing::info!(
            total = report.total_refs,
            valid = report.valid_refs,
            broken = report.broken_refs.len(),
            orphaned = report.orphaned_docs.len(),
            "reference validation complete"
        );
        Ok(report)
    }

    /// Resolve one link relative to its (absolute) source file
    fn resolve(
        &self,
        source: &Path,
        target: &LinkTarget,
        documents: &mut HashMap<PathBuf, Option<MarkdownDoc>>,
    ) -> Resolution {
        let resolved = if target.path.is_empty() {
            source.to_path_buf()
        } else if let Some(root_relative) = target.path.strip_prefix('/') {
            normalize(&absolute(&self.root).join(root_relative))
        } else {
            let base = source.parent().unwrap_or(Path::new(""));
            normalize(&base.join(&target.path))
        };

        if !resolved.exists() {
            return Resolution::Broken(BrokenKind::FileMissing, None);
        }

        let Some(anchor) = &target.anchor else {
            return Resolution::Valid(resolved);
        };

        let doc = documents.entry(resolved.clone()).or_insert_with(|| {
            std::fs::read_to_string(&resolved)
                .ok()
                .map(|content| MarkdownDoc::parse(&content))
        });
        match doc {
            Some(doc) if doc.has_anchor(anchor) => Resolution::Valid(resolved),
            Some(_) => Resolution::Broken(BrokenKind::SectionMissing, Some(resolved)),
            None => Resolution::Broken(BrokenKind::InvalidFormat, Some(resolved)),
        }
    }

    /// Documentation files no other document targets, entry points excluded
    fn find_orphans(&self, targeted: &HashSet<PathBuf>) -> EngineResult<Vec<PathBuf>> {
        let mut orphans = Vec::new();
        for entry in walk_files(&self.docs_dir, "md") {
            let path = match entry {
                Ok(path) => path,
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(_) => continue,
            };
            if self.config.is_entry_point(&path) || targeted.contains(&absolute(&path)) {
                continue;
            }
            orphans.push(path);
        }
        Ok(orphans)
    }
}

/// URI-scheme targets (`https:`, `mailto:` ...) are external
fn has_scheme(target: &str) -> bool {
    match target.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        }
        None => false,
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => normalize(path),
    }
}

/// Lexically resolve `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
