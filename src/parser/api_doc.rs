//! API document parsing
//!
//! A documented function is either a heading that reads as a call signature
//! (`## add(a, b) -> i32`, backticks allowed) or a function declaration line
//! inside any fenced code block.

use super::markdown::MarkdownDoc;
use super::rust_decl::DeclPatterns;
use crate::models::{ApiFunction, CodeKind};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

pub struct ApiDocParser {
    patterns: DeclPatterns,
    call_heading: Regex,
    returns_line: Regex,
}

impl ApiDocParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            patterns: DeclPatterns::new()?,
            call_heading: Regex::new(
                r"^(?:pub\s+)?(?:(?:const|async|unsafe)\s+)*(?:fn\s+)?(?P<name>[A-Za-z_][\w:]*)(?:<.*?>)?\((?P<params>[^)]*)\)\s*(?:->\s*(?P<ret>[^{;]+?))?\s*[{;]?\s*$",
            )?,
            returns_line: Regex::new(
                r"(?i)^\s*(?:[-*]\s+)?\**returns\**\s*:\s*\**\s*(?P<ret>.+?)\s*$",
            )?,
        })
    }

    /// Extract documented functions in document order, first occurrence of a name wins
    pub fn parse(&self, content: &str, file_path: &Path) -> Vec<ApiFunction> {
        let doc = MarkdownDoc::parse(content);
        let lines: Vec<&str> = content.lines().collect();
        let mut entries = Vec::new();

        for (idx, heading) in doc.headings.iter().enumerate() {
            let text = heading.raw.replace('`', "");
            let Some(caps) = self.call_heading.captures(text.trim()) else {
                continue;
            };
            let Some(name) = caps.name("name") else {
                continue;
            };
            let returns = caps
                .name("ret")
                .map(|m| m.as_str().trim().to_string())
                .or_else(|| self.returns_under(&doc, idx, &lines));

            entries.push(ApiFunction {
                name: name.as_str().to_string(),
                signature: text.trim().to_string(),
                returns,
                file_path: file_path.to_path_buf(),
                line: heading.line,
            });
        }

        for block in &doc.code_blocks {
            for (line, text) in block.lines() {
                let Some(decl) = self.patterns.recognize(text) else {
                    continue;
                };
                if decl.kind != CodeKind::Function || decl.name == "main" {
                    continue;
                }
                let returns = decl.details.get("returns").filter(|r| !r.is_empty()).cloned();
                entries.push(ApiFunction {
                    name: decl.name,
                    signature: decl.signature,
                    returns,
                    file_path: file_path.to_path_buf(),
                    line,
                });
            }
        }

        entries.sort_by_key(|e| e.line);
        let mut seen = HashSet::new();
        entries.retain(|e| seen.insert(e.name.clone()));
        entries
    }

    /// Declared return type from a `Returns:` line in the heading's body
    fn returns_under(&self, doc: &MarkdownDoc, idx: usize, lines: &[&str]) -> Option<String> {
        let (first, last) = doc.heading_body(idx)?;
        let last = last.unwrap_or(lines.len()).min(lines.len());
        (first..=last)
            .filter_map(|n| lines.get(n.checked_sub(1)?))
            .find_map(|line| self.returns_line.captures(line))
            .and_then(|caps| caps.name("ret"))
            .map(|m| m.as_str().replace('`', "").trim_end_matches('*').trim().to_string())
            .filter(|ret| !ret.is_empty())
    }
}
