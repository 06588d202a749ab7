//! Markdown document model (AST-based)
//!
//! Headings, fenced code blocks and links with 1-indexed source lines,
//! recovered from pulldown-cmark offset ranges.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};

/// A heading with its plain text and the raw source text after the `#` markers
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: usize,
    /// Rendered text, inline code included without backticks
    pub text: String,
    /// Source text with `#` markers and any `{...}` attribute block removed,
    /// backticks kept
    pub raw: String,
    /// Custom id from a `{#id}` attribute block
    pub id: Option<String>,
    pub line: usize,
}

/// A code block with the line its content starts on
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// First token of the info string, empty for indented blocks
    pub lang: String,
    pub content: String,
    /// 1-indexed line of the first content line
    pub start_line: usize,
    /// Text of the nearest preceding heading
    pub section: Option<String>,
}

impl CodeBlock {
    /// Content lines paired with their line numbers in the document
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.content
            .lines()
            .enumerate()
            .map(move |(i, line)| (self.start_line + i, line))
    }
}

/// One `[text](target)` occurrence (images included)
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub text: String,
    /// Destination as written, title excluded
    pub target: String,
    /// `<user@host>` autolink; the destination carries no `mailto:` scheme
    pub email: bool,
    pub line: usize,
}

/// A heading and the headings nested beneath it
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: Heading,
    pub children: Vec<Section>,
}

impl Section {
    fn new(heading: Heading) -> Self {
        Self {
            heading,
            children: Vec::new(),
        }
    }
}

/// Parsed view of a markdown document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkdownDoc {
    pub headings: Vec<Heading>,
    pub code_blocks: Vec<CodeBlock>,
    pub links: Vec<Link>,
}

struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-indexed line containing a byte offset
    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

fn heading_level(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn raw_heading(source: &str) -> String {
    let first = source.lines().next().unwrap_or("").trim();
    let text = first.trim_start_matches('#').trim();
    strip_attributes(text).trim_end_matches('#').trim().to_string()
}

/// Drop a trailing `{#id .class}` attribute block
fn strip_attributes(text: &str) -> &str {
    let Some(body) = text.strip_suffix('}') else {
        return text;
    };
    match body.rfind('{') {
        Some(open) if !body[open..].contains('}') => text[..open].trim_end(),
        _ => text,
    }
}

impl MarkdownDoc {
    pub fn parse(content: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        let index = LineIndex::new(content);
        let mut doc = MarkdownDoc::default();
        let mut current_heading: Option<Heading> = None;
        let mut current_block: Option<CodeBlock> = None;
        let mut pending_links: Vec<Link> = Vec::new();

        for (event, range) in Parser::new_ext(content, options).into_offset_iter() {
            match event {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    current_heading = Some(Heading {
                        level: heading_level(level),
                        text: String::new(),
                        raw: raw_heading(&content[range.clone()]),
                        id: id.map(|id| id.to_string()),
                        line: index.line_of(range.start),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(mut heading) = current_heading.take() {
                        heading.text = heading.text.trim().to_string();
                        doc.headings.push(heading);
                    }
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let (lang, start_line) = match kind {
                        CodeBlockKind::Fenced(info) => (
                            info.split(|c: char| c.is_whitespace() || c == ',')
                                .next()
                                .unwrap_or("")
                                .to_string(),
                            index.line_of(range.start) + 1,
                        ),
                        CodeBlockKind::Indented => (String::new(), index.line_of(range.start)),
                    };
                    current_block = Some(CodeBlock {
                        lang,
                        content: String::new(),
                        start_line,
                        section: doc.headings.last().map(|h| h.text.clone()),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = current_block.take() {
                        doc.code_blocks.push(block);
                    }
                }
                Event::Start(Tag::Link {
                    link_type, dest_url, ..
                })
                | Event::Start(Tag::Image {
                    link_type, dest_url, ..
                }) => {
                    pending_links.push(Link {
                        text: String::new(),
                        target: dest_url.to_string(),
                        email: link_type == LinkType::Email,
                        line: index.line_of(range.start),
                    });
                }
                Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                    if let Some(mut link) = pending_links.pop() {
                        link.text = link.text.trim().to_string();
                        doc.links.push(link);
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some(block) = current_block.as_mut() {
                        block.content.push_str(&text);
                        continue;
                    }
                    if let Some(heading) = current_heading.as_mut() {
                        heading.text.push_str(&text);
                    }
                    if let Some(link) = pending_links.last_mut() {
                        link.text.push_str(&text);
                    }
                }
                _ => {}
            }
        }

        doc
    }

    /// Heading tree, nested by level
    pub fn sections(&self) -> Vec<Section> {
        let mut roots = Vec::new();
        let mut stack: Vec<Section> = Vec::new();

        for heading in &self.headings {
            while stack
                .last()
                .is_some_and(|open| open.heading.level >= heading.level)
            {
                close_section(&mut stack, &mut roots);
            }
            stack.push(Section::new(heading.clone()));
        }
        while !stack.is_empty() {
            close_section(&mut stack, &mut roots);
        }

        roots
    }

    /// Whether any heading answers to `#anchor`
    pub fn has_anchor(&self, anchor: &str) -> bool {
        self.headings.iter().any(|h| {
            h.id.as_deref() == Some(anchor) || anchor_matches(&h.text, anchor)
        })
    }

    /// Line range `(first, last)` of the body under the heading at `idx`,
    /// ending before the next heading
    pub fn heading_body(&self, idx: usize) -> Option<(usize, Option<usize>)> {
        let heading = self.headings.get(idx)?;
        let next = self.headings.get(idx + 1).map(|h| h.line.saturating_sub(1));
        Some((heading.line + 1, next))
    }
}

fn close_section(stack: &mut Vec<Section>, roots: &mut Vec<Section>) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// GitHub-style heading slug
pub fn github_slug(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

/// Heading/anchor equality under the usual anchor spellings
pub fn anchor_matches(heading: &str, anchor: &str) -> bool {
    let heading = heading.trim().to_lowercase();
    let anchor = anchor.trim().to_lowercase();
    heading == anchor.replace('-', " ")
        || heading.replace(' ', "-") == anchor
        || github_slug(&heading) == anchor
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Title\n\nIntro with [guide](guide.md#setup \"Guide\").\n\n## `pub fn add(x: i32)`\n\n```rust\npub fn add(x: i32) -> i32 {\n}\n```\n\n### Details\n\n```\n[not a link](nowhere.md)\n```\n\n## Other\n";

    #[test]
    fn test_headings_with_lines() {
        let doc = MarkdownDoc::parse(DOC);
        let headings: Vec<_> = doc
            .headings
            .iter()
            .map(|h| (h.level, h.text.as_str(), h.line))
            .collect();
        assert_eq!(
            headings,
            vec![
                (1, "Title", 1),
                (2, "pub fn add(x: i32)", 5),
                (3, "Details", 12),
                (2, "Other", 18),
            ]
        );
        assert_eq!(doc.headings[1].raw, "`pub fn add(x: i32)`");
    }

    #[test]
    fn test_code_blocks_with_lines_and_section() {
        let doc = MarkdownDoc::parse(DOC);
        assert_eq!(doc.code_blocks.len(), 2);

        let block = &doc.code_blocks[0];
        assert_eq!(block.lang, "rust");
        assert_eq!(block.section.as_deref(), Some("pub fn add(x: i32)"));
        let lines: Vec<_> = block.lines().collect();
        assert_eq!(lines[0], (8, "pub fn add(x: i32) -> i32 {"));
        assert_eq!(doc.code_blocks[1].lang, "");
    }

    #[test]
    fn test_links_skip_code_and_titles() {
        let doc = MarkdownDoc::parse(DOC);
        assert_eq!(doc.links.len(), 1);
        assert_eq!(doc.links[0].target, "guide.md#setup");
        assert_eq!(doc.links[0].text, "guide");
        assert_eq!(doc.links[0].line, 3);
    }

    #[test]
    fn test_email_autolinks_flagged() {
        let doc = MarkdownDoc::parse("Contact <someone@example.com> or see <https://example.com>.\n");
        assert_eq!(doc.links.len(), 2);
        assert!(doc.links[0].email);
        assert_eq!(doc.links[0].target, "someone@example.com");
        assert!(!doc.links[1].email);
    }

    #[test]
    fn test_heading_attributes_stripped_from_raw() {
        let doc = MarkdownDoc::parse("## `Config` {#cfg}\n\n## Plain { .wide }\n\n## Braces `{}`\n");
        assert_eq!(doc.headings[0].raw, "`Config`");
        assert_eq!(doc.headings[0].id.as_deref(), Some("cfg"));
        assert_eq!(doc.headings[0].text, "Config");
        assert_eq!(doc.headings[1].raw, "Plain");
        assert_eq!(doc.headings[2].raw, "Braces `{}`");
        assert!(doc.has_anchor("cfg"));
        assert!(doc.has_anchor("config"));
    }

    #[test]
    fn test_sections_nest_by_level() {
        let doc = MarkdownDoc::parse(DOC);
        let sections = doc.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].children.len(), 2);
        assert_eq!(sections[0].children[0].children[0].heading.text, "Details");
    }

    #[test]
    fn test_anchor_matching() {
        assert!(anchor_matches("Getting Started", "getting-started"));
        assert!(anchor_matches("API Reference", "api-reference"));
        assert!(anchor_matches("What's new?", "whats-new"));
        assert!(!anchor_matches("Install", "setup"));
    }

    #[test]
    fn test_heading_body_range() {
        let doc = MarkdownDoc::parse(DOC);
        assert_eq!(doc.heading_body(0), Some((2, Some(4))));
        assert_eq!(doc.heading_body(3), Some((19, None)));
        assert_eq!(doc.heading_body(9), None);
    }
}
