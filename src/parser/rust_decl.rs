//! Lexical Rust declaration recognizer
//!
//! Works line by line over comment-stripped source. A line that matches no
//! pattern is skipped, so unusual syntax costs a missed declaration and never
//! an error. The same recognizer backs the code inventory, the declaration
//! blocks of specification documents and the test counter.

use crate::models::{CodeItem, CodeKind};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

/// A declaration recognized on a single line
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub kind: CodeKind,
    pub public: bool,
    /// 1-indexed line, 0 when recognized outside a source scan
    pub line: usize,
    /// The recognized line, verbatim after comment stripping
    pub signature: String,
    pub details: BTreeMap<String, String>,
}

impl Declaration {
    pub fn into_item(self, file_path: &Path) -> CodeItem {
        CodeItem {
            name: self.name,
            kind: self.kind,
            file_path: file_path.to_path_buf(),
            line: self.line,
            signature: self.signature,
            public: self.public,
            details: self.details,
        }
    }
}

/// Compiled recognizer patterns
///
/// Compiled once per instance; no process-wide state.
#[derive(Debug, Clone)]
pub struct DeclPatterns {
    function: Regex,
    type_decl: Regex,
    trait_decl: Regex,
    impl_block: Regex,
    test_attr: Regex,
    cfg_test: Regex,
    module: Regex,
}

const VISIBILITY: &str = r"(?P<vis>pub(?:\s*\([^)]*\))?\s+)?";

impl DeclPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            function: Regex::new(&format!(
                r#"^{VISIBILITY}(?:default\s+)?(?:(?:const|async|unsafe)\s+)*(?:extern\s+(?:"[^"]*"\s*)?)?fn\s+(?P<name>[A-Za-z_]\w*)"#
            ))?,
            type_decl: Regex::new(&format!(
                r"^{VISIBILITY}(?P<kw>struct|enum)\s+(?P<name>[A-Za-z_]\w*)"
            ))?,
            trait_decl: Regex::new(&format!(
                r"^{VISIBILITY}(?:unsafe\s+)?(?:auto\s+)?trait\s+(?P<name>[A-Za-z_]\w*)"
            ))?,
            impl_block: Regex::new(r"^(?:unsafe\s+)?impl(?P<rest>(?:<|\s).*)$")?,
            test_attr: Regex::new(r"^#\[(?:\w+::)*test\b[^\]]*\]")?,
            cfg_test: Regex::new(r"^#\[cfg\(test\)\]")?,
            module: Regex::new(&format!(
                r"^{VISIBILITY}mod\s+(?P<name>[A-Za-z_]\w*)\s*(?P<body>\{{)?"
            ))?,
        })
    }

    /// Recognize a single trimmed line, without test classification
    pub fn recognize(&self, line: &str) -> Option<Declaration> {
        let line = line.trim();
        self.recognize_function(line)
            .or_else(|| self.recognize_type(line))
            .or_else(|| self.recognize_trait(line))
            .or_else(|| self.recognize_impl(line))
    }

    fn recognize_function(&self, line: &str) -> Option<Declaration> {
        let caps = self.function.captures(line)?;
        let name = caps.name("name")?;
        let mut rest = line[name.end()..].trim_start();
        let mut details = BTreeMap::new();

        let generics = leading_generics(rest);
        if let Some(generics) = generics {
            rest = rest[generics.len()..].trim_start();
        }
        details.insert("generics".to_string(), generics.unwrap_or("").to_string());

        // A parenthesized parameter list is required
        if !rest.starts_with('(') {
            return None;
        }
        let (params, closed_at) = enclosed(rest, '(', ')');
        details.insert("params".to_string(), params.trim().to_string());

        let returns = closed_at
            .map(|end| rest[end..].trim_start())
            .and_then(|after| after.strip_prefix("->"))
            .map(return_type)
            .unwrap_or_default();
        details.insert("returns".to_string(), returns);

        Some(Declaration {
            name: name.as_str().to_string(),
            kind: CodeKind::Function,
            public: is_public(caps.name("vis").map(|m| m.as_str())),
            line: 0,
            signature: line.to_string(),
            details,
        })
    }

    fn recognize_type(&self, line: &str) -> Option<Declaration> {
        let caps = self.type_decl.captures(line)?;
        let name = caps.name("name")?;
        let kind = match caps.name("kw").map(|m| m.as_str()) {
            Some("enum") => CodeKind::Enum,
            _ => CodeKind::Struct,
        };
        let generics = leading_generics(line[name.end()..].trim_start()).unwrap_or("");

        Some(Declaration {
            name: name.as_str().to_string(),
            kind,
            public: is_public(caps.name("vis").map(|m| m.as_str())),
            line: 0,
            signature: line.to_string(),
            details: BTreeMap::from([("generics".to_string(), generics.to_string())]),
        })
    }

    fn recognize_trait(&self, line: &str) -> Option<Declaration> {
        let caps = self.trait_decl.captures(line)?;
        let name = caps.name("name")?;
        let generics = leading_generics(line[name.end()..].trim_start()).unwrap_or("");

        Some(Declaration {
            name: name.as_str().to_string(),
            kind: CodeKind::Trait,
            public: is_public(caps.name("vis").map(|m| m.as_str())),
            line: 0,
            signature: line.to_string(),
            details: BTreeMap::from([("generics".to_string(), generics.to_string())]),
        })
    }

    fn recognize_impl(&self, line: &str) -> Option<Declaration> {
        let caps = self.impl_block.captures(line)?;
        let mut rest = caps.name("rest")?.as_str().trim_start();
        let mut details = BTreeMap::new();

        let generics = leading_generics(rest);
        if let Some(generics) = generics {
            rest = rest[generics.len()..].trim_start();
        }
        details.insert("generics".to_string(), generics.unwrap_or("").to_string());

        let header = header_text(rest);
        if header.is_empty() {
            return None;
        }

        let name = match header.split_once(" for ") {
            Some((trait_path, for_type)) => {
                let (trait_path, for_type) = (trait_path.trim(), for_type.trim());
                details.insert("trait".to_string(), trait_path.to_string());
                details.insert("for_type".to_string(), for_type.to_string());
                format!("{} for {}", base_name(trait_path), base_name(for_type))
            }
            None => base_name(header),
        };

        Some(Declaration {
            name,
            kind: CodeKind::Impl,
            public: false,
            line: 0,
            signature: line.to_string(),
            details,
        })
    }

    /// Scan a whole source file, classifying test functions
    pub fn scan_source(&self, content: &str) -> Vec<Declaration> {
        let mut cleaner = SourceCleaner::default();
        let mut declarations = Vec::new();
        let mut depth = 0usize;
        let mut test_mod_depth: Option<usize> = None;
        let mut pending_cfg_test = false;
        let mut next_is_test = false;

        for (idx, raw) in content.lines().enumerate() {
            let cleaned = cleaner.clean(raw);
            let depth_before = depth;
            depth = (depth + cleaned.opens).saturating_sub(cleaned.closes);

            let mut text = cleaned.text.trim();
            loop {
                if let Some(m) = self.test_attr.find(text) {
                    next_is_test = true;
                    text = text[m.end()..].trim_start();
                } else if let Some(m) = self.cfg_test.find(text) {
                    pending_cfg_test = true;
                    text = text[m.end()..].trim_start();
                } else {
                    break;
                }
            }

            if !text.is_empty() {
                if let Some(caps) = self.module.captures(text) {
                    if pending_cfg_test && caps.name("body").is_some() && test_mod_depth.is_none() {
                        test_mod_depth = Some(depth_before);
                    }
                    pending_cfg_test = false;
                } else if text.starts_with("#[") {
                    // Other attributes leave pending markers in place
                } else if let Some(mut decl) = self.recognize(text) {
                    pending_cfg_test = false;
                    decl.line = idx + 1;
                    if decl.kind == CodeKind::Function {
                        let conventional = !decl.public && decl.name.starts_with("test_");
                        if next_is_test || test_mod_depth.is_some() || conventional {
                            decl.kind = CodeKind::Test;
                        }
                        next_is_test = false;
                    }
                    declarations.push(decl);
                } else {
                    pending_cfg_test = false;
                }
            }

            if test_mod_depth.is_some_and(|open| depth <= open) {
                test_mod_depth = None;
            }
        }

        declarations
    }

    /// Number of test declarations in a source file
    pub fn count_tests(&self, content: &str) -> usize {
        self.scan_source(content)
            .iter()
            .filter(|d| d.kind == CodeKind::Test)
            .count()
    }
}

fn is_public(vis: Option<&str>) -> bool {
    vis.map(|v| v.trim() == "pub").unwrap_or(false)
}

/// `<...>` at the start of `text`, brackets included
fn leading_generics(text: &str) -> Option<&str> {
    if !text.starts_with('<') {
        return None;
    }
    let (_, end) = enclosed(text, '<', '>');
    end.map(|end| &text[..end])
}

/// Contents of the bracket pair opening at the start of `text`, and the byte
/// offset just past its closing bracket when it closes on this line
fn enclosed(text: &str, open: char, close: char) -> (&str, Option<usize>) {
    let mut depth = 0usize;
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        // `->` inside generics is not a closing bracket
        if c == close && !(close == '>' && prev == '-') {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return (&text[open.len_utf8()..i], Some(i + c.len_utf8()));
            }
        } else if c == open {
            depth += 1;
        }
        prev = c;
    }
    (text.get(open.len_utf8()..).unwrap_or(""), None)
}

/// Return type text up to the body, terminator, or where clause
fn return_type(text: &str) -> String {
    header_text(text).to_string()
}

fn header_text(text: &str) -> &str {
    let end = text.find(['{', ';']).unwrap_or(text.len());
    let text = &text[..end];
    let text = match text.find(" where ") {
        Some(pos) => &text[..pos],
        None => text.strip_suffix(" where").unwrap_or(text),
    };
    text.trim()
}

/// Last path segment of a type, without references or generics
fn base_name(ty: &str) -> String {
    let ty = ty.trim().trim_start_matches('&').trim_start();
    let ty = ty.strip_prefix("mut ").unwrap_or(ty);
    let ty = ty.strip_prefix("dyn ").unwrap_or(ty);
    let ty = ty.split('<').next().unwrap_or(ty);
    let name = ty.rsplit("::").next().unwrap_or(ty).trim();
    if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        ty.trim().to_string()
    }
}

// =============================================================================
// Comment and literal stripping
// =============================================================================

/// A source line with comments removed and code braces counted
#[derive(Debug, Default, PartialEq)]
pub struct CleanLine {
    pub text: String,
    pub opens: usize,
    pub closes: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum LexState {
    #[default]
    Code,
    /// Nested block comment depth
    Block(usize),
    Str,
    /// Raw string with the given number of `#`s
    RawStr(usize),
}

/// Strips `//` and `/* */` comments across lines, tracking string literals so
/// that comment markers and braces inside them are ignored
#[derive(Debug, Default)]
pub struct SourceCleaner {
    state: LexState,
}

impl SourceCleaner {
    pub fn clean(&mut self, line: &str) -> CleanLine {
        let chars: Vec<char> = line.chars().collect();
        let mut out = CleanLine::default();
        // Text of a literal continued from an earlier line is not emitted
        let mut emit_literal = self.state == LexState::Code;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            match self.state {
                LexState::Block(depth) => {
                    if c == '*' && next == Some('/') {
                        self.state = if depth > 1 {
                            LexState::Block(depth - 1)
                        } else {
                            LexState::Code
                        };
                        i += 2;
                        continue;
                    }
                    if c == '/' && next == Some('*') {
                        self.state = LexState::Block(depth + 1);
                        i += 2;
                        continue;
                    }
                }
                LexState::Str => {
                    if emit_literal {
                        out.text.push(c);
                    }
                    if c == '\\' {
                        if let (Some(escaped), true) = (next, emit_literal) {
                            out.text.push(escaped);
                        }
                        i += 2;
                        continue;
                    }
                    if c == '"' {
                        self.state = LexState::Code;
                        emit_literal = true;
                    }
                }
                LexState::RawStr(hashes) => {
                    if emit_literal {
                        out.text.push(c);
                    }
                    if c == '"' && (1..=hashes).all(|k| chars.get(i + k) == Some(&'#')) {
                        if emit_literal {
                            out.text.extend(std::iter::repeat('#').take(hashes));
                        }
                        self.state = LexState::Code;
                        emit_literal = true;
                        i += 1 + hashes;
                        continue;
                    }
                }
                LexState::Code => {
                    if c == '/' && next == Some('/') {
                        break;
                    }
                    if c == '/' && next == Some('*') {
                        self.state = LexState::Block(1);
                        i += 2;
                        continue;
                    }
                    if c == '"' {
                        self.state = LexState::Str;
                        out.text.push(c);
                        i += 1;
                        continue;
                    }
                    if c == 'r' && !follows_ident(&chars, i) {
                        let hashes = chars[i + 1..].iter().take_while(|&&h| h == '#').count();
                        if chars.get(i + 1 + hashes) == Some(&'"') {
                            self.state = LexState::RawStr(hashes);
                            out.text.push('r');
                            out.text.extend(std::iter::repeat('#').take(hashes));
                            out.text.push('"');
                            i += 2 + hashes;
                            continue;
                        }
                    }
                    if c == '\'' {
                        if let Some(len) = char_literal_len(&chars[i..]) {
                            out.text.extend(&chars[i..i + len]);
                            i += len;
                            continue;
                        }
                    }
                    match c {
                        '{' => out.opens += 1,
                        '}' => out.closes += 1,
                        _ => {}
                    }
                    out.text.push(c);
                }
            }
            i += 1;
        }

        out
    }
}

/// True when the character at `i` continues an identifier (`br"` counts as a prefix)
fn follows_ident(chars: &[char], i: usize) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    match i.checked_sub(1).map(|p| chars[p]) {
        None => false,
        Some('b') => i >= 2 && is_ident(chars[i - 2]),
        Some(prev) => is_ident(prev),
    }
}

/// Length of a char literal like `'x'` or `'\n'` starting at `chars[0]`
fn char_literal_len(chars: &[char]) -> Option<usize> {
    match chars.get(1) {
        Some('\\') => chars
            .iter()
            .skip(3)
            .position(|&c| c == '\'')
            .map(|pos| pos + 4),
        Some(_) if chars.get(2) == Some(&'\'') => Some(3),
        _ => None,
    }
}

// =============================================================================
// Signature comparison
// =============================================================================

/// Collapse whitespace, drop declaration keywords and trailing body markers, lowercase
pub fn normalize_signature(sig: &str) -> String {
    let collapsed = sig.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut sig = collapsed.to_lowercase();

    if let Some(pos) = sig.find('{') {
        sig.truncate(pos);
    }
    if let Some(pos) = sig.find(" where ") {
        sig.truncate(pos);
    }
    if let Some(stripped) = sig.strip_suffix(" where") {
        sig = stripped.to_string();
    }
    let mut rest = sig.trim_end_matches(['{', ';', ' ']);

    loop {
        let before = rest;
        for keyword in ["pub ", "default ", "const ", "async ", "unsafe ", "fn "] {
            rest = rest.strip_prefix(keyword).unwrap_or(rest);
        }
        if rest.starts_with("pub(") {
            if let Some(end) = rest.find(')') {
                rest = rest[end + 1..].trim_start();
            }
        }
        if let Some(after) = rest.strip_prefix("extern ") {
            rest = match after.strip_prefix('"').and_then(|a| a.split_once('"')) {
                Some((_, tail)) => tail.trim_start(),
                None => after,
            };
        }
        if rest == before {
            break;
        }
    }

    rest.to_string()
}

/// Function name from a signature, ignoring any module path
pub fn function_name(sig: &str) -> String {
    let normalized = normalize_signature(sig);
    let head = normalized.split('(').next().unwrap_or("");
    let head = head.split('<').next().unwrap_or(head).trim();
    let last = head.rsplit(' ').next().unwrap_or(head);
    last.rsplit("::").next().unwrap_or(last).to_string()
}

/// Number of parameters, excluding a `self` receiver
pub fn parameter_count(sig: &str) -> usize {
    let Some(start) = sig.find('(') else {
        return 0;
    };
    let (params, _) = enclosed(&sig[start..], '(', ')');

    let mut segments = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    let mut prev = '\0';
    for c in params.chars() {
        match c {
            '(' | '[' | '<' => depth += 1,
            ')' | ']' => depth -= 1,
            '>' if prev != '-' => depth -= 1,
            ',' if depth == 0 => {
                segments.push(std::mem::take(&mut current));
                prev = c;
                continue;
            }
            _ => {}
        }
        current.push(c);
        prev = c;
    }
    segments.push(current);

    segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .enumerate()
        .filter(|(i, s)| !(*i == 0 && is_self_receiver(s)))
        .count()
}

fn is_self_receiver(param: &str) -> bool {
    let mut p = param.trim_start_matches('&').trim_start();
    if p.starts_with('\'') {
        p = p.split_once(' ').map(|(_, tail)| tail).unwrap_or("");
    }
    let p = p.strip_prefix("mut ").unwrap_or(p).trim_start();
    match p.strip_prefix("self") {
        Some(tail) => !tail.starts_with(|c: char| c.is_alphanumeric() || c == '_'),
        None => false,
    }
}

/// Exact match, or same function name and parameter count
pub fn similar_signatures(a: &str, b: &str) -> bool {
    if normalize_signature(a) == normalize_signature(b) {
        return true;
    }
    function_name(a) == function_name(b) && parameter_count(a) == parameter_count(b)
}

/// Case-insensitive type equality, ignoring internal whitespace
pub fn similar_types(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a == b {
        return true;
    }
    let squash = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    squash(&a) == squash(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> DeclPatterns {
        DeclPatterns::new().unwrap()
    }

    #[test]
    fn test_recognize_public_function_details() {
        let decl = patterns()
            .recognize("pub fn parse<T: Into<String>>(input: T, strict: bool) -> Result<Ast, Error> {")
            .unwrap();
        assert_eq!(decl.name, "parse");
        assert_eq!(decl.kind, CodeKind::Function);
        assert!(decl.public);
        assert_eq!(decl.details["generics"], "<T: Into<String>>");
        assert_eq!(decl.details["params"], "input: T, strict: bool");
        assert_eq!(decl.details["returns"], "Result<Ast, Error>");
    }

    #[test]
    fn test_recognize_function_qualifiers_and_visibility() {
        let p = patterns();
        let decl = p.recognize("pub async unsafe fn run() {").unwrap();
        assert_eq!(decl.name, "run");
        assert!(decl.public);

        let decl = p.recognize(r#"pub extern "C" fn callback(x: i32) -> i32;"#).unwrap();
        assert_eq!(decl.name, "callback");
        assert_eq!(decl.details["returns"], "i32");

        let decl = p.recognize("pub(crate) fn internal() {").unwrap();
        assert!(!decl.public);
    }

    #[test]
    fn test_recognize_returns_stop_at_where_clause() {
        let decl = patterns()
            .recognize("fn collect<I>(iter: I) -> Vec<u8> where I: Iterator {")
            .unwrap();
        assert_eq!(decl.details["returns"], "Vec<u8>");
    }

    #[test]
    fn test_recognize_types_and_traits() {
        let p = patterns();
        let decl = p.recognize("pub struct Cache<K, V> {").unwrap();
        assert_eq!(decl.kind, CodeKind::Struct);
        assert_eq!(decl.details["generics"], "<K, V>");

        let decl = p.recognize("enum State {").unwrap();
        assert_eq!(decl.kind, CodeKind::Enum);
        assert!(!decl.public);

        let decl = p.recognize("pub trait Scorer: Send {").unwrap();
        assert_eq!(decl.kind, CodeKind::Trait);
        assert_eq!(decl.name, "Scorer");
    }

    #[test]
    fn test_recognize_impl_blocks() {
        let p = patterns();
        let decl = p.recognize("impl<T> From<T> for Wrapper<T> {").unwrap();
        assert_eq!(decl.kind, CodeKind::Impl);
        assert_eq!(decl.name, "From for Wrapper");
        assert_eq!(decl.details["for_type"], "Wrapper<T>");
        assert!(!decl.public);

        let decl = p.recognize("impl fmt::Display for CodeKind {").unwrap();
        assert_eq!(decl.name, "Display for CodeKind");

        let decl = p.recognize("impl Config {").unwrap();
        assert_eq!(decl.name, "Config");
    }

    #[test]
    fn test_prose_is_not_recognized() {
        let p = patterns();
        assert!(p.recognize("implementation details follow").is_none());
        assert!(p.recognize("fn without parens").is_none());
        assert!(p.recognize("let x = 5;").is_none());
    }

    #[test]
    fn test_scan_classifies_tests() {
        let source = r#"
pub fn add(x: i32) -> i32 {
    x
}

fn test_helper_name() {}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> i32 { 1 }

    #[test]
    fn adds() {
        assert_eq!(add(1), 1);
    }
}

fn after_tests() {}
"#;
        let decls = patterns().scan_source(source);
        let kinds: Vec<_> = decls.iter().map(|d| (d.name.as_str(), d.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("add", CodeKind::Function),
                ("test_helper_name", CodeKind::Test),
                ("fixture", CodeKind::Test),
                ("adds", CodeKind::Test),
                ("after_tests", CodeKind::Function),
            ]
        );
        assert_eq!(decls[0].line, 2);
    }

    #[test]
    fn test_scan_path_qualified_test_attribute() {
        let source = "#[tokio::test(flavor = \"multi_thread\")]\nasync fn runs() {}\n#[test] fn inline() {}\n";
        assert_eq!(patterns().count_tests(source), 2);
    }

    #[test]
    fn test_scan_cfg_test_on_separate_line() {
        let source = "#[cfg(test)]\n#[allow(unused)]\nmod tests {\n    fn a() {}\n}\nfn b() {}\n";
        let decls = patterns().scan_source(source);
        assert_eq!(decls[0].kind, CodeKind::Test);
        assert_eq!(decls[1].kind, CodeKind::Function);
    }

    #[test]
    fn test_scan_skips_comments_and_strings() {
        let source = "/* pub fn hidden() {\n   still comment */\n// pub fn also_hidden() {}\nconst SRC: &str = r#\"\npub fn in_string() {}\n\"#;\npub fn visible() {}\n";
        let decls = patterns().scan_source(source);
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["visible"]);
        assert_eq!(decls[0].line, 7);
    }

    #[test]
    fn test_cleaner_ignores_braces_in_literals() {
        let mut cleaner = SourceCleaner::default();
        let line = cleaner.clean(r#"let s = "{"; let c = '}'; if x { // }"#);
        assert_eq!(line.opens, 1);
        assert_eq!(line.closes, 0);
        assert!(!line.text.contains("//"));
    }

    #[test]
    fn test_normalize_signature() {
        assert_eq!(
            normalize_signature("pub   fn Add(x: i32)  -> i32 {"),
            "add(x: i32) -> i32"
        );
        assert_eq!(normalize_signature("pub(crate) async fn run();"), "run()");
        assert_eq!(normalize_signature("fn f<T>(x: T) where T: Clone"), "f<t>(x: t)");
    }

    #[test]
    fn test_parameter_count() {
        assert_eq!(parameter_count("multiply(a, b)"), 2);
        assert_eq!(parameter_count("fn f()"), 0);
        assert_eq!(parameter_count("fn f(&mut self, map: HashMap<K, V>, f: impl Fn(i32, i32) -> i32)"), 2);
        assert_eq!(parameter_count("fn g(a: i32,)"), 1);
    }

    #[test]
    fn test_similar_signatures() {
        assert!(similar_signatures("multiply(a, b)", "pub fn multiply(a: i32, b: i32) -> i32 {"));
        assert!(similar_signatures("math::area(&self)", "pub fn area(&self) -> f64"));
        assert!(!similar_signatures("multiply(a)", "pub fn multiply(a: i32, b: i32)"));
        assert!(!similar_signatures("divide(a, b)", "pub fn multiply(a: i32, b: i32)"));
    }

    #[test]
    fn test_similar_types() {
        assert!(similar_types("Vec<String>", "vec<string>"));
        assert!(similar_types("Result<T, E>", "Result<T,E>"));
        assert!(!similar_types("Option<i32>", "i32"));
    }
}
