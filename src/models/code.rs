use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Kind of a recognized declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Function,
    Struct,
    Enum,
    Trait,
    Impl,
    Test,
}

impl CodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeKind::Function => "function",
            CodeKind::Struct => "struct",
            CodeKind::Enum => "enum",
            CodeKind::Trait => "trait",
            CodeKind::Impl => "impl",
            CodeKind::Test => "test",
        }
    }

    /// Kinds a specification can declare as requirements
    pub fn specifiable() -> [CodeKind; 4] {
        [
            CodeKind::Function,
            CodeKind::Struct,
            CodeKind::Enum,
            CodeKind::Trait,
        ]
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declaration discovered in a source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeItem {
    pub name: String,
    pub kind: CodeKind,
    pub file_path: PathBuf,
    /// 1-indexed line of the declaration
    pub line: usize,
    /// The matched declaration text, verbatim
    pub signature: String,
    pub public: bool,
    /// Kind-specific captures: `generics`, `params`, `returns`, `trait`, `for_type`
    pub details: BTreeMap<String, String>,
}

impl CodeItem {
    /// Look up a non-empty detail value
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .get(key)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// `path:line` location string
    pub fn location(&self) -> String {
        format!("{}:{}", self.file_path.display(), self.line)
    }
}

/// Inventory of every declaration found under a code root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeAnalysis {
    pub functions: Vec<CodeItem>,
    pub structs: Vec<CodeItem>,
    pub enums: Vec<CodeItem>,
    pub traits: Vec<CodeItem>,
    pub impls: Vec<CodeItem>,
    pub tests: Vec<CodeItem>,
    pub total_files: usize,
    /// `"<path>: <cause>"` for every file that could not be scanned
    pub parse_errors: Vec<String>,
}

impl CodeAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// File an item under the bucket for its kind
    pub fn push(&mut self, item: CodeItem) {
        match item.kind {
            CodeKind::Function => self.functions.push(item),
            CodeKind::Struct => self.structs.push(item),
            CodeKind::Enum => self.enums.push(item),
            CodeKind::Trait => self.traits.push(item),
            CodeKind::Impl => self.impls.push(item),
            CodeKind::Test => self.tests.push(item),
        }
    }

    pub fn items(&self, kind: CodeKind) -> &[CodeItem] {
        match kind {
            CodeKind::Function => &self.functions,
            CodeKind::Struct => &self.structs,
            CodeKind::Enum => &self.enums,
            CodeKind::Trait => &self.traits,
            CodeKind::Impl => &self.impls,
            CodeKind::Test => &self.tests,
        }
    }

    /// Public functions, structs, enums, and traits in bucket order
    pub fn public_items(&self) -> impl Iterator<Item = &CodeItem> {
        CodeKind::specifiable()
            .into_iter()
            .flat_map(move |kind| self.items(kind).iter())
            .filter(|item| item.public)
    }

    pub fn public_functions(&self) -> impl Iterator<Item = &CodeItem> {
        self.functions.iter().filter(|f| f.public)
    }

    pub fn total_items(&self) -> usize {
        self.functions.len()
            + self.structs.len()
            + self.enums.len()
            + self.traits.len()
            + self.impls.len()
            + self.tests.len()
    }

    pub fn to_compact_json(&self) -> Value {
        json!({
            "fn_cnt": self.functions.len(),
            "struct_cnt": self.structs.len(),
            "enum_cnt": self.enums.len(),
            "trait_cnt": self.traits.len(),
            "impl_cnt": self.impls.len(),
            "test_cnt": self.tests.len(),
            "file_cnt": self.total_files,
            "err_cnt": self.parse_errors.len(),
            "parse_errors": self.parse_errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, kind: CodeKind, public: bool) -> CodeItem {
        CodeItem {
            name: name.to_string(),
            kind,
            file_path: PathBuf::from("src/lib.rs"),
            line: 1,
            signature: String::new(),
            public,
            details: BTreeMap::new(),
        }
    }

    #[test]
    fn test_push_routes_by_kind() {
        let mut analysis = CodeAnalysis::new();
        analysis.push(item("add", CodeKind::Function, true));
        analysis.push(item("Config", CodeKind::Struct, true));
        analysis.push(item("test_add", CodeKind::Test, false));

        assert_eq!(analysis.functions.len(), 1);
        assert_eq!(analysis.structs.len(), 1);
        assert_eq!(analysis.tests.len(), 1);
        assert_eq!(analysis.total_items(), 3);
    }

    #[test]
    fn test_public_items_skip_private_and_impls() {
        let mut analysis = CodeAnalysis::new();
        analysis.push(item("add", CodeKind::Function, true));
        analysis.push(item("helper", CodeKind::Function, false));
        analysis.push(item("Config", CodeKind::Impl, false));
        analysis.push(item("Shape", CodeKind::Enum, true));

        let names: Vec<_> = analysis.public_items().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["add", "Shape"]);
    }

    #[test]
    fn test_compact_json_counts() {
        let mut analysis = CodeAnalysis::new();
        analysis.push(item("add", CodeKind::Function, true));
        analysis.total_files = 2;
        let json = analysis.to_compact_json();
        assert_eq!(json["fn_cnt"], 1);
        assert_eq!(json["file_cnt"], 2);
        assert_eq!(json["err_cnt"], 0);
    }

    #[test]
    fn test_detail_ignores_empty_values() {
        let mut it = item("add", CodeKind::Function, true);
        it.details.insert("returns".into(), String::new());
        it.details.insert("params".into(), "x: i32".into());
        assert_eq!(it.detail("returns"), None);
        assert_eq!(it.detail("params"), Some("x: i32"));
    }
}
