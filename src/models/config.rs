use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up at the project root
pub const CONFIG_FILE: &str = "parity.toml";

// =============================================================================
// Directory Configuration
// =============================================================================

/// Input directories, relative to the project root unless absolute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Code root (default: "crates")
    #[serde(default = "default_code_dir")]
    pub code: PathBuf,
    /// Specification documents (default: "docs/specification")
    #[serde(default = "default_spec_dir")]
    pub spec: PathBuf,
    /// API documents (default: "docs/api")
    #[serde(default = "default_api_dir")]
    pub api: PathBuf,
    /// Per-unit instruction documents (default: "phases")
    #[serde(default = "default_instruction_dir")]
    pub instructions: PathBuf,
    /// Test code (default: "crates")
    #[serde(default = "default_code_dir")]
    pub tests: PathBuf,
    /// Documentation root, the scope of orphan detection (default: "docs")
    #[serde(default = "default_docs_dir")]
    pub docs: PathBuf,
}

fn default_code_dir() -> PathBuf {
    PathBuf::from("crates")
}

fn default_spec_dir() -> PathBuf {
    PathBuf::from("docs/specification")
}

fn default_api_dir() -> PathBuf {
    PathBuf::from("docs/api")
}

fn default_instruction_dir() -> PathBuf {
    PathBuf::from("phases")
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            code: default_code_dir(),
            spec: default_spec_dir(),
            api: default_api_dir(),
            instructions: default_instruction_dir(),
            tests: default_code_dir(),
            docs: default_docs_dir(),
        }
    }
}

// =============================================================================
// Matching Configuration
// =============================================================================

/// Confidence threshold and point weights for requirement matching
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum confidence for a match (default: 0.70)
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Case-insensitive name equality
    #[serde(default = "default_exact_name")]
    pub exact_name: f64,
    /// Code name contains the requirement name
    #[serde(default = "default_code_contains_req")]
    pub code_contains_req: f64,
    /// Requirement name contains the code name
    #[serde(default = "default_req_contains_code")]
    pub req_contains_code: f64,
    /// Declared kind equals the candidate's kind
    #[serde(default = "default_kind_weight")]
    pub kind: f64,
    /// Candidate is public
    #[serde(default = "default_public_weight")]
    pub public: f64,
}

fn default_threshold() -> f64 {
    0.70
}

fn default_exact_name() -> f64 {
    0.6
}

fn default_code_contains_req() -> f64 {
    0.3
}

fn default_req_contains_code() -> f64 {
    0.2
}

fn default_kind_weight() -> f64 {
    0.3
}

fn default_public_weight() -> f64 {
    0.1
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            exact_name: default_exact_name(),
            code_contains_req: default_code_contains_req(),
            req_contains_code: default_req_contains_code(),
            kind: default_kind_weight(),
            public: default_public_weight(),
        }
    }
}

impl MatchingConfig {
    /// Reject a threshold or weight outside [0, 1]
    pub fn validate(&self) -> anyhow::Result<()> {
        let values = [
            ("threshold", self.threshold),
            ("exact_name", self.exact_name),
            ("code_contains_req", self.code_contains_req),
            ("req_contains_code", self.req_contains_code),
            ("kind", self.kind),
            ("public", self.public),
        ];
        for (name, value) in values {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("matching.{} must be within [0, 1], got {}", name, value);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Document Configuration
// =============================================================================

/// Specification document settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecConfig {
    /// Fenced block languages scanned for declarations
    #[serde(default = "default_block_languages")]
    pub block_languages: Vec<String>,
}

fn default_block_languages() -> Vec<String> {
    vec!["rust".to_string(), "rs".to_string()]
}

impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            block_languages: default_block_languages(),
        }
    }
}

impl SpecConfig {
    pub fn scans_language(&self, lang: &str) -> bool {
        self.block_languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(lang.trim()))
    }
}

/// Cross-reference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// File names never reported as orphaned (case-insensitive)
    #[serde(default = "default_entry_points")]
    pub entry_points: Vec<String>,
}

fn default_entry_points() -> Vec<String> {
    vec!["readme.md".to_string(), "index.md".to_string()]
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            entry_points: default_entry_points(),
        }
    }
}

impl ReferenceConfig {
    pub fn is_entry_point(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                self.entry_points
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(name))
            })
            .unwrap_or(false)
    }
}

// =============================================================================
// Parity Configuration
// =============================================================================

/// Parity engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParityConfig {
    #[serde(default)]
    pub dirs: DirectoryConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub spec: SpecConfig,

    #[serde(default)]
    pub references: ReferenceConfig,
}

impl ParityConfig {
    /// Load config from parity.toml at the project root
    pub fn load(project_root: &Path) -> anyhow::Result<Self> {
        Self::load_from(&project_root.join(CONFIG_FILE))
    }

    /// Load config from an explicit path; a missing file yields defaults
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: ParityConfig = toml::from_str(&content)?;
        config
            .matching
            .validate()
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
        Ok(config)
    }
}

/// Walk up from `start` to the nearest directory that looks like a project root
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| {
            dir.join(".git").exists() || dir.join("Cargo.toml").exists() || dir.join("crates").is_dir()
        })
        .unwrap_or(start)
        .to_path_buf()
}
