use crate::models::{find_project_root, Finding, ParityConfig, ParityReport};
use crate::validator::ParityChecker;
use crate::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::env;
use std::path::PathBuf;

/// Process exit status when validation completes with error findings
pub const EXIT_VALIDATION_FAILED: i32 = 3;

/// Options for the `validate` command
#[derive(Debug, Clone, Default)]
pub struct ParityOptions {
    /// Project root; discovered from the working directory when unset
    pub root: Option<PathBuf>,
    /// Explicit config file, instead of `<root>/parity.toml`
    pub config: Option<PathBuf>,
    pub code_dir: Option<PathBuf>,
    pub spec_dir: Option<PathBuf>,
    pub api_dir: Option<PathBuf>,
    pub instruction_dir: Option<PathBuf>,
    pub test_dir: Option<PathBuf>,
    pub docs_dir: Option<PathBuf>,
    pub json: bool,
    pub detailed: bool,
    pub no_fix: bool,
}

impl ParityOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn with_no_fix(mut self, no_fix: bool) -> Self {
        self.no_fix = no_fix;
        self
    }
}

/// Run the validate command; returns the process exit status
pub fn run(options: &ParityOptions) -> Result<i32> {
    let checker = build_checker(options)?;

    if !options.json {
        println!(
            "{}",
            format!("🔍 Validating parity: {}", checker.project_root().display()).cyan()
        );
        println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
    }

    let report = checker
        .check()
        .with_context(|| format!("Parity check failed for '{}'", checker.project_root().display()))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&render_json(&report, options))?);
    } else {
        print_report(&report, options);
    }

    Ok(exit_status(&report))
}

/// Resolve root and configuration. Precedence: CLI flag > config file > defaults
pub fn build_checker(options: &ParityOptions) -> Result<ParityChecker> {
    let root = match &options.root {
        Some(root) => root.clone(),
        None => find_project_root(&env::current_dir()?),
    };

    let mut config = match &options.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            ParityConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => ParityConfig::load(&root)
            .with_context(|| format!("Failed to load parity.toml in {}", root.display()))?,
    };

    let dirs = &mut config.dirs;
    let overrides = [
        (&options.code_dir, &mut dirs.code),
        (&options.spec_dir, &mut dirs.spec),
        (&options.api_dir, &mut dirs.api),
        (&options.instruction_dir, &mut dirs.instructions),
        (&options.test_dir, &mut dirs.tests),
        (&options.docs_dir, &mut dirs.docs),
    ];
    for (flag, slot) in overrides {
        if let Some(dir) = flag {
            *slot = dir.clone();
        }
    }

    tracing::debug!(root = %root.display(), "resolved project root");
    Ok(ParityChecker::new(root).with_config(config))
}

/// Compact record plus a human-readable `msg`
pub fn render_json(report: &ParityReport, options: &ParityOptions) -> Value {
    let mut json = report.to_compact_json(!options.no_fix, options.detailed);
    if let Value::Object(map) = &mut json {
        map.insert("msg".to_string(), Value::String(report.message()));
    }
    json
}

pub fn exit_status(report: &ParityReport) -> i32 {
    if report.ok {
        0
    } else {
        EXIT_VALIDATION_FAILED
    }
}

fn print_report(report: &ParityReport, options: &ParityOptions) {
    println!(
        "   Checks: {} total, {} passed, {} failed",
        report.total_checks, report.passed_checks, report.failed_checks
    );

    if !report.errors.is_empty() {
        println!();
        println!("{}", format!("📝 Errors ({}):", report.errors.len()).red());
        for finding in &report.errors {
            print_finding(finding, options);
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("{}", format!("⚠️  Warnings ({}):", report.warnings.len()).yellow());
        for finding in &report.warnings {
            print_finding(finding, options);
        }
    }

    if options.detailed && !report.details.is_empty() {
        println!();
        println!("{}", "📊 Details:".cyan());
        for (stage, summary) in &report.details {
            println!("   {}: {}", stage.bold(), summary);
        }
    }

    println!();
    if report.ok {
        println!("{}", format!("✅ {}", report.message()).green().bold());
    } else {
        println!("{}", format!("❌ {}", report.message()).red().bold());
    }
}

fn print_finding(finding: &Finding, options: &ParityOptions) {
    println!("   {}", finding.format());
    if !options.no_fix && !finding.fix.is_empty() {
        println!("      {} {}", "→".bright_black(), finding.fix.bright_black());
    }
}
