use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use paritycheck::cli::validate_parity::{self, ParityOptions};
use paritycheck::logging::init_tracing;
use paritycheck::Result;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "paritycheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Documentation/code parity validation", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate code against specs, API docs, test requirements and references
    Validate {
        /// Project root (default: nearest ancestor with .git, Cargo.toml or crates/)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Config file (default: <root>/parity.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Code root directory
        #[arg(long)]
        code_dir: Option<PathBuf>,

        /// Specification directory
        #[arg(long)]
        spec_dir: Option<PathBuf>,

        /// API documentation directory
        #[arg(long)]
        api_dir: Option<PathBuf>,

        /// Per-unit instruction directory
        #[arg(long)]
        instruction_dir: Option<PathBuf>,

        /// Test code directory
        #[arg(long)]
        test_dir: Option<PathBuf>,

        /// Documentation root
        #[arg(long)]
        docs_dir: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Include per-stage details
        #[arg(long)]
        detailed: bool,

        /// Omit fix suggestions
        #[arg(long)]
        no_fix: bool,

        /// Enable debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Validate {
            root,
            config,
            code_dir,
            spec_dir,
            api_dir,
            instruction_dir,
            test_dir,
            docs_dir,
            json,
            detailed,
            no_fix,
            verbose,
        } => {
            init_tracing(verbose);
            let options = ParityOptions {
                root,
                config,
                code_dir,
                spec_dir,
                api_dir,
                instruction_dir,
                test_dir,
                docs_dir,
                json,
                detailed,
                no_fix,
            };
            validate_parity::run(&options)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "paritycheck", &mut io::stdout());
            Ok(0)
        }
    }
}
