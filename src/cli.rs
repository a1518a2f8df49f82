use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kube-schema-lint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flag Kubernetes manifest properties that the resource schema does not declare")]
#[command(long_about = "Resolves the apiVersion and kind of every document in your Kubernetes manifests against OpenAPI (swagger.json) schemas, and reports every property the schema does not expect at that place in the document.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check manifests for properties their schema does not declare
    Lint {
        /// Files or directories to check
        #[arg(value_name = "PATH", default_value = ".")]
        paths: Vec<PathBuf>,

        /// Schema files or directories of swagger JSON files
        #[arg(short, long, value_name = "PATH", env = "KUBE_SCHEMA_PATH", value_delimiter = ',')]
        schemas: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,

        /// Minimum severity that fails the run
        #[arg(long, value_enum)]
        threshold: Option<SeverityThreshold>,

        /// Always exit with status 0
        #[arg(long)]
        no_fail: bool,

        /// Glob patterns of paths to skip
        #[arg(long, value_name = "PATTERN")]
        ignore: Vec<String>,
    },

    /// Report whether files are Kubernetes YAML files
    Detect {
        /// Files or directories to inspect
        #[arg(value_name = "PATH", default_value = ".")]
        paths: Vec<PathBuf>,
    },

    /// List the resource types known to the loaded schemas
    Schemas {
        /// Schema files or directories of swagger JSON files
        #[arg(short, long, value_name = "PATH", env = "KUBE_SCHEMA_PATH", value_delimiter = ',')]
        schemas: Vec<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
    Github,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityThreshold {
    Error,
    Warning,
    Info,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
