//! Handlers for the `lint`, `detect` and `schemas` commands.

use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::analyzer::kubeschema::schema::{self, ModelRegistry};
use crate::analyzer::kubeschema::{
    KubeSchemaConfig, OutputFormat, Severity, collect_files, format_result_to_string,
    is_kubernetes_yaml, lint, load_registry,
};
use crate::cli::{OutputFormat as CliOutputFormat, SeverityThreshold};
use crate::error::{KubeSchemaError, Result};

/// Options for the `lint` command.
pub struct LintOptions {
    pub paths: Vec<PathBuf>,
    pub schemas: Vec<PathBuf>,
    pub format: CliOutputFormat,
    pub threshold: Option<SeverityThreshold>,
    pub no_fail: bool,
    pub ignore: Vec<String>,
    pub quiet: bool,
}

/// Load the configuration from an explicit file, the working directory, or defaults.
pub fn load_config(config_path: Option<&Path>) -> Result<KubeSchemaConfig> {
    match config_path {
        Some(path) => Ok(KubeSchemaConfig::load_from_file(path)?),
        None => Ok(KubeSchemaConfig::load_from_default().unwrap_or_default()),
    }
}

/// Lint manifests. Returns `true` if the run should exit with a failure.
pub fn handle_lint(options: LintOptions, config: KubeSchemaConfig) -> Result<bool> {
    let mut config = config;
    if let Some(threshold) = options.threshold {
        config.failure_threshold = severity(threshold);
    }
    if options.no_fail {
        config.no_fail = true;
    }
    config.ignore_paths.extend(options.ignore);

    let registry = publish_registry(&options.schemas, &config)?;
    log::info!(
        "checking {} path(s) against {} resource type(s)",
        options.paths.len(),
        registry.len()
    );

    let result = lint(&options.paths, registry, &config);
    let format = match options.format {
        CliOutputFormat::Plain => OutputFormat::Plain,
        CliOutputFormat::Json => OutputFormat::Json,
        CliOutputFormat::Github => OutputFormat::GitHub,
    };

    if !(options.quiet && format == OutputFormat::Plain) {
        print!("{}", format_result_to_string(&result, format));
    }

    if format == OutputFormat::Plain && !options.quiet {
        let summary = format!(
            "Checked {} file(s), {} document(s); skipped {} non-Kubernetes file(s)",
            result.summary.files_checked,
            result.summary.documents_checked,
            result.summary.files_skipped
        );
        if result.summary.passed {
            println!("{} {}", "✓".green(), summary);
        } else {
            println!("{} {}", "✗".red().bold(), summary);
        }
    }

    Ok(result.should_fail(&config))
}

/// Print whether each file is a Kubernetes YAML file.
pub fn handle_detect(paths: &[PathBuf], config: &KubeSchemaConfig) -> Result<()> {
    for path in paths {
        if !path.exists() {
            return Err(KubeSchemaError::InvalidArgument(format!(
                "path does not exist: {}",
                path.display()
            )));
        }
        for file in collect_files(path, config) {
            if is_kubernetes_yaml(&file) {
                println!("{}: {}", file.display(), "kubernetes".green());
            } else {
                println!("{}: {}", file.display(), "not kubernetes".dimmed());
            }
        }
    }
    Ok(())
}

/// List the resource types of the loaded schemas.
pub fn handle_schemas(schemas: &[PathBuf], json: bool, config: &KubeSchemaConfig) -> Result<()> {
    let registry = publish_registry(schemas, config)?;

    if json {
        let keys: Vec<String> = registry.keys().iter().map(|k| k.to_string()).collect();
        let output = serde_json::json!({
            "sources": registry
                .sources()
                .iter()
                .map(|s| serde_json::json!({
                    "version": &s.version,
                    "origin": s.origin.as_ref().map(|p| p.display().to_string()),
                    "definitions": s.definitions,
                    "resources": s.resources,
                }))
                .collect::<Vec<_>>(),
            "resources": keys,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    for source in registry.sources() {
        let origin = source
            .origin
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        println!(
            "{} {} ({} definitions, {} resources)",
            source.version.bold(),
            origin.dimmed(),
            source.definitions,
            source.resources
        );
    }
    for key in registry.keys() {
        println!("  {}", key);
    }
    Ok(())
}

fn publish_registry(
    cli_schemas: &[PathBuf],
    config: &KubeSchemaConfig,
) -> Result<&'static ModelRegistry> {
    if let Some(registry) = schema::global() {
        return Ok(registry);
    }

    let paths = if cli_schemas.is_empty() {
        config.schema_paths.as_slice()
    } else {
        cli_schemas
    };
    if paths.is_empty() {
        return Err(KubeSchemaError::NoSchemas);
    }

    let registry = load_registry(paths)?;
    match schema::install_global(registry) {
        Ok(registry) => Ok(registry),
        // Another caller published first; use theirs.
        Err(_) => schema::global().ok_or(KubeSchemaError::NoSchemas),
    }
}

fn severity(threshold: SeverityThreshold) -> Severity {
    match threshold {
        SeverityThreshold::Error => Severity::Error,
        SeverityThreshold::Warning => Severity::Warning,
        SeverityThreshold::Info => Severity::Info,
    }
}
