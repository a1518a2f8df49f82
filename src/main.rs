use clap::Parser;
use kube_schema_lint::cli::{Cli, Commands};
use kube_schema_lint::handlers::{self, LintOptions};
use std::process;

fn main() {
    match run() {
        Ok(true) => process::exit(1),
        Ok(false) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Returns `true` when the command found failures that should fail the run.
fn run() -> kube_schema_lint::Result<bool> {
    let cli = Cli::parse();
    cli.init_logging();

    let config = handlers::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Lint {
            paths,
            schemas,
            format,
            threshold,
            no_fail,
            ignore,
        } => handlers::handle_lint(
            LintOptions {
                paths,
                schemas,
                format,
                threshold,
                no_fail,
                ignore,
                quiet: cli.quiet,
            },
            config,
        ),
        Commands::Detect { paths } => handlers::handle_detect(&paths, &config).map(|_| false),
        Commands::Schemas { schemas, json } => {
            handlers::handle_schemas(&schemas, json, &config).map(|_| false)
        }
    }
}
