//! depaudit - Dependency audit CLI tool
//!
//! Compares the versions declared in rebar.config, package.json and
//! repository lists against their latest upstream releases and writes a
//! markdown report per manifest.

use clap::Parser;
use depaudit::cli::CliArgs;
use depaudit::config::AuditConfig;
use depaudit::orchestrator::Orchestrator;
use depaudit::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    init_tracing(args.log_level());

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by the CLI flags
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("depaudit v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
    }

    let config = AuditConfig::resolve(args.config.as_deref(), &args.path)?;

    // Create and run the orchestrator
    let orchestrator = Orchestrator::new(args.clone(), config)?;
    let result = orchestrator.run().await?;

    // Create output formatter based on CLI options
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    let formatter = create_formatter(output_config);

    // Output results
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    // Dependency-level failures are part of the report; only manifest and
    // report failures change the exit code
    if result.has_errors() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
