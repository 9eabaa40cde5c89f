//! CLI argument parsing module for depaudit

use crate::error::ConfigError;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Dependency update auditor for rebar.config, package.json and repository lists
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depaudit",
    version,
    about = "Audit dependencies against their upstream releases"
)]
pub struct CliArgs {
    /// Manifest file or directory to audit (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Configuration file (default: depaudit.toml next to the target, if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the markdown report to this file (single manifest only)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not write markdown reports
    #[arg(long)]
    pub no_report: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output (debug logging, per-dependency details)
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable quiet mode - errors only
    #[arg(short, long)]
    pub quiet: bool,

    // Dependency filters
    /// Skip specific dependencies (can be specified multiple times)
    #[arg(long, action = ArgAction::Append, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Audit only specific dependencies (can be specified multiple times)
    #[arg(long, action = ArgAction::Append, value_name = "NAME")]
    pub only: Vec<String>,
}

impl CliArgs {
    /// Reject option combinations that cannot be honoured
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verbose && self.quiet {
            return Err(ConfigError::ConflictingOptions {
                message: "--verbose and --quiet cannot be used together".to_string(),
            });
        }
        if self.no_report && self.output.is_some() {
            return Err(ConfigError::ConflictingOptions {
                message: "--output cannot be combined with --no-report".to_string(),
            });
        }
        Ok(())
    }

    /// Default log filter for the selected verbosity
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Returns true if the progress display should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
