//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::report::ExportFormat;
use clap::Parser;
use std::path::PathBuf;

/// StakeMap - stakeholder influence mapper
///
/// Track stakeholders with influence, support and engagement scores, chart
/// their reporting lines, and export a JSON or printable HTML report.
/// Commands are read line by line from stdin or from a script file.
///
/// Examples:
///   stakemap
///   stakemap --script session.txt --format html --output-dir reports
///   stakemap --load stakeholder-analysis-2026-10-19.json
///   stakemap --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Read session commands from this file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Seed the session from a previously exported JSON report
    #[arg(long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// Directory export artifacts are written to
    #[arg(short, long, value_name = "DIR", env = "STAKEMAP_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Default export format (json, html)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ExportFormat>,

    /// Minimum number of stakeholders before a report can be exported
    #[arg(long, value_name = "COUNT")]
    pub min_stakeholders: Option<usize>,

    /// Do not embed the print-on-open script in HTML reports
    #[arg(long)]
    pub no_auto_print: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .stakemap.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .stakemap.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.min_stakeholders == Some(0) {
            return Err("Minimum stakeholders must be at least 1".to_string());
        }

        if let Some(ref script) = self.script {
            if !script.is_file() {
                return Err(format!("Script file does not exist: {}", script.display()));
            }
        }

        if let Some(ref load) = self.load {
            if !load.is_file() {
                return Err(format!("Report file does not exist: {}", load.display()));
            }
        }

        if let Some(ref dir) = self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!("Output path is not a directory: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is `[general] verbose` from the config file; `--quiet`
    /// still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
