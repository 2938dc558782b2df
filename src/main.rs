//! StakeMap - stakeholder influence mapper
//!
//! A CLI session for mapping stakeholders: score their influence, support
//! and engagement, chart who reports to whom, and export the analysis as
//! JSON or as a printable HTML report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, config, unreadable input, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod hierarchy;
mod models;
mod report;
mod session;
mod store;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE};
use session::Session;
use std::io::{BufReader, IsTerminal};
use store::RecordStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is loaded before logging so `[general] verbose` can set the level
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(args.log_level(config.general.verbose));

    info!("StakeMap v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Effective config: {:?}", config);

    if let Err(e) = run(&args, &config) {
        error!("Session failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .stakemap.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to change the output directory, export format and thresholds.");
    Ok(())
}

/// Initialize logging at the given level.
///
/// Logs go to stderr; stdout carries the session itself.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Run one session over the script file or stdin.
fn run(args: &Args, config: &Config) -> Result<()> {
    let store = match args.load {
        Some(ref path) => RecordStore::load_report(path)?,
        None => RecordStore::new(),
    };

    let stdout = std::io::stdout();

    let session = match args.script {
        Some(ref script) => {
            let file = std::fs::File::open(script)
                .with_context(|| format!("Failed to open script: {}", script.display()))?;
            info!("Running script: {}", script.display());

            let mut session = Session::new(store, config, stdout.lock());
            session.run(BufReader::new(file))?;
            session
        }
        None => {
            let stdin = std::io::stdin();
            let interactive = stdin.is_terminal() && !args.quiet;
            if interactive {
                println!("📋 StakeMap: map stakeholder influence. Type `help` for commands.");
            }

            let mut session = Session::new(store, config, stdout.lock()).with_prompt(interactive);
            session.run(stdin.lock())?;
            session
        }
    };

    if session.capture().is_open() {
        warn!("Session ended with a report request still awaiting contact details");
    }

    match session.summary() {
        Some(summary) => info!(
            stakeholders = session.store().len(),
            risks = summary.risks,
            "Session closed"
        ),
        None => info!("Session closed with no stakeholders"),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load {}: {:#}", CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}
