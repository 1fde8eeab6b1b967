//! # GENAISIS CLI Module
//!
//! This module implements the CLI interface for GENAISIS.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `events` - List the event catalog
//! - `check` - Report what an answer sheet is missing
//! - `register` - Replay an answer sheet and submit it

mod commands;

use crate::config::AppConfig;
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "GENAISIS_CONFIG";

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// GENAISIS - Symposium Registration Desk
///
/// Walks registrants through personal details, event selection and final
/// details, then hands the form to the configured submission sink.
#[derive(Parser, Debug)]
#[command(name = "genaisis")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (falls back to GENAISIS_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the symposium events
    Events,

    /// Report missing fields and unknown events in an answer sheet
    Check {
        /// Answer sheet (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        answers: PathBuf,
    },

    /// Replay an answer sheet through the wizard and submit it
    Register {
        /// Answer sheet (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        answers: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

impl Cli {
    /// The config file to read: `--config`, then `GENAISIS_CONFIG`.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            std::env::var_os(CONFIG_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::load(cli.config_path().as_deref())?;
    let output = Output {
        json: cli.json_mode,
        verbose: cli.verbose,
    };

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(config, host, port).await,
        Some(Commands::Check { answers }) => cmd_check(&config, &answers, output),
        Some(Commands::Register { answers }) => cmd_register(&config, &answers, output).await,
        Some(Commands::Events) | None => cmd_events(&config, output),
    }
}

// =============================================================================
// TESTS
// =============================================================================
