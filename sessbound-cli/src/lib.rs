//! sessbound CLI library
//!
//! Command-line drivers for the `sessbound-core` experiments: sampling and
//! evaluating models, removing and restoring session boundaries, and
//! scoring the results.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};

use clap::{ArgAction, Parser};
use commands::{CommandContext, Commands};
use config::CliConfig;
use std::path::PathBuf;

/// Top-level command line
#[derive(Debug, Parser)]
#[command(name = "sessbound", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors and hide progress
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// TOML configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        global = true,
        env = "SESSBOUND_CONFIG"
    )]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Set up logging, load the configuration and run the command
    pub fn execute(self) -> CliResult<()> {
        init_logging(self.verbose, self.quiet);

        let config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };
        log::debug!("configuration: {config:?}");

        let context = CommandContext {
            config,
            quiet: self.quiet,
        };
        self.command.execute(&context)
    }
}

/// Initialize logging based on verbosity level
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}
