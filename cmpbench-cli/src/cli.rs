//! CLI argument parsing definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Benchmark every configured target and print the report (default)
    Run(RunArgs),

    /// List configured targets
    Targets,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

/// Overrides for a single run; unset flags keep the configured value
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Requests sent to each target
    #[arg(long, value_name = "N")]
    pub requests: Option<usize>,

    /// Concurrent workers per target
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Seed for identity and pagination draws
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Only benchmark the named target (repeatable)
    #[arg(long = "target", value_name = "NAME")]
    pub targets: Vec<String>,

    /// Log every response body at debug level
    #[arg(long)]
    pub log_bodies: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file with the defaults
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}
