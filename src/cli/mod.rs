//! CLI argument parsing

mod common;
mod get;
mod resource;

use clap::{Parser, Subcommand};

use crate::config::defaults;

pub use common::OutputFormat;
pub use get::{FeedArgs, GetResource, ProcessArgs};
pub use resource::ResourceArgs;

/// Octopus Deploy resource CLI
#[derive(Parser, Debug)]
#[command(name = "octoprov")]
#[command(version)]
#[command(
    about = "Inspect and manage Octopus Deploy resources",
    long_about = "Inspect deployment processes and feeds, and drive declarative \
                  resources (accounts, feeds, tenant variables, deployment processes) \
                  from JSON state files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Octopus server URL (overrides OCTOPUS_URL and credentials file)
    #[arg(short = 's', long, global = true)]
    pub server: Option<String>,

    /// API key (overrides env vars and credentials file)
    #[arg(short = 'k', long = "api-key", global = true)]
    pub api_key: Option<String>,

    /// Space ID (overrides OCTOPUS_SPACE)
    #[arg(long, global = true)]
    pub space: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// Batch mode: no spinners, no interactive prompts
    #[arg(short, long, global = true, default_value_t = false)]
    pub batch: bool,

    /// Omit header row in table and CSV output
    #[arg(long, global = true, default_value_t = false)]
    pub no_header: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get resources
    Get {
        #[command(subcommand)]
        resource: GetResource,
    },

    /// Run a lifecycle operation on a declarative resource
    Resource(ResourceArgs),
}
