//! Get command resource definitions and arguments

use clap::{Parser, Subcommand};

use super::common::OutputFormat;

/// Resource types for the 'get' command
#[derive(Subcommand, Debug)]
pub enum GetResource {
    /// Get deployment processes
    #[command(
        visible_alias = "processes",
        visible_alias = "deployment-process",
        visible_alias = "deployment-processes"
    )]
    Process(ProcessArgs),

    /// Get package feeds
    #[command(visible_alias = "feeds")]
    Feed(FeedArgs),
}

/// Arguments for 'get process' subcommand
#[derive(Parser, Debug)]
pub struct ProcessArgs {
    /// Deployment process ID (if specified, shows only that process)
    pub id: Option<String>,

    /// Filter processes by ID or project ID (substring match)
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

/// Arguments for 'get feed' subcommand
#[derive(Parser, Debug)]
pub struct FeedArgs {
    /// Feed ID or name (if specified, shows only that feed)
    pub name: Option<String>,

    /// Filter feeds by name (substring match)
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}
