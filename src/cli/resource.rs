//! Resource command arguments

use clap::Parser;
use std::path::PathBuf;

use crate::provider::{ResourceOp, ResourceType};

/// Arguments for the 'resource' command
#[derive(Parser, Debug)]
pub struct ResourceArgs {
    /// Resource type
    #[arg(value_enum)]
    pub resource_type: ResourceType,

    /// Operation to run
    #[arg(value_enum)]
    pub op: ResourceOp,

    /// State file: {"id": "...", "attributes": {...}}
    ///
    /// The file is rewritten with the resulting state unless --out is given.
    #[arg(short, long)]
    pub file: PathBuf,

    /// Write the resulting state here instead of back to --file
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Skip confirmation prompt on delete
    #[arg(short = 'y', long, default_value_t = false)]
    pub yes: bool,
}
