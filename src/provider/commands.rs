//! Resource command handler

use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::cli::{Cli, Command};
use crate::error::{OctopusError, Result};
use crate::octopus::OctopusClient;
use crate::output::print_json;
use crate::ui::{confirm_delete, create_spinner, finish_spinner, finish_spinner_with_message};

use super::{apply, ResourceData, ResourceOp};

/// Load a state document; a missing or empty file is an empty state
pub fn read_state(path: &Path) -> Result<ResourceData> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("State file {} does not exist; starting empty", path.display());
            return Ok(ResourceData::default());
        }
        Err(e) => {
            return Err(OctopusError::Config(format!(
                "Could not read state file {}: {}",
                path.display(),
                e
            )))
        }
    };

    if content.trim().is_empty() {
        return Ok(ResourceData::default());
    }

    serde_json::from_str(&content).map_err(|e| {
        OctopusError::Config(format!("Could not parse state file {}: {}", path.display(), e))
    })
}

pub fn write_state(path: &Path, data: &ResourceData) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json + "\n").map_err(|e| {
        OctopusError::Config(format!("Could not write state file {}: {}", path.display(), e))
    })
}

/// Run a lifecycle operation on the state file given on the command line
pub async fn run_resource_command(
    client: &OctopusClient,
    cli: &Cli,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let Command::Resource(args) = &cli.command else {
        unreachable!()
    };

    let mut data = read_state(&args.file)?;

    match args.op {
        ResourceOp::Create if data.exists() => {
            return Err(format!(
                "State already has ID '{}'; use update instead of create",
                data.id()
            )
            .into());
        }
        ResourceOp::Read | ResourceOp::Update | ResourceOp::Delete | ResourceOp::Import
            if !data.exists() =>
        {
            return Err(format!("State file {} has no resource ID", args.file.display()).into());
        }
        ResourceOp::Delete => {
            if !confirm_delete(args.resource_type.type_name(), data.id(), args.yes, cli.batch) {
                eprintln!("Delete cancelled");
                return Ok(());
            }
        }
        _ => {}
    }

    let spinner = create_spinner(
        &format!("Running {} on {}...", args.op, args.resource_type),
        cli.batch,
    );
    match apply(client, args.resource_type, args.op, &mut data).await {
        Ok(()) => finish_spinner_with_message(
            spinner,
            &format!("{} {}: done", args.op, args.resource_type),
        ),
        Err(e) => {
            finish_spinner(spinner);
            return Err(e.into());
        }
    }

    let out = args.out.as_deref().unwrap_or(args.file.as_path());
    write_state(out, &data)?;
    info!("Wrote state to {}", out.display());

    if data.exists() {
        print_json(&data);
    } else {
        eprintln!("{} no longer exists; state cleared", args.resource_type);
    }
    Ok(())
}
