//! Deployment process command handlers

use log::debug;

use crate::cli::{Cli, Command, GetResource};
use crate::octopus::OctopusClient;
use crate::output::output_processes;
use crate::ui::{create_spinner, finish_spinner};

use super::models::DeploymentProcess;

/// Keep processes whose ID or project ID contains `filter` (case-insensitive)
fn filter_processes(processes: &mut Vec<DeploymentProcess>, filter: &str) {
    let filter_lower = filter.to_lowercase();
    processes.retain(|p| {
        p.id.to_lowercase().contains(&filter_lower)
            || p.project_id.to_lowercase().contains(&filter_lower)
    });
}

/// Run the deployment process list/get command
pub async fn run_process_command(
    client: &OctopusClient,
    cli: &Cli,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let Command::Get {
        resource: GetResource::Process(args),
    } = &cli.command
    else {
        unreachable!()
    };

    if let Some(id) = &args.id {
        let spinner = create_spinner(&format!("Fetching deployment process '{}'...", id), cli.batch);
        let result = client.get_deployment_process(id).await;
        finish_spinner(spinner);

        let process = match result {
            Ok(process) => process,
            Err(e) if e.is_not_found() => {
                return Err(format!("Deployment process '{}' not found", id).into());
            }
            Err(e) => return Err(e.into()),
        };
        output_processes(&[process], args.output, cli.no_header);
        return Ok(());
    }

    let spinner = create_spinner("Fetching deployment processes...", cli.batch);
    let result = client.get_deployment_processes().await;
    finish_spinner(spinner);
    let mut processes = result?;

    if let Some(filter) = &args.filter {
        filter_processes(&mut processes, filter);
        debug!(
            "Filtered to {} deployment processes matching '{}'",
            processes.len(),
            filter
        );
    }

    // Structured formats still print an empty list
    if processes.is_empty() && !args.output.is_structured() {
        eprintln!("No deployment processes found");
        return Ok(());
    }

    output_processes(&processes, args.output, cli.no_header);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(id: &str, project_id: &str) -> DeploymentProcess {
        DeploymentProcess {
            id: id.to_string(),
            project_id: project_id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_processes_by_id_or_project() {
        let mut processes = vec![
            process("deploymentprocess-Projects-1", "Projects-1"),
            process("deploymentprocess-Projects-22", "Projects-22"),
            process("custom", "Projects-3"),
        ];

        filter_processes(&mut processes, "PROJECTS-2");
        assert_eq!(processes.len(), 1);
        assert_eq!(processes[0].project_id, "Projects-22");
    }

    #[test]
    fn test_filter_processes_no_match() {
        let mut processes = vec![process("deploymentprocess-Projects-1", "Projects-1")];
        filter_processes(&mut processes, "nothing");
        assert!(processes.is_empty());
    }
}
