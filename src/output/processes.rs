//! Deployment process output formatter

use comfy_table::{presets::NOTHING, Table};
use serde::Serialize;

use super::common::{escape_csv, format_timestamp, print_json, print_yaml};
use crate::cli::OutputFormat;
use crate::octopus::DeploymentProcess;

/// One row per process in table and CSV output
#[derive(Serialize, Debug, PartialEq)]
struct ProcessRow {
    id: String,
    project_id: String,
    steps: usize,
    actions: usize,
    version: String,
    last_modified: String,
}

impl From<&DeploymentProcess> for ProcessRow {
    fn from(process: &DeploymentProcess) -> Self {
        Self {
            id: process.id.clone(),
            project_id: process.project_id.clone(),
            steps: process.steps.len(),
            actions: process.action_count(),
            version: process.version.map(|v| v.to_string()).unwrap_or_default(),
            last_modified: format_timestamp(process.last_modified_on.as_deref()),
        }
    }
}

/// Output deployment processes in the specified format
///
/// JSON and YAML print the full process documents, steps included.
pub fn output_processes(processes: &[DeploymentProcess], format: OutputFormat, no_header: bool) {
    match format {
        OutputFormat::Table => output_table(processes, no_header),
        OutputFormat::Csv => output_csv(processes, no_header),
        OutputFormat::Json => print_json(processes),
        OutputFormat::Yaml => print_yaml(processes),
    }
}

fn output_table(processes: &[DeploymentProcess], no_header: bool) {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    if !no_header {
        table.set_header(vec![
            "ID",
            "PROJECT",
            "STEPS",
            "ACTIONS",
            "VERSION",
            "LAST MODIFIED",
        ]);
    }

    for row in processes.iter().map(ProcessRow::from) {
        table.add_row(vec![
            row.id,
            row.project_id,
            row.steps.to_string(),
            row.actions.to_string(),
            row.version,
            row.last_modified,
        ]);
    }

    println!("{table}");
}

fn output_csv(processes: &[DeploymentProcess], no_header: bool) {
    if !no_header {
        println!("ID,PROJECT,STEPS,ACTIONS,VERSION,LAST_MODIFIED");
    }
    for row in processes.iter().map(ProcessRow::from) {
        println!(
            "{},{},{},{},{},{}",
            escape_csv(&row.id),
            escape_csv(&row.project_id),
            row.steps,
            row.actions,
            row.version,
            escape_csv(&row.last_modified)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process() -> DeploymentProcess {
        serde_json::from_value(serde_json::json!({
            "Id": "deploymentprocess-Projects-1",
            "ProjectId": "Projects-1",
            "Version": 12,
            "LastModifiedOn": "2024-05-06T07:08:09.000+00:00",
            "Steps": [
                {"Name": "a", "Actions": [{"Name": "x", "ActionType": "Octopus.Script"}]},
                {"Name": "b", "Actions": [
                    {"Name": "y", "ActionType": "Octopus.Script"},
                    {"Name": "z", "ActionType": "Octopus.Script"}
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_process_row() {
        let row = ProcessRow::from(&process());
        assert_eq!(
            row,
            ProcessRow {
                id: "deploymentprocess-Projects-1".to_string(),
                project_id: "Projects-1".to_string(),
                steps: 2,
                actions: 3,
                version: "12".to_string(),
                last_modified: "2024-05-06 07:08".to_string(),
            }
        );
    }

    #[test]
    fn test_process_yaml_keeps_api_field_names() {
        let yaml = serde_yml::to_string(&[process()]).unwrap();
        assert!(yaml.contains("ProjectId: Projects-1"));
        assert!(yaml.contains("Version: 12"));
    }
}
