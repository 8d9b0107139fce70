//! Deployment process API operations

use log::debug;

use crate::config::api;
use crate::error::Result;
use crate::octopus::client::{require_id, resource_path};
use crate::octopus::traits::PagedResults;
use crate::octopus::OctopusClient;

use super::models::DeploymentProcess;

impl OctopusClient {
    /// Get a deployment process by ID
    ///
    /// A 404 comes back as an API error with status 404; use
    /// `OctopusError::is_not_found` to treat it as absence.
    pub async fn get_deployment_process(&self, process_id: &str) -> Result<DeploymentProcess> {
        require_id("get_deployment_process", "process_id", process_id)?;
        let path = resource_path(api::DEPLOYMENT_PROCESSES, process_id);
        self.get_resource(&path).await
    }

    /// Get all deployment processes, following every `Page.Next` link
    pub async fn get_deployment_processes(&self) -> Result<Vec<DeploymentProcess>> {
        self.fetch_all_pages::<DeploymentProcess, PagedResults<DeploymentProcess>>(
            api::DEPLOYMENT_PROCESSES,
            "deployment processes",
        )
        .await
    }

    /// Replace a deployment process with the given value
    ///
    /// The process is validated locally first. The server enforces `Version`;
    /// no other concurrency check is made here.
    pub async fn update_deployment_process(
        &self,
        process: &DeploymentProcess,
    ) -> Result<DeploymentProcess> {
        require_id("update_deployment_process", "process.id", &process.id)?;
        process.validate()?;

        let path = resource_path(api::DEPLOYMENT_PROCESSES, &process.id);
        debug!(
            "Updating deployment process {} ({} steps, version {:?})",
            process.id,
            process.steps.len(),
            process.version
        );
        self.update_resource(&path, process).await
    }
}
