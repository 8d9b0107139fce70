//! Project API operations

use crate::config::api;
use crate::error::Result;
use crate::octopus::client::{require_id, resource_path};
use crate::octopus::OctopusClient;

use super::models::Project;

impl OctopusClient {
    /// Get a project by ID
    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        require_id("get_project", "project_id", project_id)?;
        let path = resource_path(api::PROJECTS, project_id);
        self.get_resource(&path).await
    }
}
