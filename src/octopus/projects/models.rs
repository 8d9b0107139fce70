//! Project data models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::octopus::traits::OctopusResource;

/// Project data from the Octopus API
///
/// Only the fields needed to reach a project's deployment process are kept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deployment_process_id: String,
    #[serde(default)]
    pub project_group_id: Option<String>,
    #[serde(default)]
    pub lifecycle_id: Option<String>,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub links: HashMap<String, String>,
}

impl OctopusResource for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
