//! Account data models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::defaults;
use crate::octopus::models::{SensitiveValue, TenantedDeploymentMode};
use crate::octopus::traits::OctopusResource;

/// Account data from the Octopus API
///
/// Covers the AWS account shape; other account types share the common fields.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub account_type: String,
    #[serde(default)]
    pub environment_ids: Vec<String>,
    #[serde(default)]
    pub tenant_ids: Vec<String>,
    #[serde(default)]
    pub tenant_tags: Vec<String>,
    #[serde(default)]
    pub tenanted_deployment_participation: TenantedDeploymentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<SensitiveValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

impl Account {
    /// New AWS account with the given key pair
    pub fn new_aws(name: &str, access_key: &str, secret_key: SensitiveValue) -> Self {
        Self {
            name: name.to_string(),
            account_type: defaults::AWS_ACCOUNT_TYPE.to_string(),
            access_key: Some(access_key.to_string()),
            secret_key: Some(secret_key),
            ..Default::default()
        }
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

impl OctopusResource for Account {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
