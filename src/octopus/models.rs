//! Value types shared by several Octopus resources

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{OctopusError, Result};

/// Write-only secret as the Octopus API models it
///
/// The server never returns the secret; it only reports whether one is set.
/// `new_value` is sent to set or replace it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SensitiveValue {
    #[serde(default)]
    pub has_value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

impl SensitiveValue {
    pub fn new(value: &str) -> Self {
        Self {
            has_value: true,
            new_value: Some(value.to_string()),
        }
    }
}

/// Variable value: either plain text or a sensitive value
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum PropertyValue {
    Plain(String),
    Sensitive(SensitiveValue),
}

impl PropertyValue {
    pub fn new(value: &str, sensitive: bool) -> Self {
        if sensitive {
            PropertyValue::Sensitive(SensitiveValue::new(value))
        } else {
            PropertyValue::Plain(value.to_string())
        }
    }

    /// Plain text of the value; sensitive values have none to give back
    pub fn value(&self) -> Option<&str> {
        match self {
            PropertyValue::Plain(v) => Some(v),
            PropertyValue::Sensitive(_) => None,
        }
    }

    pub fn is_sensitive(&self) -> bool {
        matches!(self, PropertyValue::Sensitive(_))
    }
}

/// How a resource takes part in tenanted deployments
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TenantedDeploymentMode {
    #[default]
    Untenanted,
    TenantedOrUntenanted,
    Tenanted,
}

impl fmt::Display for TenantedDeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantedDeploymentMode::Untenanted => write!(f, "Untenanted"),
            TenantedDeploymentMode::TenantedOrUntenanted => write!(f, "TenantedOrUntenanted"),
            TenantedDeploymentMode::Tenanted => write!(f, "Tenanted"),
        }
    }
}

impl std::str::FromStr for TenantedDeploymentMode {
    type Err = OctopusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Untenanted" => Ok(TenantedDeploymentMode::Untenanted),
            "TenantedOrUntenanted" => Ok(TenantedDeploymentMode::TenantedOrUntenanted),
            "Tenanted" => Ok(TenantedDeploymentMode::Tenanted),
            other => Err(OctopusError::Validation(format!(
                "unknown tenanted deployment mode '{}'",
                other
            ))),
        }
    }
}
