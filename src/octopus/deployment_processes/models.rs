//! Deployment process data models

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{OctopusError, Result};

/// Step property holding the expression evaluated by a `Variable` condition
pub const CONDITION_EXPRESSION_PROPERTY: &str = "Octopus.Action.ConditionVariableExpression";

/// Deployment process attached to a project
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentProcess {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(default)]
    pub steps: Vec<DeploymentStep>,
    #[serde(default)]
    pub version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_snapshot_id: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
    /// Server fields not modelled here (`SpaceId`, ...), sent back unchanged
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// When a step runs relative to the outcome of previous steps
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCondition {
    Success,
    Failure,
    Always,
    Variable,
}

/// Whether a step waits for the previous one
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTrigger {
    StartAfterPrevious,
    StartWithPrevious,
}

/// One step of a deployment process, executed in list order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentStep {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package_requirement: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<StepCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_trigger: Option<StartTrigger>,
    #[serde(default)]
    pub actions: Vec<DeploymentAction>,
}

/// One action inside a step, executed in list order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentAction {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub action_type: String,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub can_be_used_for_project_versioning: bool,
    #[serde(default)]
    pub environments: Vec<String>,
    #[serde(default)]
    pub excluded_environments: Vec<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub tenant_tags: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub packages: Vec<PackageReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_pool_variable: Option<String>,
    #[serde(default)]
    pub last_modified_on: Option<String>,
    #[serde(default)]
    pub last_modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

/// Package consumed by an action; an empty name marks the primary package
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PackageReference {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "PackageId")]
    pub package_id: String,
    #[serde(rename = "FeedId")]
    pub feed_id: String,
    #[serde(default)]
    pub acquisition_location: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl PackageReference {
    pub fn is_primary(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for StepCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepCondition::Success => write!(f, "Success"),
            StepCondition::Failure => write!(f, "Failure"),
            StepCondition::Always => write!(f, "Always"),
            StepCondition::Variable => write!(f, "Variable"),
        }
    }
}

impl std::str::FromStr for StepCondition {
    type Err = OctopusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Success" => Ok(StepCondition::Success),
            "Failure" => Ok(StepCondition::Failure),
            "Always" => Ok(StepCondition::Always),
            "Variable" => Ok(StepCondition::Variable),
            other => Err(OctopusError::Validation(format!(
                "unknown step condition '{}' (expected Success, Failure, Always or Variable)",
                other
            ))),
        }
    }
}

impl fmt::Display for StartTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartTrigger::StartAfterPrevious => write!(f, "StartAfterPrevious"),
            StartTrigger::StartWithPrevious => write!(f, "StartWithPrevious"),
        }
    }
}

impl std::str::FromStr for StartTrigger {
    type Err = OctopusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "StartAfterPrevious" => Ok(StartTrigger::StartAfterPrevious),
            "StartWithPrevious" => Ok(StartTrigger::StartWithPrevious),
            other => Err(OctopusError::Validation(format!(
                "unknown start trigger '{}' (expected StartAfterPrevious or StartWithPrevious)",
                other
            ))),
        }
    }
}

impl DeploymentProcess {
    /// Number of actions across all steps
    pub fn action_count(&self) -> usize {
        self.steps.iter().map(|s| s.actions.len()).sum()
    }

    /// Check the constraints the server would reject before sending anything
    pub fn validate(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            step.validate()
                .map_err(|e| OctopusError::Validation(format!("step {}: {}", index + 1, e)))?;
        }
        Ok(())
    }
}

impl DeploymentStep {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }

        if self.condition == Some(StepCondition::Variable)
            && self
                .properties
                .get(CONDITION_EXPRESSION_PROPERTY)
                .map_or(true, |v| v.trim().is_empty())
        {
            return Err(format!(
                "'{}': condition Variable requires the {} property",
                self.name, CONDITION_EXPRESSION_PROPERTY
            ));
        }

        for action in &self.actions {
            if action.name.trim().is_empty() {
                return Err(format!("'{}': action name must not be empty", self.name));
            }
            if action.action_type.trim().is_empty() {
                return Err(format!(
                    "'{}': action '{}' has no action type",
                    self.name, action.name
                ));
            }
            if action.packages.iter().filter(|p| p.is_primary()).count() > 1 {
                return Err(format!(
                    "'{}': action '{}' has more than one primary package",
                    self.name, action.name
                ));
            }
        }

        Ok(())
    }
}
