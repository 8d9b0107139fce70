//! `octopusdeploy_deployment_process` resource
//!
//! A project owns exactly one deployment process. Creating the resource
//! replaces the steps of that existing process; deleting it leaves the
//! process in place with no steps.

use log::{debug, info};
use std::collections::BTreeMap;

use crate::config::defaults;
use crate::error::{OctopusError, Result};
use crate::octopus::deployment_processes::CONDITION_EXPRESSION_PROPERTY;
use crate::octopus::{
    DeploymentAction, DeploymentProcess, DeploymentStep, OctopusClient, PackageReference,
    StartTrigger, StepCondition,
};

use super::attributes::{AttributeReader, AttributeValue, Attributes, ResourceData};

pub const TYPE_NAME: &str = "octopusdeploy_deployment_process";

/// Action type of the "Run a kubectl CLI script" step template
pub const KUBECTL_ACTION_TYPE: &str = "Octopus.KubernetesRunScript";

const TARGET_ROLES_PROPERTY: &str = "Octopus.Action.TargetRoles";
const MAX_PARALLELISM_PROPERTY: &str = "Octopus.Action.MaxParallelism";
const SCRIPT_BODY_PROPERTY: &str = "Octopus.Action.Script.ScriptBody";
const SCRIPT_SYNTAX_PROPERTY: &str = "Octopus.Action.Script.Syntax";
const SCRIPT_SOURCE_PROPERTY: &str = "Octopus.Action.Script.ScriptSource";
const SCRIPT_FILE_NAME_PROPERTY: &str = "Octopus.Action.Script.ScriptFileName";
const SCRIPT_PARAMETERS_PROPERTY: &str = "Octopus.Action.Script.ScriptParameters";
const RUN_ON_SERVER_PROPERTY: &str = "Octopus.Action.RunOnServer";
const SUBSTITUTE_FILES_PROPERTY: &str = "Octopus.Action.SubstituteInPackagedFiles.TargetFiles";
const ENABLED_FEATURES_PROPERTY: &str = "Octopus.Action.EnabledFeatures";
const SUBSTITUTE_FEATURE: &str = "Octopus.Features.SubstituteInFiles";
const EXTRACT_PROPERTY: &str = "Extract";

const DEFAULT_PACKAGE_REQUIREMENT: &str = "LetOctopusDecide";
const DEFAULT_SCRIPT_SYNTAX: &str = "PowerShell";
const SCRIPT_SOURCE_INLINE: &str = "Inline";
const SCRIPT_SOURCE_PACKAGE: &str = "Package";

fn put(attrs: &mut Attributes, key: &str, value: impl Into<AttributeValue>) {
    attrs.insert(key.to_string(), value.into());
}

/// Build the process payload from resource state; steps and actions keep
/// the order they have in state
pub fn expand_deployment_process(data: &ResourceData) -> Result<DeploymentProcess> {
    let attrs = data.reader();
    let steps = attrs
        .blocks("step")?
        .iter()
        .map(expand_step)
        .collect::<Result<Vec<_>>>()?;

    Ok(DeploymentProcess {
        id: data.id().to_string(),
        project_id: attrs.required_string("project_id")?,
        steps,
        ..Default::default()
    })
}

fn expand_step(attrs: &AttributeReader<'_>) -> Result<DeploymentStep> {
    let mut properties = attrs.string_map("properties")?;

    if let Some(expression) = attrs.string("condition_expression")? {
        properties.insert(CONDITION_EXPRESSION_PROPERTY.to_string(), expression);
    }
    if let Some(window_size) = attrs.string("window_size")? {
        properties.insert(MAX_PARALLELISM_PROPERTY.to_string(), window_size);
    }
    let target_roles = attrs.string_list("target_roles")?;
    if !target_roles.is_empty() {
        properties.insert(TARGET_ROLES_PROPERTY.to_string(), target_roles.join(","));
    }

    let condition = match attrs.string("condition")? {
        Some(c) => c.parse::<StepCondition>()?,
        None => StepCondition::Success,
    };
    let start_trigger = match attrs.string("start_trigger")? {
        Some(t) => t.parse::<StartTrigger>()?,
        None => StartTrigger::StartAfterPrevious,
    };

    let actions = attrs
        .blocks("action")?
        .iter()
        .map(expand_action)
        .collect::<Result<Vec<_>>>()?;

    Ok(DeploymentStep {
        name: attrs.required_string("name")?,
        package_requirement: attrs.string_or("package_requirement", DEFAULT_PACKAGE_REQUIREMENT)?,
        properties,
        condition: Some(condition),
        start_trigger: Some(start_trigger),
        actions,
        ..Default::default()
    })
}

fn expand_action(attrs: &AttributeReader<'_>) -> Result<DeploymentAction> {
    let action_type = attrs.required_string("action_type")?;
    let mut properties = attrs.string_map("properties")?;

    if action_type == KUBECTL_ACTION_TYPE {
        expand_kubectl_properties(attrs, &mut properties)?;
    }

    let mut packages = Vec::new();
    if let Some(primary) = attrs.single_block("primary_package")? {
        packages.push(expand_package(&primary, String::new())?);
    }
    for package in attrs.blocks("package")? {
        let name = package.required_string("name")?;
        let mut reference = expand_package(&package, name)?;
        reference.properties.insert(
            EXTRACT_PROPERTY.to_string(),
            package.string_or("extract_during_deployment", "true")?,
        );
        packages.push(reference);
    }

    Ok(DeploymentAction {
        name: attrs.required_string("name")?,
        action_type,
        is_disabled: attrs.bool("disabled")?.unwrap_or(false),
        environments: attrs.string_list("environments")?,
        excluded_environments: attrs.string_list("excluded_environments")?,
        channels: attrs.string_list("channels")?,
        tenant_tags: attrs.string_list("tenant_tags")?,
        properties,
        packages,
        worker_pool_id: attrs.string("worker_pool_id")?,
        worker_pool_variable: attrs.string("worker_pool_variable")?,
        ..Default::default()
    })
}

/// Overlay the kubectl attributes on the raw `properties` map
fn expand_kubectl_properties(
    attrs: &AttributeReader<'_>,
    properties: &mut BTreeMap<String, String>,
) -> Result<()> {
    if let Some(run_on_server) = attrs.bool("run_on_server")? {
        properties.insert(RUN_ON_SERVER_PROPERTY.to_string(), run_on_server.to_string());
    }

    let script_body = attrs.string("script_body")?;
    let script_file_name = attrs.string("script_file_name")?;
    let inline = script_body.is_some();
    match (script_body, script_file_name) {
        (Some(_), Some(_)) => {
            return Err(OctopusError::attribute(
                &attrs.key("script_file_name"),
                "cannot be combined with script_body",
            ))
        }
        (Some(body), None) => {
            properties.insert(SCRIPT_SOURCE_PROPERTY.to_string(), SCRIPT_SOURCE_INLINE.to_string());
            properties.insert(SCRIPT_BODY_PROPERTY.to_string(), body);
        }
        (None, Some(file_name)) => {
            properties.insert(SCRIPT_SOURCE_PROPERTY.to_string(), SCRIPT_SOURCE_PACKAGE.to_string());
            properties.insert(SCRIPT_FILE_NAME_PROPERTY.to_string(), file_name);
        }
        (None, None) => {}
    }
    if let Some(parameters) = attrs.string("script_parameters")? {
        properties.insert(SCRIPT_PARAMETERS_PROPERTY.to_string(), parameters);
    }

    match attrs.string("script_syntax")? {
        Some(syntax) => {
            properties.insert(SCRIPT_SYNTAX_PROPERTY.to_string(), syntax);
        }
        None if inline => {
            properties
                .entry(SCRIPT_SYNTAX_PROPERTY.to_string())
                .or_insert_with(|| DEFAULT_SCRIPT_SYNTAX.to_string());
        }
        None => {}
    }

    if let Some(files) = attrs.string("variable_substitution_in_files")? {
        properties.insert(SUBSTITUTE_FILES_PROPERTY.to_string(), files);
        let features = properties
            .entry(ENABLED_FEATURES_PROPERTY.to_string())
            .or_default();
        if !has_feature(features, SUBSTITUTE_FEATURE) {
            if !features.is_empty() {
                features.push(',');
            }
            features.push_str(SUBSTITUTE_FEATURE);
        }
    }
    Ok(())
}

fn has_feature(features: &str, feature: &str) -> bool {
    features.split(',').any(|f| f.trim() == feature)
}

fn expand_package(attrs: &AttributeReader<'_>, name: String) -> Result<PackageReference> {
    Ok(PackageReference {
        name,
        package_id: attrs.required_string("package_id")?,
        feed_id: attrs.string_or("feed_id", defaults::PACKAGE_FEED_ID)?,
        acquisition_location: attrs
            .string_or("acquisition_location", defaults::PACKAGE_ACQUISITION_LOCATION)?,
        properties: attrs.string_map("properties")?,
        ..Default::default()
    })
}

/// Copy a process into resource state, turning well-known properties back
/// into their own attributes
pub fn flatten_deployment_process(process: &DeploymentProcess, data: &mut ResourceData) {
    data.set("project_id", process.project_id.as_str());
    data.set(
        "step",
        process.steps.iter().map(flatten_step).collect::<Vec<_>>(),
    );
    data.set_id(process.id.as_str());
}

fn flatten_step(step: &DeploymentStep) -> Attributes {
    let mut properties = step.properties.clone();
    let condition_expression = properties.remove(CONDITION_EXPRESSION_PROPERTY);
    let window_size = properties.remove(MAX_PARALLELISM_PROPERTY);
    let target_roles: Vec<String> = properties
        .remove(TARGET_ROLES_PROPERTY)
        .map(|roles| {
            roles
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let mut attrs = Attributes::new();
    put(&mut attrs, "name", step.name.as_str());
    put(&mut attrs, "condition", step.condition.map(|c| c.to_string()));
    put(&mut attrs, "condition_expression", condition_expression);
    put(&mut attrs, "start_trigger", step.start_trigger.map(|t| t.to_string()));
    put(&mut attrs, "package_requirement", step.package_requirement.as_str());
    put(&mut attrs, "window_size", window_size);
    put(&mut attrs, "target_roles", target_roles);
    put(&mut attrs, "properties", properties);
    put(
        &mut attrs,
        "action",
        step.actions.iter().map(flatten_action).collect::<Vec<_>>(),
    );
    attrs
}

fn flatten_action(action: &DeploymentAction) -> Attributes {
    let mut attrs = Attributes::new();
    let mut properties = action.properties.clone();

    if action.action_type == KUBECTL_ACTION_TYPE {
        flatten_kubectl_properties(&mut properties, &mut attrs);
    }
    put(&mut attrs, "worker_pool_id", action.worker_pool_id.clone());
    put(&mut attrs, "worker_pool_variable", action.worker_pool_variable.clone());

    let mut primary = Vec::new();
    let mut others = Vec::new();
    for package in &action.packages {
        let mut package_properties = package.properties.clone();
        let mut block = Attributes::new();
        put(&mut block, "package_id", package.package_id.as_str());
        put(&mut block, "feed_id", package.feed_id.as_str());
        put(&mut block, "acquisition_location", package.acquisition_location.as_str());
        if package.is_primary() {
            put(&mut block, "properties", package_properties);
            primary.push(block);
        } else {
            put(&mut block, "name", package.name.as_str());
            put(
                &mut block,
                "extract_during_deployment",
                package_properties.remove(EXTRACT_PROPERTY),
            );
            put(&mut block, "properties", package_properties);
            others.push(block);
        }
    }

    put(&mut attrs, "name", action.name.as_str());
    put(&mut attrs, "action_type", action.action_type.as_str());
    put(&mut attrs, "disabled", action.is_disabled);
    put(&mut attrs, "environments", action.environments.clone());
    put(&mut attrs, "excluded_environments", action.excluded_environments.clone());
    put(&mut attrs, "channels", action.channels.clone());
    put(&mut attrs, "tenant_tags", action.tenant_tags.clone());
    put(&mut attrs, "properties", properties);
    put(&mut attrs, "primary_package", primary);
    put(&mut attrs, "package", others);
    attrs
}

/// Lift kubectl properties into their own attributes
///
/// A property is only lifted when expanding the attribute writes it back
/// unchanged; anything else stays in `properties`.
fn flatten_kubectl_properties(properties: &mut BTreeMap<String, String>, attrs: &mut Attributes) {
    let present = |properties: &BTreeMap<String, String>, key: &str| {
        properties.get(key).is_some_and(|v| !v.is_empty())
    };

    if let Some(run_on_server) = properties
        .get(RUN_ON_SERVER_PROPERTY)
        .and_then(|v| v.parse::<bool>().ok())
    {
        properties.remove(RUN_ON_SERVER_PROPERTY);
        put(attrs, "run_on_server", run_on_server);
    }

    let has_body = present(properties, SCRIPT_BODY_PROPERTY);
    let has_file_name = present(properties, SCRIPT_FILE_NAME_PROPERTY);
    let has_syntax = present(properties, SCRIPT_SYNTAX_PROPERTY);
    let source = properties.get(SCRIPT_SOURCE_PROPERTY).cloned();
    match source.as_deref() {
        Some(SCRIPT_SOURCE_INLINE) if has_body && !has_file_name && has_syntax => {
            properties.remove(SCRIPT_SOURCE_PROPERTY);
            put(attrs, "script_body", properties.remove(SCRIPT_BODY_PROPERTY));
        }
        Some(SCRIPT_SOURCE_PACKAGE) if has_file_name && !has_body => {
            properties.remove(SCRIPT_SOURCE_PROPERTY);
            put(attrs, "script_file_name", properties.remove(SCRIPT_FILE_NAME_PROPERTY));
        }
        _ => {}
    }
    if has_syntax {
        put(attrs, "script_syntax", properties.remove(SCRIPT_SYNTAX_PROPERTY));
    }
    if present(properties, SCRIPT_PARAMETERS_PROPERTY) {
        put(attrs, "script_parameters", properties.remove(SCRIPT_PARAMETERS_PROPERTY));
    }

    let substitutes = properties
        .get(ENABLED_FEATURES_PROPERTY)
        .is_some_and(|features| has_feature(features, SUBSTITUTE_FEATURE));
    if substitutes && present(properties, SUBSTITUTE_FILES_PROPERTY) {
        put(
            attrs,
            "variable_substitution_in_files",
            properties.remove(SUBSTITUTE_FILES_PROPERTY),
        );
        if properties.get(ENABLED_FEATURES_PROPERTY).map(String::as_str) == Some(SUBSTITUTE_FEATURE)
        {
            properties.remove(ENABLED_FEATURES_PROPERTY);
        }
    }
}

/// The process that belongs to `project_id`, as currently stored
async fn locate_process(client: &OctopusClient, project_id: &str) -> Result<DeploymentProcess> {
    let project = client.get_project(project_id).await?;
    if project.deployment_process_id.is_empty() {
        return Err(OctopusError::Validation(format!(
            "project {} has no deployment process",
            project.id
        )));
    }
    debug!(
        "Project {} uses deployment process {}",
        project.id, project.deployment_process_id
    );
    client
        .get_deployment_process(&project.deployment_process_id)
        .await
}

/// Replace the stored steps with those in state, keeping `Id` and `Version`
async fn replace_steps(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    let desired = expand_deployment_process(data)?;
    let mut current = locate_process(client, &desired.project_id).await?;
    current.steps = desired.steps;

    let updated = client.update_deployment_process(&current).await?;
    flatten_deployment_process(&updated, data);
    Ok(())
}

pub async fn create(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    info!("Creating deployment process");
    replace_steps(client, data).await?;
    info!("Deployment process created ({})", data.id());
    Ok(())
}

pub async fn read(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    match client.get_deployment_process(data.id()).await {
        Ok(process) => {
            flatten_deployment_process(&process, data);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            info!("Deployment process ({}) not found; removing from state", data.id());
            data.clear_id();
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub async fn update(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    info!("Updating deployment process ({})", data.id());
    replace_steps(client, data).await
}

pub async fn delete(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    info!("Deleting deployment process ({})", data.id());
    let project_id = data.reader().required_string("project_id")?;

    let mut current = match locate_process(client, &project_id).await {
        Ok(process) => process,
        Err(e) if e.is_not_found() => {
            data.clear_id();
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    current.steps.clear();
    client.update_deployment_process(&current).await?;
    data.clear_id();
    Ok(())
}
