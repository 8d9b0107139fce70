//! `octopusdeploy_tenant_common_variable` resource
//!
//! A common variable lives inside its tenant's variables document, so every
//! change is a read-modify-write of that document.

use log::{debug, info};

use crate::error::{OctopusError, Result};
use crate::octopus::{OctopusClient, PropertyValue};

use super::attributes::ResourceData;

pub const TYPE_NAME: &str = "octopusdeploy_tenant_common_variable";

/// Address of one common variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantCommonVariable {
    pub tenant_id: String,
    pub library_variable_set_id: String,
    pub variable_id: String,
    pub value: String,
}

impl TenantCommonVariable {
    /// Resource ID: `TenantID:LibraryVariableSetID:VariableID`
    pub fn resource_id(&self) -> String {
        format!(
            "{}:{}:{}",
            self.tenant_id, self.library_variable_set_id, self.variable_id
        )
    }
}

pub fn expand_tenant_common_variable(data: &ResourceData) -> Result<TenantCommonVariable> {
    let attrs = data.reader();
    Ok(TenantCommonVariable {
        tenant_id: attrs.required_string("tenant_id")?,
        library_variable_set_id: attrs.required_string("library_variable_set_id")?,
        variable_id: attrs.required_string("variable_id")?,
        value: attrs.required_string("value")?,
    })
}

pub fn flatten_tenant_common_variable(variable: &TenantCommonVariable, data: &mut ResourceData) {
    data.set("tenant_id", variable.tenant_id.as_str());
    data.set(
        "library_variable_set_id",
        variable.library_variable_set_id.as_str(),
    );
    data.set("variable_id", variable.variable_id.as_str());
    data.set("value", variable.value.as_str());
    data.set_id(variable.resource_id());
}

/// Fill the address attributes from an existing resource ID
pub fn import(data: &mut ResourceData) -> Result<()> {
    let parts: Vec<&str> = data.id().split(':').collect();
    let [tenant_id, set_id, variable_id] = parts.as_slice() else {
        return Err(OctopusError::Validation(format!(
            "{} import must be in the form of TenantID:LibraryVariableSetID:VariableID, got '{}'",
            TYPE_NAME,
            data.id()
        )));
    };
    if tenant_id.is_empty() || set_id.is_empty() || variable_id.is_empty() {
        return Err(OctopusError::invalid_parameter("import", "id"));
    }

    let (tenant_id, set_id, variable_id) =
        (tenant_id.to_string(), set_id.to_string(), variable_id.to_string());
    data.set("tenant_id", tenant_id);
    data.set("library_variable_set_id", set_id);
    data.set("variable_id", variable_id);
    Ok(())
}

/// Shared by create and update: both set the value and write the document back
async fn write(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    let variable = expand_tenant_common_variable(data)?;

    let tenant = client.get_tenant(&variable.tenant_id).await?;
    let mut variables = client.get_tenant_variables(&tenant).await?;

    if !variables.set_library_variable(
        &variable.library_variable_set_id,
        &variable.variable_id,
        PropertyValue::new(&variable.value, false),
    ) {
        data.clear_id();
        return Err(OctopusError::Validation(format!(
            "library variable set {} is not connected to tenant {}",
            variable.library_variable_set_id, variable.tenant_id
        )));
    }

    client.update_tenant_variables(&tenant, &variables).await?;
    flatten_tenant_common_variable(&variable, data);
    Ok(())
}

pub async fn create(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    info!("Creating tenant common variable");
    write(client, data).await?;
    info!("Tenant common variable created ({})", data.id());
    Ok(())
}

pub async fn update(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    info!("Updating tenant common variable ({})", data.id());
    write(client, data).await
}

pub async fn read(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    let attrs = data.reader();
    let tenant_id = attrs.required_string("tenant_id")?;
    let set_id = attrs.required_string("library_variable_set_id")?;
    let variable_id = attrs.required_string("variable_id")?;

    let tenant = match client.get_tenant(&tenant_id).await {
        Ok(tenant) => tenant,
        Err(e) if e.is_not_found() => {
            info!("Tenant ({}) not found; removing common variable from state", tenant_id);
            data.clear_id();
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let variables = client.get_tenant_variables(&tenant).await?;
    let Some(value) = variables.library_variable(&set_id, &variable_id) else {
        info!("Tenant common variable ({}) not found; removing from state", data.id());
        data.clear_id();
        return Ok(());
    };

    // Sensitive values never come back; keep the one in state
    let value = match value.value() {
        Some(v) => v.to_string(),
        None => {
            debug!("Variable {} is sensitive; keeping state value", variable_id);
            data.reader().string("value")?.unwrap_or_default()
        }
    };

    flatten_tenant_common_variable(
        &TenantCommonVariable {
            tenant_id,
            library_variable_set_id: set_id,
            variable_id,
            value,
        },
        data,
    );
    Ok(())
}

pub async fn delete(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    let attrs = data.reader();
    let tenant_id = attrs.required_string("tenant_id")?;
    let set_id = attrs.required_string("library_variable_set_id")?;
    let variable_id = attrs.required_string("variable_id")?;
    info!("Deleting tenant common variable ({})", data.id());

    let tenant = match client.get_tenant(&tenant_id).await {
        Ok(tenant) => tenant,
        Err(e) if e.is_not_found() => {
            info!("Tenant ({}) not found; removing common variable from state", tenant_id);
            data.clear_id();
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut variables = client.get_tenant_variables(&tenant).await?;
    if variables.remove_library_variable(&set_id, &variable_id) {
        client.update_tenant_variables(&tenant, &variables).await?;
    } else {
        debug!("Tenant common variable already absent");
    }

    data.clear_id();
    Ok(())
}
