//! `octopusdeploy_aws_account` resource

use log::{debug, info};

use crate::config::defaults;
use crate::error::Result;
use crate::octopus::{Account, OctopusClient, SensitiveValue, TenantedDeploymentMode};

use super::attributes::ResourceData;

pub const TYPE_NAME: &str = "octopusdeploy_aws_account";

/// Build the account payload from resource state
pub fn expand_aws_account(data: &ResourceData) -> Result<Account> {
    let attrs = data.reader();

    let mut account = Account::new_aws(
        &attrs.required_string("name")?,
        &attrs.required_string("access_key")?,
        SensitiveValue::new(&attrs.required_string("secret_key")?),
    );
    account.id = data.id().to_string();
    account.description = attrs.string("description")?;
    account.account_type = attrs.string_or("account_type", defaults::AWS_ACCOUNT_TYPE)?;
    account.environment_ids = attrs.string_list("environments")?;
    account.tenant_ids = attrs.string_list("tenants")?;
    account.tenant_tags = attrs.string_list("tenant_tags")?;
    if let Some(mode) = attrs.string("tenanted_deployment_participation")? {
        account.tenanted_deployment_participation = mode.parse::<TenantedDeploymentMode>()?;
    }

    Ok(account)
}

/// Copy server-side account fields into resource state
///
/// `secret_key` is write-only and keeps whatever the state already holds.
pub fn flatten_aws_account(account: &Account, data: &mut ResourceData) {
    data.set("name", account.name.as_str());
    data.set("description", account.description.clone());
    data.set("account_type", account.account_type.as_str());
    data.set("environments", account.environment_ids.clone());
    data.set("tenants", account.tenant_ids.clone());
    data.set("tenant_tags", account.tenant_tags.clone());
    data.set(
        "tenanted_deployment_participation",
        account.tenanted_deployment_participation.to_string(),
    );
    data.set("access_key", account.access_key.clone());
    data.set_id(account.id.as_str());
}

pub async fn create(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    let mut account = expand_aws_account(data)?;
    account.id.clear();
    info!("Creating AWS account '{}'", account.name);

    let created = client.add_account(&account).await?;
    flatten_aws_account(&created, data);
    info!("AWS account created ({})", data.id());
    Ok(())
}

pub async fn read(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    debug!("Reading AWS account {}", data.id());
    match client.get_account(data.id()).await {
        Ok(account) => {
            flatten_aws_account(&account, data);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            info!("AWS account ({}) not found; removing from state", data.id());
            data.clear_id();
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub async fn update(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    let account = expand_aws_account(data)?;
    info!("Updating AWS account ({})", account.id);

    let updated = client.update_account(&account).await?;
    flatten_aws_account(&updated, data);
    Ok(())
}

pub async fn delete(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    info!("Deleting AWS account ({})", data.id());
    match client.delete_account(data.id()).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            info!("AWS account ({}) already gone", data.id());
        }
        Err(e) => return Err(e),
    }
    data.clear_id();
    Ok(())
}
