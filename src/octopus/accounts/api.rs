//! Account API operations

use log::debug;

use crate::config::api;
use crate::error::{OctopusError, Result};
use crate::octopus::client::{require_id, resource_path};
use crate::octopus::OctopusClient;

use super::models::Account;

impl OctopusClient {
    /// Get an account by ID
    pub async fn get_account(&self, account_id: &str) -> Result<Account> {
        require_id("get_account", "account_id", account_id)?;
        let path = resource_path(api::ACCOUNTS, account_id);
        self.get_resource(&path).await
    }

    /// Create an account; the server assigns the ID
    pub async fn add_account(&self, account: &Account) -> Result<Account> {
        if !account.id.is_empty() {
            return Err(OctopusError::invalid_parameter("add_account", "account.id"));
        }
        debug!("Creating {} account '{}'", account.account_type, account.name);
        self.create_resource(api::ACCOUNTS, account).await
    }

    /// Replace an existing account
    pub async fn update_account(&self, account: &Account) -> Result<Account> {
        require_id("update_account", "account.id", &account.id)?;
        let path = resource_path(api::ACCOUNTS, &account.id);
        self.update_resource(&path, account).await
    }

    /// Delete an account by ID
    pub async fn delete_account(&self, account_id: &str) -> Result<()> {
        require_id("delete_account", "account_id", account_id)?;
        let path = resource_path(api::ACCOUNTS, account_id);
        self.delete_resource(&path).await
    }
}
