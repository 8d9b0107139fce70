//! Tenant API operations

use log::debug;

use crate::config::api;
use crate::error::Result;
use crate::octopus::client::{require_id, resource_path};
use crate::octopus::OctopusClient;

use super::models::{Tenant, TenantVariables, VARIABLES_LINK};

impl OctopusClient {
    /// Get a tenant by ID
    pub async fn get_tenant(&self, tenant_id: &str) -> Result<Tenant> {
        require_id("get_tenant", "tenant_id", tenant_id)?;
        let path = resource_path(api::TENANTS, tenant_id);
        self.get_resource(&path).await
    }

    /// Get the variables document of a tenant
    pub async fn get_tenant_variables(&self, tenant: &Tenant) -> Result<TenantVariables> {
        let path = Self::tenant_variables_path(tenant)?;
        debug!("Fetching variables for tenant {}", tenant.id);
        self.get_resource(&path).await
    }

    /// Write back a tenant's variables document
    pub async fn update_tenant_variables(
        &self,
        tenant: &Tenant,
        variables: &TenantVariables,
    ) -> Result<TenantVariables> {
        let path = Self::tenant_variables_path(tenant)?;
        debug!("Updating variables for tenant {}", tenant.id);
        self.update_resource(&path, variables).await
    }

    /// Prefer the server's `Variables` link; fall back to the conventional path
    fn tenant_variables_path(tenant: &Tenant) -> Result<String> {
        require_id("tenant_variables", "tenant.id", &tenant.id)?;
        Ok(tenant
            .links
            .get(VARIABLES_LINK)
            .filter(|link| !link.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                format!(
                    "{}/{}",
                    resource_path(api::TENANTS, &tenant.id),
                    api::VARIABLES
                )
            }))
    }
}
