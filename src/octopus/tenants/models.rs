//! Tenant data models

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::octopus::models::PropertyValue;
use crate::octopus::traits::OctopusResource;

/// Link relation naming a tenant's variables document
pub const VARIABLES_LINK: &str = "Variables";

/// Tenant data from the Octopus API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Tenant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tenant_tags: Vec<String>,
    #[serde(default)]
    pub project_environments: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub links: HashMap<String, String>,
}

impl OctopusResource for Tenant {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Variables document of a tenant
///
/// The document is read, edited and written back whole, so fields this
/// crate does not model are carried through untouched in `other`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TenantVariables {
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub tenant_name: String,
    #[serde(default)]
    pub library_variables: BTreeMap<String, LibraryVariable>,
    #[serde(default)]
    pub project_variables: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub links: HashMap<String, String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// Values a tenant supplies for one library variable set
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryVariable {
    pub library_variable_set_id: String,
    #[serde(default)]
    pub library_variable_set_name: String,
    #[serde(default)]
    pub templates: Vec<serde_json::Value>,
    #[serde(default)]
    pub variables: BTreeMap<String, PropertyValue>,
    #[serde(default)]
    pub links: HashMap<String, String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl TenantVariables {
    /// Library variable set entry whose set ID matches
    fn library_set_mut(&mut self, library_variable_set_id: &str) -> Option<&mut LibraryVariable> {
        self.library_variables
            .values_mut()
            .find(|lv| lv.library_variable_set_id == library_variable_set_id)
    }

    /// Value of a common variable, if the tenant has one
    pub fn library_variable(
        &self,
        library_variable_set_id: &str,
        variable_id: &str,
    ) -> Option<&PropertyValue> {
        self.library_variables
            .values()
            .find(|lv| lv.library_variable_set_id == library_variable_set_id)
            .and_then(|lv| lv.variables.get(variable_id))
    }

    /// Set a common variable; false when the tenant has no such library set
    pub fn set_library_variable(
        &mut self,
        library_variable_set_id: &str,
        variable_id: &str,
        value: PropertyValue,
    ) -> bool {
        match self.library_set_mut(library_variable_set_id) {
            Some(lv) => {
                lv.variables.insert(variable_id.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Remove a common variable; false when there was nothing to remove
    pub fn remove_library_variable(
        &mut self,
        library_variable_set_id: &str,
        variable_id: &str,
    ) -> bool {
        self.library_set_mut(library_variable_set_id)
            .map(|lv| lv.variables.remove(variable_id).is_some())
            .unwrap_or(false)
    }
}
