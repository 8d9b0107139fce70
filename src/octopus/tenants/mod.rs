//! Tenant module

mod api;
mod models;

pub use models::{LibraryVariable, Tenant, TenantVariables, VARIABLES_LINK};
