//! Octopus Deploy API client module
//!
//! This module provides the transport client and the entity services used
//! by the provider resources.

pub mod accounts;
mod client;
mod credentials;
pub mod deployment_processes;
pub mod feeds;
pub mod models;
pub mod projects;
pub mod tenants;
pub mod traits;

pub use accounts::Account;
pub use client::OctopusClient;
pub use credentials::{resolve_space, ApiKeyResolver, ServerResolver};
pub use deployment_processes::{
    run_process_command, DeploymentAction, DeploymentProcess, DeploymentStep, PackageReference,
    StartTrigger, StepCondition,
};
pub use feeds::{run_feed_command, Feed};
pub use models::{PropertyValue, SensitiveValue, TenantedDeploymentMode};
pub use projects::Project;
pub use tenants::{LibraryVariable, Tenant, TenantVariables};
pub use traits::{OctopusResource, PagedResults, PaginatedResponse};
