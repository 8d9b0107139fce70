//! octoprov - Octopus Deploy API client and declarative resource adapters
//!
//! A typed client for the Octopus Deploy REST API plus create/read/update/
//! delete adapters that drive accounts, feeds, tenant variables and
//! deployment processes from JSON state documents.
//!
//! # Features
//!
//! - Fetch, list (following `Page.Next` links) and update deployment processes
//! - Accounts, feeds, projects and tenant variables
//! - Structured API errors carrying the status code and server messages
//! - Multiple output formats (table, CSV, JSON, YAML)
//!
//! # Example
//!
//! ```bash
//! # List deployment processes
//! octoprov get processes --server https://octopus.example.com
//!
//! # Show one process as YAML
//! octoprov get process deploymentprocess-Projects-1 -o yaml
//!
//! # Create a GitHub feed from a state file
//! octoprov resource octopusdeploy_github_repository_feed create --file feed.json
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod octopus;
pub mod output;
pub mod provider;
pub mod ui;

pub use cli::{Cli, Command, GetResource, OutputFormat, ResourceArgs};
pub use error::{OctopusError, Result};
pub use octopus::{
    resolve_space, run_feed_command, run_process_command, ApiKeyResolver, DeploymentProcess,
    Feed, OctopusClient, ServerResolver,
};
pub use provider::{run_resource_command, ResourceData, ResourceOp, ResourceType};
