//! Declarative resource adapters
//!
//! Each resource type turns a [`ResourceData`] state document into API calls
//! and writes the server's answer back into the state. Handlers receive the
//! client explicitly.

pub mod attributes;
pub mod aws_account;
mod commands;
pub mod deployment_process;
pub mod github_repository_feed;
pub mod tenant_common_variable;

use clap::ValueEnum;
use log::debug;

use crate::error::Result;
use crate::octopus::OctopusClient;

pub use attributes::{AttributeReader, AttributeValue, Attributes, ResourceData};
pub use commands::{read_state, run_resource_command, write_state};

/// Resource types this provider manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceType {
    /// AWS account (octopusdeploy_aws_account)
    #[value(name = "octopusdeploy_aws_account", alias = "aws-account")]
    AwsAccount,
    /// GitHub repository feed (octopusdeploy_github_repository_feed)
    #[value(name = "octopusdeploy_github_repository_feed", alias = "github-feed")]
    GithubRepositoryFeed,
    /// Tenant common variable (octopusdeploy_tenant_common_variable)
    #[value(name = "octopusdeploy_tenant_common_variable", alias = "tenant-variable")]
    TenantCommonVariable,
    /// Deployment process of a project (octopusdeploy_deployment_process)
    #[value(name = "octopusdeploy_deployment_process", alias = "deployment-process")]
    DeploymentProcess,
}

impl ResourceType {
    pub fn type_name(&self) -> &'static str {
        match self {
            ResourceType::AwsAccount => aws_account::TYPE_NAME,
            ResourceType::GithubRepositoryFeed => github_repository_feed::TYPE_NAME,
            ResourceType::TenantCommonVariable => tenant_common_variable::TYPE_NAME,
            ResourceType::DeploymentProcess => deployment_process::TYPE_NAME,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Lifecycle operations on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceOp {
    /// Create the resource and record its ID
    Create,
    /// Refresh state from the server (clears the ID if it is gone)
    Read,
    /// Push state to the server
    Update,
    /// Remove the resource and clear its ID
    Delete,
    /// Populate state from an existing ID, then read
    Import,
}

impl std::fmt::Display for ResourceOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceOp::Create => write!(f, "create"),
            ResourceOp::Read => write!(f, "read"),
            ResourceOp::Update => write!(f, "update"),
            ResourceOp::Delete => write!(f, "delete"),
            ResourceOp::Import => write!(f, "import"),
        }
    }
}

/// Run one lifecycle operation against `data`
pub async fn apply(
    client: &OctopusClient,
    resource: ResourceType,
    op: ResourceOp,
    data: &mut ResourceData,
) -> Result<()> {
    debug!("{} {} (id '{}')", op, resource, data.id());

    match (resource, op) {
        (ResourceType::AwsAccount, ResourceOp::Create) => aws_account::create(client, data).await,
        (ResourceType::AwsAccount, ResourceOp::Read | ResourceOp::Import) => {
            aws_account::read(client, data).await
        }
        (ResourceType::AwsAccount, ResourceOp::Update) => aws_account::update(client, data).await,
        (ResourceType::AwsAccount, ResourceOp::Delete) => aws_account::delete(client, data).await,

        (ResourceType::GithubRepositoryFeed, ResourceOp::Create) => {
            github_repository_feed::create(client, data).await
        }
        (ResourceType::GithubRepositoryFeed, ResourceOp::Read | ResourceOp::Import) => {
            github_repository_feed::read(client, data).await
        }
        (ResourceType::GithubRepositoryFeed, ResourceOp::Update) => {
            github_repository_feed::update(client, data).await
        }
        (ResourceType::GithubRepositoryFeed, ResourceOp::Delete) => {
            github_repository_feed::delete(client, data).await
        }

        (ResourceType::TenantCommonVariable, ResourceOp::Create) => {
            tenant_common_variable::create(client, data).await
        }
        (ResourceType::TenantCommonVariable, ResourceOp::Read) => {
            tenant_common_variable::read(client, data).await
        }
        (ResourceType::TenantCommonVariable, ResourceOp::Import) => {
            tenant_common_variable::import(data)?;
            tenant_common_variable::read(client, data).await
        }
        (ResourceType::TenantCommonVariable, ResourceOp::Update) => {
            tenant_common_variable::update(client, data).await
        }
        (ResourceType::TenantCommonVariable, ResourceOp::Delete) => {
            tenant_common_variable::delete(client, data).await
        }

        (ResourceType::DeploymentProcess, ResourceOp::Create) => {
            deployment_process::create(client, data).await
        }
        (ResourceType::DeploymentProcess, ResourceOp::Read | ResourceOp::Import) => {
            deployment_process::read(client, data).await
        }
        (ResourceType::DeploymentProcess, ResourceOp::Update) => {
            deployment_process::update(client, data).await
        }
        (ResourceType::DeploymentProcess, ResourceOp::Delete) => {
            deployment_process::delete(client, data).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_resource_type_names() {
        assert_eq!(
            ResourceType::AwsAccount.to_string(),
            "octopusdeploy_aws_account"
        );
        assert_eq!(
            ResourceType::from_str("octopusdeploy_deployment_process", false).unwrap(),
            ResourceType::DeploymentProcess
        );
        assert_eq!(
            ResourceType::from_str("github-feed", false).unwrap(),
            ResourceType::GithubRepositoryFeed
        );
    }

    #[test]
    fn test_resource_op_display() {
        assert_eq!(ResourceOp::Import.to_string(), "import");
        assert_eq!(ResourceOp::Delete.to_string(), "delete");
    }

    #[tokio::test]
    async fn test_import_tenant_common_variable_reads_after_parsing_id() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/tenants/Tenants-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Id": "Tenants-1",
                "Name": "Acme"
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/tenants/Tenants-1/variables"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "TenantId": "Tenants-1",
                "LibraryVariables": {
                    "LibraryVariableSets-1": {
                        "LibraryVariableSetId": "LibraryVariableSets-1",
                        "Variables": {"var-1": "blue"}
                    }
                }
            })))
            .mount(&mock_server)
            .await;

        let mut data = ResourceData::default();
        data.set_id("Tenants-1:LibraryVariableSets-1:var-1");
        apply(
            &client,
            ResourceType::TenantCommonVariable,
            ResourceOp::Import,
            &mut data,
        )
        .await
        .unwrap();

        assert_eq!(data.reader().required_string("value").unwrap(), "blue");
        assert_eq!(data.id(), "Tenants-1:LibraryVariableSets-1:var-1");
    }
}
