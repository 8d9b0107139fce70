/// Configuration constants for the Octopus Deploy API
pub mod api {
    /// Base path for the Octopus REST API
    pub const BASE_PATH: &str = "/api/";

    /// Header carrying the API key
    pub const API_KEY_HEADER: &str = "X-Octopus-ApiKey";

    /// Link relation pointing at the next page of a collection
    pub const PAGE_NEXT_LINK: &str = "Page.Next";

    /// Deployment processes endpoint
    pub const DEPLOYMENT_PROCESSES: &str = "deploymentprocesses";

    /// Projects endpoint
    pub const PROJECTS: &str = "projects";

    /// Accounts endpoint
    pub const ACCOUNTS: &str = "accounts";

    /// Feeds endpoint
    pub const FEEDS: &str = "feeds";

    /// Tenants endpoint
    pub const TENANTS: &str = "tenants";

    /// Tenant variables sub-resource
    pub const VARIABLES: &str = "variables";
}

/// Configuration constants for credentials
pub mod credentials {
    /// Path to the credentials file (relative to HOME)
    pub const FILE_PATH: &str = ".octopus/credentials.json";

    /// Environment variable names for the API key (checked in order)
    pub const API_KEY_ENV_VARS: &[&str] = &["OCTOPUS_APIKEY", "OCTOPUS_API_KEY"];

    /// Environment variable holding the server URL
    pub const SERVER_ENV_VAR: &str = "OCTOPUS_URL";

    /// Environment variable holding the space ID
    pub const SPACE_ENV_VAR: &str = "OCTOPUS_SPACE";
}

/// Default values for CLI
pub mod defaults {
    /// Default log level
    pub const LOG_LEVEL: &str = "warn";

    /// Default AWS account type
    pub const AWS_ACCOUNT_TYPE: &str = "AmazonWebServicesAccount";

    /// Default feed used by package references
    pub const PACKAGE_FEED_ID: &str = "feeds-builtin";

    /// Default package acquisition location
    pub const PACKAGE_ACQUISITION_LOCATION: &str = "Server";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_path_format() {
        assert!(api::BASE_PATH.starts_with('/'));
        assert!(api::BASE_PATH.ends_with('/'));
    }

    #[test]
    fn test_credentials_env_vars() {
        assert_eq!(
            credentials::API_KEY_ENV_VARS,
            &["OCTOPUS_APIKEY", "OCTOPUS_API_KEY"]
        );
    }

    #[test]
    fn test_endpoints_are_relative() {
        for endpoint in [
            api::DEPLOYMENT_PROCESSES,
            api::PROJECTS,
            api::ACCOUNTS,
            api::FEEDS,
            api::TENANTS,
        ] {
            assert!(!endpoint.starts_with('/'));
        }
    }
}
