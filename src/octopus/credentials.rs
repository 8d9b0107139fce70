//! Server URL, API key and space resolution from multiple sources

use dialoguer::{theme::ColorfulTheme, Select};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::credentials;
use crate::error::{OctopusError, Result};

/// Credentials file structure
#[derive(Deserialize, Debug, Default)]
struct CredentialsFile {
    #[serde(default)]
    credentials: BTreeMap<String, ServerCredential>,
}

/// Single credential entry, keyed by server URL
#[derive(Deserialize, Debug)]
struct ServerCredential {
    api_key: String,
    #[serde(default)]
    space: Option<String>,
}

/// Path of the credentials file in the user's home directory
fn credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(credentials::FILE_PATH))
}

/// Parse a credentials file; a missing file yields `None`
fn read_credentials_file(path: &Path) -> Result<Option<CredentialsFile>> {
    debug!("Looking for credentials file at: {}", path.display());
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Ok(None),
    };

    serde_json::from_str(&content).map(Some).map_err(|e| {
        OctopusError::Credentials(format!(
            "Could not parse credentials file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Server entries are compared without a trailing slash
fn normalize_server(server: &str) -> &str {
    server.trim_end_matches('/')
}

/// API key resolution with fallback logic
pub struct ApiKeyResolver {
    server: String,
    credentials_path: Option<PathBuf>,
}

impl ApiKeyResolver {
    /// Create a new API key resolver for the given server
    pub fn new(server: &str) -> Self {
        Self {
            server: server.to_string(),
            credentials_path: credentials_path(),
        }
    }

    /// Use a specific credentials file instead of the one in the home directory
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Resolve the API key with fallback:
    /// 1. CLI argument (if provided)
    /// 2. Environment variables (OCTOPUS_APIKEY, OCTOPUS_API_KEY - in order)
    /// 3. Credentials file (~/.octopus/credentials.json)
    pub fn resolve(&self, cli_api_key: Option<&str>) -> Result<String> {
        if let Some(key) = cli_api_key {
            debug!("Using API key from CLI argument");
            return Ok(key.to_string());
        }

        for env_var in credentials::API_KEY_ENV_VARS {
            if let Ok(key) = std::env::var(env_var) {
                if !key.is_empty() {
                    debug!("Using API key from {} environment variable", env_var);
                    return Ok(key);
                }
            }
        }

        debug!(
            "No API key found in environment variables {:?}, trying credentials file",
            credentials::API_KEY_ENV_VARS
        );
        self.read_from_credentials_file()
    }

    fn read_from_credentials_file(&self) -> Result<String> {
        let path = self
            .credentials_path
            .as_deref()
            .ok_or_else(|| OctopusError::ApiKeyNotFound(self.api_key_not_found_message(None)))?;

        let creds = read_credentials_file(path)?
            .ok_or_else(|| OctopusError::ApiKeyNotFound(self.api_key_not_found_message(Some(path))))?;

        let wanted = normalize_server(&self.server);
        creds
            .credentials
            .iter()
            .find(|(server, _)| normalize_server(server) == wanted)
            .map(|(_, cred)| {
                debug!(
                    "Using API key from credentials file {} for server: {}",
                    path.display(),
                    self.server
                );
                cred.api_key.clone()
            })
            .ok_or_else(|| OctopusError::ApiKeyNotFound(self.api_key_not_found_message(Some(path))))
    }

    /// Space configured for this server in the credentials file, if any
    pub fn space_from_credentials_file(&self) -> Option<String> {
        let path = self.credentials_path.as_deref()?;
        let creds = read_credentials_file(path).ok().flatten()?;
        let wanted = normalize_server(&self.server);
        creds
            .credentials
            .into_iter()
            .find(|(server, _)| normalize_server(server) == wanted)
            .and_then(|(_, cred)| cred.space)
    }

    fn api_key_not_found_message(&self, credentials_path: Option<&Path>) -> String {
        let env_vars = credentials::API_KEY_ENV_VARS.join(", ");
        let creds_info = credentials_path
            .map(|p| format!(" or in credentials file {}", p.display()))
            .unwrap_or_default();

        format!(
            "No API key found for server '{}'. Please provide an API key using one of:\n\
             \n\
             1. CLI argument:      octoprov --api-key <API-KEY>\n\
             2. Environment var:   export OCTOPUS_APIKEY=<API-KEY>  (also: OCTOPUS_API_KEY)\n\
             3. Credentials file:  ~/{} with {{\"credentials\": {{\"{}\": {{\"api_key\": \"...\"}}}}}}\n\
             \n\
             Checked: env vars [{}]{}",
            self.server,
            credentials::FILE_PATH,
            self.server,
            env_vars,
            creds_info
        )
    }
}

/// Server URL resolution with fallback logic
pub struct ServerResolver;

impl ServerResolver {
    /// Resolve the server URL with fallback:
    /// 1. CLI argument (if provided)
    /// 2. Environment variable (OCTOPUS_URL)
    /// 3. Credentials file:
    ///    - If 1 server: use it
    ///    - If multiple servers: interactive selection (or error in batch mode)
    ///    - If no servers: error
    pub fn resolve(cli_server: Option<&str>, batch_mode: bool) -> Result<String> {
        Self::resolve_with_path(cli_server, batch_mode, credentials_path().as_deref())
    }

    pub(crate) fn resolve_with_path(
        cli_server: Option<&str>,
        batch_mode: bool,
        path: Option<&Path>,
    ) -> Result<String> {
        if let Some(server) = cli_server {
            debug!("Using server from CLI argument: {}", server);
            return Ok(server.to_string());
        }

        if let Ok(server) = std::env::var(credentials::SERVER_ENV_VAR) {
            if !server.is_empty() {
                debug!(
                    "Using server from {} environment variable: {}",
                    credentials::SERVER_ENV_VAR,
                    server
                );
                return Ok(server);
            }
        }

        debug!(
            "No server in CLI or {}, trying credentials file",
            credentials::SERVER_ENV_VAR
        );

        let path = path
            .ok_or_else(|| OctopusError::ServerNotFound(Self::server_not_found_message(None, None)))?;
        let creds = read_credentials_file(path)?.ok_or_else(|| {
            OctopusError::ServerNotFound(Self::server_not_found_message(None, None))
        })?;

        let servers: Vec<String> = creds.credentials.into_keys().collect();
        match servers.as_slice() {
            [] => Err(OctopusError::ServerNotFound(Self::server_not_found_message(
                Some(path),
                None,
            ))),
            [server] => {
                debug!(
                    "Using single server from credentials file {}: {}",
                    path.display(),
                    server
                );
                Ok(server.clone())
            }
            _ if batch_mode => Err(OctopusError::ServerNotFound(
                Self::server_not_found_message(Some(path), Some(&servers)),
            )),
            _ => Self::interactive_server_selection(&servers, path),
        }
    }

    fn interactive_server_selection(servers: &[String], path: &Path) -> Result<String> {
        eprintln!("\nMultiple servers found in {}:", path.display());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select a server")
            .items(servers)
            .default(0)
            .interact()
            .map_err(|e| OctopusError::ServerNotFound(format!("Failed to select server: {}", e)))?;

        let server = servers[selection].clone();
        debug!("User selected server: {}", server);
        Ok(server)
    }

    fn server_not_found_message(
        credentials_path: Option<&Path>,
        available_servers: Option<&[String]>,
    ) -> String {
        let creds_info = match (credentials_path, available_servers) {
            (Some(p), Some(servers)) => format!(
                "\n   Credentials file: {} ({} servers found)\n   Available servers: {}",
                p.display(),
                servers.len(),
                servers.join(", ")
            ),
            (Some(p), None) => {
                format!("\n   Credentials file: {} (no servers found)", p.display())
            }
            (None, _) => "\n   Credentials file: not found".to_string(),
        };

        format!(
            "No Octopus server specified. Please provide a server using one of:\n\
             \n\
             1. CLI argument:      octoprov --server <URL>\n\
             2. Environment var:   export {}=<URL>\n\
             3. Credentials file:  ~/{}\n\
             \n\
             Checked:{}\n",
            credentials::SERVER_ENV_VAR,
            credentials::FILE_PATH,
            creds_info
        )
    }
}

/// Resolve the space: CLI argument, then OCTOPUS_SPACE, then the credentials file
pub fn resolve_space(cli_space: Option<&str>, api_keys: &ApiKeyResolver) -> Option<String> {
    if let Some(space) = cli_space.filter(|s| !s.is_empty()) {
        debug!("Using space from CLI argument: {}", space);
        return Some(space.to_string());
    }

    if let Ok(space) = std::env::var(credentials::SPACE_ENV_VAR) {
        if !space.is_empty() {
            debug!(
                "Using space from {} environment variable: {}",
                credentials::SPACE_ENV_VAR,
                space
            );
            return Some(space);
        }
    }

    api_keys.space_from_credentials_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn credentials_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_resolver_cli_api_key_takes_precedence() {
        let resolver = ApiKeyResolver::new("https://octopus.example.com");
        let result = resolver.resolve(Some("API-CLI"));
        assert_eq!(result.unwrap(), "API-CLI");
    }

    #[test]
    fn test_credentials_file_parsing() {
        let json = r#"{
            "credentials": {
                "https://octopus.example.com": {"api_key": "API-ONE"},
                "https://other.example.com/": {"api_key": "API-TWO", "space": "Spaces-2"}
            }
        }"#;

        let creds: CredentialsFile = serde_json::from_str(json).unwrap();
        assert_eq!(creds.credentials.len(), 2);
        assert_eq!(
            creds.credentials["https://other.example.com/"].space.as_deref(),
            Some("Spaces-2")
        );
    }

    #[test]
    fn test_read_api_key_from_file_ignores_trailing_slash() {
        let file = credentials_file(
            r#"{"credentials": {"https://other.example.com/": {"api_key": "API-TWO", "space": "Spaces-2"}}}"#,
        );
        let resolver =
            ApiKeyResolver::new("https://other.example.com").with_credentials_path(file.path());

        assert_eq!(resolver.read_from_credentials_file().unwrap(), "API-TWO");
        assert_eq!(
            resolver.space_from_credentials_file().as_deref(),
            Some("Spaces-2")
        );
    }

    #[test]
    fn test_read_api_key_unknown_server() {
        let file = credentials_file(r#"{"credentials": {"https://a.example.com": {"api_key": "K"}}}"#);
        let resolver =
            ApiKeyResolver::new("https://b.example.com").with_credentials_path(file.path());

        let err = resolver.read_from_credentials_file().unwrap_err();
        assert!(matches!(err, OctopusError::ApiKeyNotFound(_)));
        assert!(err.to_string().contains("https://b.example.com"));
    }

    #[test]
    fn test_read_api_key_malformed_file() {
        let file = credentials_file("not json");
        let resolver =
            ApiKeyResolver::new("https://a.example.com").with_credentials_path(file.path());
        assert!(matches!(
            resolver.read_from_credentials_file(),
            Err(OctopusError::Credentials(_))
        ));
    }

    #[test]
    fn test_api_key_not_found_message_format() {
        let resolver = ApiKeyResolver::new("https://octopus.example.com");
        let msg = resolver.api_key_not_found_message(None);
        assert!(msg.contains("https://octopus.example.com"));
        assert!(msg.contains("octoprov --api-key"));
        assert!(msg.contains("OCTOPUS_APIKEY"));
    }

    #[test]
    fn test_cli_server_takes_precedence() {
        let result = ServerResolver::resolve(Some("https://octopus.example.com"), true);
        assert_eq!(result.unwrap(), "https://octopus.example.com");
    }

    #[test]
    fn test_server_not_found_message_with_available_servers() {
        let servers = vec![
            "https://a.example.com".to_string(),
            "https://b.example.com".to_string(),
        ];
        let path = Path::new("/test/path");
        let msg = ServerResolver::server_not_found_message(Some(path), Some(&servers));
        assert!(msg.contains("https://a.example.com"));
        assert!(msg.contains("2 servers found"));
        assert!(msg.contains("octoprov --server"));
    }

    #[test]
    fn test_cli_space_takes_precedence() {
        let resolver = ApiKeyResolver::new("https://octopus.example.com");
        assert_eq!(
            resolve_space(Some("Spaces-7"), &resolver).as_deref(),
            Some("Spaces-7")
        );
    }
}
