use std::fmt;

/// Custom error type for Octopus Deploy operations
#[derive(Debug)]
pub enum OctopusError {
    /// HTTP request failed before the server acknowledged it
    Http(reqwest::Error),
    /// API returned an unexpected status code
    Api {
        status: u16,
        path: String,
        message: String,
        errors: Vec<String>,
    },
    /// JSON parsing error
    Json(String),
    /// A caller-supplied argument was rejected before any request was made
    InvalidParameter { operation: String, parameter: String },
    /// A resource attribute is missing or has the wrong type
    Attribute { key: String, message: String },
    /// An entity failed local validation
    Validation(String),
    /// A page envelope pointed back at a page already fetched
    Pagination(String),
    /// API key not found in any source
    ApiKeyNotFound(String),
    /// Server URL not found in any source
    ServerNotFound(String),
    /// Failed to read or parse credentials file
    Credentials(String),
    /// Configuration error
    Config(String),
}

impl OctopusError {
    /// Status code of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            OctopusError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server answered 404
    ///
    /// The client never turns this into an absence on its own; callers decide.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub(crate) fn invalid_parameter(operation: &str, parameter: &str) -> Self {
        OctopusError::InvalidParameter {
            operation: operation.to_string(),
            parameter: parameter.to_string(),
        }
    }

    pub(crate) fn attribute(key: &str, message: impl Into<String>) -> Self {
        OctopusError::Attribute {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for OctopusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OctopusError::Http(e) => write!(f, "HTTP request failed: {}", e),
            OctopusError::Api {
                status,
                path,
                message,
                errors,
            } => {
                write!(f, "API error (status {}) on '{}': {}", status, path, message)?;
                if !errors.is_empty() {
                    write!(f, " [{}]", errors.join("; "))?;
                }
                Ok(())
            }
            OctopusError::Json(msg) => write!(f, "JSON error: {}", msg),
            OctopusError::InvalidParameter {
                operation,
                parameter,
            } => write!(f, "{}: invalid or missing parameter '{}'", operation, parameter),
            OctopusError::Attribute { key, message } => {
                write!(f, "attribute '{}': {}", key, message)
            }
            OctopusError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            OctopusError::Pagination(msg) => write!(f, "Pagination error: {}", msg),
            OctopusError::ApiKeyNotFound(msg) => write!(f, "{}", msg),
            OctopusError::ServerNotFound(msg) => write!(f, "{}", msg),
            OctopusError::Credentials(msg) => write!(f, "{}", msg),
            OctopusError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for OctopusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OctopusError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OctopusError {
    fn from(err: reqwest::Error) -> Self {
        OctopusError::Http(err)
    }
}

impl From<serde_json::Error> for OctopusError {
    fn from(err: serde_json::Error) -> Self {
        OctopusError::Json(err.to_string())
    }
}

impl From<std::io::Error> for OctopusError {
    fn from(err: std::io::Error) -> Self {
        OctopusError::Credentials(err.to_string())
    }
}

/// Result type alias for Octopus operations
pub type Result<T> = std::result::Result<T, OctopusError>;
