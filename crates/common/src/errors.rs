use std::fmt;
use thiserror::Error;

/// External services the assistant talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    IssueTracker,
    VectorStore,
    Embedding,
    Llm,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::IssueTracker => "issue tracker",
            Service::VectorStore => "vector store",
            Service::Embedding => "embedding service",
            Service::Llm => "LLM",
        };
        f.write_str(name)
    }
}

/// Error hierarchy shared by all issuescout crates
#[derive(Error, Debug)]
pub enum AssistantError {
    // === System ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // === External services ===
    /// The request never produced an HTTP response (DNS, connect, timeout, body decode).
    #[error("{service} unreachable: {message}")]
    Network { service: Service, message: String },

    /// The service answered, but with an error.
    #[error("{service} error{}: {message}", status_suffix(.status))]
    Api {
        service: Service,
        status: Option<u16>,
        message: String,
    },

    // === Agent ===
    #[error("Tool error: {0}")]
    Tool(String),

    #[error("{0}")]
    Custom(String),
}

impl AssistantError {
    pub fn network(service: Service, err: impl fmt::Display) -> Self {
        AssistantError::Network {
            service,
            message: err.to_string(),
        }
    }

    pub fn api(service: Service, status: Option<u16>, message: impl Into<String>) -> Self {
        AssistantError::Api {
            service,
            status,
            message: message.into(),
        }
    }

    /// The service this error came from, if any.
    pub fn service(&self) -> Option<Service> {
        match self {
            AssistantError::Network { service, .. } | AssistantError::Api { service, .. } => {
                Some(*service)
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AssistantError::Api { status, .. } => *status,
            _ => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AssistantError::Io(_) => "IO_ERROR",
            AssistantError::Serialization(_) => "SERIALIZATION_ERROR",
            AssistantError::Config(_) => "CONFIG_ERROR",
            AssistantError::Validation(_) => "VALIDATION_ERROR",
            AssistantError::Network { .. } => "NET_ERROR",
            AssistantError::Api { .. } => "API_ERROR",
            AssistantError::Tool(_) => "TOOL_ERROR",
            AssistantError::Custom(_) => "CUSTOM_ERROR",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Result type alias
pub type AssistantResult<T> = Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_status() {
        let err = AssistantError::api(Service::VectorStore, Some(401), "bad token");
        assert_eq!(err.to_string(), "vector store error (HTTP 401): bad token");
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.service(), Some(Service::VectorStore));
    }

    #[test]
    fn test_api_error_display_without_status() {
        let err = AssistantError::api(Service::VectorStore, None, "COLLECTION_NOT_EXIST");
        assert_eq!(err.to_string(), "vector store error: COLLECTION_NOT_EXIST");
    }

    #[test]
    fn test_error_codes() {
        let err = AssistantError::network(Service::Llm, "connection refused");
        assert_eq!(err.error_code(), "NET_ERROR");
        assert_eq!(err.to_string(), "LLM unreachable: connection refused");

        let err = AssistantError::Config("missing token".to_string());
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert_eq!(err.to_string(), "Configuration error: missing token");
    }
}
