//! Client error types

use reqwest::StatusCode;

/// Errors returned by every Confluent Cloud operation
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, TLS, read failure)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a status code outside the documented success set
    #[error("failed to {action}: {status}")]
    UnexpectedStatus {
        action: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("missing Confluent Cloud API key or secret")]
    MissingCredentials,
}

impl ClientError {
    /// HTTP status of an unexpected-status error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Format a client error for display in the CLI
/// Security: Never echoes response bodies, which may carry secrets
pub fn describe_error(error: &ClientError) -> String {
    match error.status() {
        Some(StatusCode::UNAUTHORIZED) => {
            "Authentication failed. Check CONFLUENT_CLOUD_API_KEY and CONFLUENT_CLOUD_API_SECRET."
                .to_string()
        }
        Some(StatusCode::FORBIDDEN) => {
            "Permission denied. Check the role bindings of your Cloud API key.".to_string()
        }
        Some(StatusCode::NOT_FOUND) => "Resource not found.".to_string(),
        Some(StatusCode::CONFLICT) => {
            "Resource conflict. The resource may already exist or be in use.".to_string()
        }
        Some(StatusCode::TOO_MANY_REQUESTS) => {
            "Rate limit exceeded. Please try again later.".to_string()
        }
        Some(status) if status.is_server_error() => {
            "Confluent Cloud service temporarily unavailable. Please try again.".to_string()
        }
        _ => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_includes_status_line() {
        let err = ClientError::UnexpectedStatus {
            action: "delete kafka cluster",
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "failed to delete kafka cluster: 404 Not Found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_describe_error_by_status() {
        let err = |status| ClientError::UnexpectedStatus {
            action: "list kafka clusters",
            status,
            body: "{\"errors\":[]}".to_string(),
        };
        assert_eq!(describe_error(&err(StatusCode::NOT_FOUND)), "Resource not found.");
        assert!(describe_error(&err(StatusCode::UNAUTHORIZED)).contains("Authentication"));
        assert!(describe_error(&err(StatusCode::BAD_GATEWAY)).contains("unavailable"));
        // Unmapped statuses fall back to the status line
        assert_eq!(
            describe_error(&err(StatusCode::OK)),
            "failed to list kafka clusters: 200 OK"
        );
    }

    #[test]
    fn test_missing_credentials_has_no_status() {
        assert_eq!(ClientError::MissingCredentials.status(), None);
    }
}
