use thiserror::Error;

/// Message shown when the server gives no usable error detail.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Client-level error type.
/// Every API call, view operation, and session-store access returns `Result<T, ClientError>`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server rejected the bearer token (HTTP 401 on an authenticated call).
    #[error("Session expired")]
    Unauthorized,

    /// An authenticated call was attempted with no session present. Nothing was sent.
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Request cancelled")]
    Cancelled,
}

/// Coarse classification driving how a view reacts to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Blocked before any request was sent.
    Validation,
    /// Session missing or rejected: tear down and redirect to login.
    Authentication,
    /// Server or network failure: notify, no retry.
    Transient,
    /// The owning view went away.
    Cancelled,
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Unauthorized | ClientError::NotAuthenticated => ErrorKind::Authentication,
            ClientError::Api { .. }
            | ClientError::Timeout
            | ClientError::Http(_)
            | ClientError::Parse(_)
            | ClientError::Storage(_) => ErrorKind::Transient,
            ClientError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    /// The text a user sees in a notification for this error.
    /// Server-provided messages are passed through; everything else gets a fixed wording.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Unauthorized => "Session expired. Please log in again.".to_string(),
            ClientError::NotAuthenticated => "Please log in to continue.".to_string(),
            ClientError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Api { status, .. } => {
                tracing::error!("API error with empty body (status {status})");
                GENERIC_FAILURE.to_string()
            }
            ClientError::Timeout => "The server took too long to respond.".to_string(),
            ClientError::Http(e) => {
                tracing::error!("HTTP error: {e}");
                "Could not reach the server.".to_string()
            }
            ClientError::Parse(e) => {
                tracing::error!("Unexpected response body: {e}");
                "The server sent an unexpected response.".to_string()
            }
            ClientError::Storage(e) => {
                tracing::error!("Session storage error: {e}");
                "Could not access local session storage.".to_string()
            }
            ClientError::Cancelled => "Request cancelled.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_classified_as_authentication() {
        assert_eq!(ClientError::Unauthorized.kind(), ErrorKind::Authentication);
        assert_eq!(
            ClientError::NotAuthenticated.kind(),
            ErrorKind::Authentication
        );
        assert!(ClientError::Unauthorized.is_auth_failure());
    }

    #[test]
    fn test_login_rejection_is_not_session_expiry() {
        let err = ClientError::Api {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert!(!err.is_auth_failure());
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[test]
    fn test_api_error_without_message_falls_back_to_generic() {
        let err = ClientError::Api {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_validation_message_passed_through() {
        let err = ClientError::validation("Title is required");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.user_message(), "Title is required");
    }
}
