//! Error types for the gateway crate.

use thiserror::Error;

/// Errors from the remote document store.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend could not be reached or refused the request.
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// The backend answered with something the client could not parse.
    #[error("unexpected response from remote store: {0}")]
    InvalidResponse(String),

    /// Missing or invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Sign-in failures.
///
/// The three empty-field variants are caught client-side before any
/// network call; their display strings are part of the user-visible
/// contract and must not change. Provider messages are passed through
/// verbatim.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email field left empty.
    #[error("Email input is empty!")]
    EmptyEmail,

    /// Password field left empty.
    #[error("Pass input is empty!")]
    EmptyPassword,

    /// Both fields left empty.
    #[error("Email and pass inputs are empty!")]
    BothEmpty,

    /// The provider rejected the credentials.
    #[error("{0}")]
    InvalidCredentials(String),

    /// Any other provider failure, message verbatim.
    #[error("{0}")]
    Provider(String),
}

impl AuthError {
    /// Returns true for failures detected before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AuthError::EmptyEmail | AuthError::EmptyPassword | AuthError::BothEmpty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_field_messages_are_exact() {
        assert_eq!(AuthError::EmptyEmail.to_string(), "Email input is empty!");
        assert_eq!(AuthError::EmptyPassword.to_string(), "Pass input is empty!");
        assert_eq!(
            AuthError::BothEmpty.to_string(),
            "Email and pass inputs are empty!"
        );
    }

    #[test]
    fn test_provider_message_passes_through_verbatim() {
        let err = AuthError::Provider("TOO_MANY_ATTEMPTS_TRY_LATER".to_string());
        assert_eq!(err.to_string(), "TOO_MANY_ATTEMPTS_TRY_LATER");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_classification() {
        assert!(AuthError::EmptyEmail.is_validation());
        assert!(AuthError::EmptyPassword.is_validation());
        assert!(AuthError::BothEmpty.is_validation());
        assert!(!AuthError::InvalidCredentials("INVALID_PASSWORD".into()).is_validation());
    }
}
