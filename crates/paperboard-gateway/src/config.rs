//! Gateway configuration.

use crate::error::{GatewayError, Result};

/// Environment variable for the backend API key.
pub const API_KEY_ENV: &str = "PAPERBOARD_API_KEY";

/// Environment variable for the backend project id.
pub const PROJECT_ENV: &str = "PAPERBOARD_PROJECT";

/// Environment variable overriding the identity provider base URL.
pub const IDENTITY_URL_ENV: &str = "PAPERBOARD_IDENTITY_URL";

/// Environment variable overriding the document store base URL.
pub const FIRESTORE_URL_ENV: &str = "PAPERBOARD_FIRESTORE_URL";

const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";

/// Connection settings for the remote backend.
///
/// The URL overrides exist for emulators and tests; production use keeps
/// the Google endpoints.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// API key passed to the identity provider.
    pub api_key: String,
    /// Backend project id the `paper` collection lives under.
    pub project_id: String,
    /// Identity provider base URL.
    pub identity_url: String,
    /// Document store base URL.
    pub firestore_url: String,
}

impl GatewayConfig {
    /// Creates a config with the default endpoints.
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            firestore_url: DEFAULT_FIRESTORE_URL.to_string(),
        }
    }

    /// Creates a config from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| GatewayError::Configuration(format!("missing {}", API_KEY_ENV)))?;
        let project_id = std::env::var(PROJECT_ENV)
            .map_err(|_| GatewayError::Configuration(format!("missing {}", PROJECT_ENV)))?;

        let mut config = Self::new(api_key, project_id);
        if let Ok(url) = std::env::var(IDENTITY_URL_ENV) {
            config.identity_url = url;
        }
        if let Ok(url) = std::env::var(FIRESTORE_URL_ENV) {
            config.firestore_url = url;
        }
        Ok(config)
    }

    /// Overrides the identity provider base URL.
    pub fn with_identity_url(mut self, url: impl Into<String>) -> Self {
        self.identity_url = url.into();
        self
    }

    /// Overrides the document store base URL.
    pub fn with_firestore_url(mut self, url: impl Into<String>) -> Self {
        self.firestore_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::new("key", "proj");
        assert_eq!(config.identity_url, DEFAULT_IDENTITY_URL);
        assert_eq!(config.firestore_url, DEFAULT_FIRESTORE_URL);
    }

    #[test]
    fn test_url_overrides() {
        let config = GatewayConfig::new("key", "proj")
            .with_identity_url("http://localhost:9099")
            .with_firestore_url("http://localhost:8080");
        assert_eq!(config.identity_url, "http://localhost:9099");
        assert_eq!(config.firestore_url, "http://localhost:8080");
    }
}
