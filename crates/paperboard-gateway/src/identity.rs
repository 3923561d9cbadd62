//! Identity provider client.
//!
//! Sign-in goes through the Identity Toolkit REST endpoint
//! `accounts:signInWithPassword`. Empty-field validation happens here,
//! before any network call, with the exact user-facing messages the
//! login form shows inline.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use paperboard_models::Session;
use paperboard_persistence::SessionStore;

use crate::config::GatewayConfig;
use crate::error::AuthError;

/// Provider error codes that mean the credentials were wrong, as opposed
/// to the provider itself failing.
const INVALID_CREDENTIAL_CODES: [&str; 4] = [
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_LOGIN_CREDENTIALS",
    "USER_DISABLED",
];

/// Client for the email/password identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl IdentityClient {
    /// Creates a client for the configured provider.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Signs in with email and password.
    ///
    /// Empty-field combinations fail before any network call. Provider
    /// failures carry the provider's message verbatim; known credential
    /// rejections are classified as `InvalidCredentials`.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        match (email.is_empty(), password.is_empty()) {
            (true, true) => return Err(AuthError::BothEmpty),
            (true, false) => return Err(AuthError::EmptyEmail),
            (false, true) => return Err(AuthError::EmptyPassword),
            (false, false) => {}
        }

        let url = format!(
            "{}/v1/accounts:signInWithPassword?key={}",
            self.config.identity_url, self.config.api_key
        );
        let request = SignInRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_provider_error(&body)
                .unwrap_or_else(|| format!("sign-in failed with {}", status));
            warn!(status = %status, message = %message, "sign-in rejected");
            return Err(classify_provider_error(message));
        }

        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        debug!(email = %body.email, "signed in");
        Ok(Session::new(
            body.id_token,
            body.refresh_token,
            body.email,
            body.local_id,
        ))
    }

    /// Signs the current user out.
    ///
    /// The provider has no server-side sign-out; discarding the persisted
    /// session is what ends it. A failure to do so surfaces as a provider
    /// error.
    pub fn sign_out(&self, store: &SessionStore) -> Result<(), AuthError> {
        store.clear().map_err(|e| AuthError::Provider(e.to_string()))
    }
}

/// Pulls the `error.message` field out of a provider error body.
fn parse_provider_error(body: &str) -> Option<String> {
    let parsed: ProviderErrorBody = serde_json::from_str(body).ok()?;
    Some(parsed.error.message)
}

/// Classifies a provider message as a credential rejection or a general
/// provider failure. Either way the message travels verbatim.
fn classify_provider_error(message: String) -> AuthError {
    let code = message.split_whitespace().next().unwrap_or(&message);
    if INVALID_CREDENTIAL_CODES.contains(&code) {
        AuthError::InvalidCredentials(message)
    } else {
        AuthError::Provider(message)
    }
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "returnSecureToken")]
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    #[serde(rename = "idToken")]
    id_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
    email: String,
    #[serde(rename = "localId")]
    local_id: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}
