//! Signed-in session.

use serde::{Deserialize, Serialize};

/// Credentials for the current signed-in user.
///
/// Returned by the identity provider on sign-in and persisted locally so
/// the next launch restores the session instead of re-authenticating.
/// At most one session exists per app instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token for the document store.
    pub id_token: String,

    /// Token used to mint a fresh id token when the current one expires.
    pub refresh_token: String,

    /// Email address the user signed in with.
    pub email: String,

    /// Provider-assigned user id.
    pub local_id: String,
}

impl Session {
    /// Creates a session from provider-issued credentials.
    pub fn new(
        id_token: impl Into<String>,
        refresh_token: impl Into<String>,
        email: impl Into<String>,
        local_id: impl Into<String>,
    ) -> Self {
        Self {
            id_token: id_token.into(),
            refresh_token: refresh_token.into(),
            email: email.into(),
            local_id: local_id.into(),
        }
    }
}
