//! Authentication state machine.

use paperboard_models::Session;
use tracing::{debug, info};

/// The two authentication states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Nobody is signed in.
    #[default]
    Anonymous,
    /// A user is signed in with the contained session.
    Authenticated(Session),
}

/// Tracks the current user and the last sign-in error.
///
/// `last_error` is valid in any state; it is set by failed sign-in
/// attempts and cleared by a successful sign-in or a sign-out. The
/// machine lives for the whole app lifetime, there is no terminal state.
/// It is an explicitly owned object handed to the screens that need it,
/// never ambient global state.
#[derive(Debug, Default)]
pub struct AuthMachine {
    state: AuthState,
    last_error: String,
}

impl AuthMachine {
    /// Creates a machine in the anonymous state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a machine from a session restored off disk.
    ///
    /// The session is trusted as-is; restoring never re-authenticates.
    pub fn restored(session: Option<Session>) -> Self {
        let state = match session {
            Some(session) => {
                info!(email = %session.email, "session restored");
                AuthState::Authenticated(session)
            }
            None => AuthState::Anonymous,
        };
        Self {
            state,
            last_error: String::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// True if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    /// The signed-in session, if any.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous => None,
        }
    }

    /// The last sign-in error, empty if none.
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// Transition: sign-in succeeded.
    pub fn signed_in(&mut self, session: Session) {
        info!(email = %session.email, "signed in");
        self.state = AuthState::Authenticated(session);
        self.last_error.clear();
    }

    /// Transition: sign-in failed; state is unchanged, the error sticks.
    pub fn sign_in_failed(&mut self, error: impl Into<String>) {
        self.last_error = error.into();
        debug!(error = %self.last_error, "sign-in failed");
    }

    /// Transition: signed out.
    pub fn signed_out(&mut self) {
        info!("signed out");
        self.state = AuthState::Anonymous;
        self.last_error.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("tok", "ref", "user@example.com", "uid-1")
    }

    #[test]
    fn test_starts_anonymous() {
        let machine = AuthMachine::new();
        assert!(!machine.is_authenticated());
        assert_eq!(machine.last_error(), "");
    }

    #[test]
    fn test_restored_session_is_authenticated() {
        let machine = AuthMachine::restored(Some(session()));
        assert!(machine.is_authenticated());
        assert_eq!(machine.session().unwrap().email, "user@example.com");

        let machine = AuthMachine::restored(None);
        assert!(!machine.is_authenticated());
    }

    #[test]
    fn test_sign_in_then_sign_out_scenario() {
        let mut machine = AuthMachine::new();

        // Failed attempt leaves the machine anonymous with the error set.
        machine.sign_in_failed("Email and pass inputs are empty!");
        assert!(!machine.is_authenticated());
        assert_eq!(machine.last_error(), "Email and pass inputs are empty!");

        // Success reaches Authenticated and clears the error.
        machine.signed_in(session());
        assert!(machine.is_authenticated());
        assert_eq!(machine.last_error(), "");

        // Sign-out returns to Anonymous with no error.
        machine.signed_out();
        assert!(!machine.is_authenticated());
        assert!(machine.session().is_none());
        assert_eq!(machine.last_error(), "");
    }

    #[test]
    fn test_error_persists_across_failed_attempts() {
        let mut machine = AuthMachine::new();
        machine.sign_in_failed("Pass input is empty!");
        machine.sign_in_failed("INVALID_PASSWORD");
        assert_eq!(machine.last_error(), "INVALID_PASSWORD");
        assert!(!machine.is_authenticated());
    }
}
