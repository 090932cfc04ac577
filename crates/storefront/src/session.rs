//! Session state manager.
//!
//! The session lives on the server and rides along in the HTTP client's
//! cookie store. This module only mirrors whether that session is logged in,
//! and who it belongs to:
//!
//! ```text
//! Anonymous ──login ok──▶ Authenticated(identity)
//!     ▲                          │
//!     └────────logout ok─────────┘
//! ```
//!
//! Failed calls leave the state alone. A failed logout therefore keeps the
//! stale `Authenticated` state, and the failure is surfaced as a notice.

use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use threadline_core::Identity;

use crate::api::{ApiClient, ApiError, SessionCheck, Transport};
use crate::notify::NotificationCenter;

pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const REGISTER_SUCCESS: &str = "Registration successful! Please login.";
pub const LOGOUT_SUCCESS: &str = "Logged out successfully!";

// =============================================================================
// Inputs
// =============================================================================

/// Login form input.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Registration form input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub phone: Option<String>,
}

// =============================================================================
// State
// =============================================================================

/// Client-side view of the server session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    /// State implied by a session check.
    ///
    /// Only `logged_in: true` together with a user counts as authenticated.
    #[must_use]
    pub fn from_check(check: SessionCheck) -> Self {
        check
            .into_identity()
            .map_or(Self::Anonymous, Self::Authenticated)
    }

    /// The logged-in identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

// =============================================================================
// SessionManager
// =============================================================================

/// Owns the session state and the auth calls that change it.
pub struct SessionManager<T> {
    api: ApiClient<T>,
    state: watch::Sender<SessionState>,
    notices: NotificationCenter,
    bootstrapped: AtomicBool,
}

impl<T: Transport> SessionManager<T> {
    #[must_use]
    pub fn new(api: ApiClient<T>, notices: NotificationCenter) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self {
            api,
            state,
            notices,
            bootstrapped: AtomicBool::new(false),
        }
    }

    /// The current session state.
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Observe session state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Ask the server whether the ambient session is logged in.
    ///
    /// Runs once per manager; later calls return the current state without a
    /// request. A failed check leaves the session anonymous and is only
    /// logged.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> SessionState {
        if self.bootstrapped.swap(true, Ordering::AcqRel) {
            return self.current();
        }

        match self.api.check_session().await {
            Ok(check) => {
                let state = SessionState::from_check(check);
                info!(authenticated = state.is_authenticated(), "Session bootstrapped");
                self.state.send_replace(state.clone());
                state
            }
            Err(e) => {
                warn!(error = %e, "Session check failed, staying anonymous");
                self.current()
            }
        }
    }

    /// Log in and publish the authenticated state.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the call fails; the state is unchanged and the
    /// message is published as an error notice.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: Credentials) -> Result<Identity, ApiError> {
        match self.api.login(credentials).await {
            Ok(receipt) => {
                info!(user_id = %receipt.user.id, "Logged in");
                self.state
                    .send_replace(SessionState::Authenticated(receipt.user.clone()));
                self.notices.success(LOGIN_SUCCESS);
                Ok(receipt.user)
            }
            Err(e) => {
                self.notices.error(e.message());
                Err(e)
            }
        }
    }

    /// Create an account. Never changes the session state.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the call fails; the message is published as an
    /// error notice.
    #[instrument(skip_all)]
    pub async fn register(&self, registration: Registration) -> Result<(), ApiError> {
        match self.api.register(registration).await {
            Ok(()) => {
                self.notices.success(REGISTER_SUCCESS);
                Ok(())
            }
            Err(e) => {
                self.notices.error(e.message());
                Err(e)
            }
        }
    }

    /// End the server session and publish the anonymous state.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the call fails; the previous state is kept and
    /// the message is published as an error notice.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        match self.api.logout().await {
            Ok(()) => {
                info!("Logged out");
                self.state.send_replace(SessionState::Anonymous);
                self.notices.success(LOGOUT_SUCCESS);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Logout failed, keeping current session state");
                self.notices.error(e.message());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::api::testing::ScriptedTransport;

    fn user() -> Value {
        json!({"id": 5, "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"})
    }

    fn manager(transport: ScriptedTransport) -> (SessionManager<ScriptedTransport>, NotificationCenter) {
        let notices = NotificationCenter::default();
        (
            SessionManager::new(ApiClient::new(transport), notices.clone()),
            notices,
        )
    }

    fn messages(notices: &NotificationCenter) -> Vec<String> {
        notices.active().into_iter().map(|n| n.message).collect()
    }

    async fn logged_in() -> (SessionManager<ScriptedTransport>, NotificationCenter) {
        let transport = ScriptedTransport::new();
        transport.reply("check", json!({"success": true, "logged_in": true, "user": user()}));
        let (session, notices) = manager(transport);
        session.bootstrap().await;
        (session, notices)
    }

    #[tokio::test]
    async fn test_bootstrap_authenticates_from_check() {
        let (session, notices) = logged_in().await;
        assert_eq!(session.current().identity().unwrap().display_name(), "Ada");
        assert!(notices.active().is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_runs_once() {
        let transport = ScriptedTransport::new();
        transport
            .reply("check", json!({"success": true, "logged_in": false}))
            .reply("check", json!({"success": true, "logged_in": true, "user": user()}));
        let (session, _) = manager(transport);

        assert_eq!(session.bootstrap().await, SessionState::Anonymous);
        assert_eq!(session.bootstrap().await, SessionState::Anonymous);
        assert_eq!(session.api.transport().actions(), vec!["check"]);
    }

    #[tokio::test]
    async fn test_bootstrap_failure_is_silent() {
        let transport = ScriptedTransport::new();
        transport.fail_network("check");
        let (session, notices) = manager(transport);

        assert_eq!(session.bootstrap().await, SessionState::Anonymous);
        assert!(notices.active().is_empty());
    }

    #[tokio::test]
    async fn test_login_success_publishes_identity() {
        let transport = ScriptedTransport::new();
        transport.reply("login", json!({"success": true, "user": user()}));
        let (session, notices) = manager(transport);
        let mut rx = session.subscribe();

        let identity = session
            .login(Credentials::new("ada@example.com", "correct horse"))
            .await
            .unwrap();

        assert_eq!(identity.first_name, "Ada");
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());
        assert_eq!(messages(&notices), vec![LOGIN_SUCCESS]);
    }

    #[tokio::test]
    async fn test_login_failure_keeps_state() {
        let transport = ScriptedTransport::new();
        transport.reply("login", json!({"success": false, "message": "Invalid email or password"}));
        let (session, notices) = manager(transport);

        let err = session
            .login(Credentials::new("ada@example.com", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Invalid email or password");
        assert_eq!(session.current(), SessionState::Anonymous);
        assert_eq!(messages(&notices), vec!["Invalid email or password"]);
        assert_eq!(session.api.transport().actions(), vec!["login"]);
    }

    #[tokio::test]
    async fn test_register_never_changes_state() {
        let transport = ScriptedTransport::new();
        transport.reply("register", json!({"success": true, "user_id": 9}));
        let (session, notices) = manager(transport);

        session
            .register(Registration {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                username: "grace".to_string(),
                email: "grace@example.com".to_string(),
                password: SecretString::from("cobol-forever".to_string()),
                phone: None,
            })
            .await
            .unwrap();

        assert_eq!(session.current(), SessionState::Anonymous);
        assert_eq!(messages(&notices), vec![REGISTER_SUCCESS]);
    }

    #[tokio::test]
    async fn test_logout_success_always_anonymous() {
        let (session, notices) = logged_in().await;
        session
            .api
            .transport()
            .reply("logout", json!({"success": true}));

        session.logout().await.unwrap();
        assert_eq!(session.current(), SessionState::Anonymous);
        assert_eq!(messages(&notices), vec![LOGOUT_SUCCESS]);
    }

    #[tokio::test]
    async fn test_logout_success_from_anonymous() {
        let transport = ScriptedTransport::new();
        transport.reply("logout", json!({"success": true}));
        let (session, notices) = manager(transport);
        assert_eq!(session.current(), SessionState::Anonymous);

        session.logout().await.unwrap();
        assert_eq!(session.current(), SessionState::Anonymous);
        assert_eq!(messages(&notices), vec![LOGOUT_SUCCESS]);
        assert_eq!(session.api.transport().actions(), vec!["logout"]);
    }

    #[tokio::test]
    async fn test_logout_failure_keeps_stale_session() {
        let (session, notices) = logged_in().await;
        let before = session.current();

        // Unscripted: the network is down.
        let err = session.logout().await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(session.current(), before);
        assert_eq!(messages(&notices), vec!["Network error"]);
    }

    #[test]
    fn test_from_check_requires_user() {
        let check: SessionCheck = serde_json::from_value(json!({"logged_in": true})).unwrap();
        assert_eq!(SessionState::from_check(check), SessionState::Anonymous);
    }
}
