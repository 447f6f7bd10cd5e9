//! The logged-in session.
//!
//! The login flow writes the user under `user` (JSON) and the bearer token
//! under `token` (raw string). Both must be present to place an order; the
//! navigation bar only looks at the user.

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use mobile_shop_core::{Navigation, User};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::storage::{Persistence, StorageError, keys};

/// An authenticated user and the token used for order submission.
#[derive(Clone)]
pub struct Session {
    pub user: User,
    pub token: SecretString,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.email)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// What the navigation bar should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    LoggedIn { display_name: String },
    LoggedOut,
}

/// Reads and writes the persisted session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    persistence: Persistence,
}

impl SessionStore {
    #[must_use]
    pub const fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }

    /// The current session, if both user and token are stored.
    ///
    /// Unreadable storage is logged and treated as logged out.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        let user = self.stored_user()?;
        let token = match self.persistence.get_raw(keys::TOKEN) {
            Ok(token) => token.filter(|t| !t.trim().is_empty())?,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                return None;
            }
        };
        Some(Session {
            user,
            token: SecretString::from(token),
        })
    }

    /// Navigation bar state, driven by the stored user alone.
    #[must_use]
    pub fn nav_state(&self) -> NavState {
        self.stored_user()
            .map_or(NavState::LoggedOut, |user| NavState::LoggedIn {
                display_name: user.display_name().to_string(),
            })
    }

    fn stored_user(&self) -> Option<User> {
        match self.persistence.get_json::<User>(keys::USER) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Failed to read stored user");
                None
            }
        }
    }

    /// Persist a session produced by a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if either value cannot be written.
    pub fn save(&self, user: &User, token: &str) -> Result<Session, StorageError> {
        let session = Session {
            user: user.clone(),
            token: SecretString::from(token),
        };
        self.persistence.set_json(keys::USER, &session.user)?;
        self.persistence
            .set_raw(keys::TOKEN, session.token.expose_secret())?;
        set_sentry_user(&session.user.email);
        info!("Session saved");
        Ok(session)
    }

    /// Forget the session and send the user home.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored values cannot be removed.
    pub fn logout(&self) -> Result<Navigation, StorageError> {
        self.persistence.remove(keys::USER)?;
        self.persistence.remove(keys::TOKEN)?;
        clear_sentry_user();
        info!("Logged out");
        Ok(Navigation::Home)
    }
}
