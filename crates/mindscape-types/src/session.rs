use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user, as far as the pages care
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// From the account's user metadata, set at sign-up
    #[serde(default)]
    pub full_name: Option<String>,
}

/// A credential issued by the backend's auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    /// When the access token stops being accepted; `None` if never
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: UserIdentity,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Whether a page may run at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// No valid credential; the caller routes to sign-in
    Unauthenticated,
    Authenticated(UserIdentity),
}

impl AuthState {
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Unauthenticated => None,
        }
    }
}

/// Pushed to auth subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChange {
    SignedIn(UserIdentity),
    SignedOut,
}
