//! Password auth against the backend's auth service.
//!
//! The session survives reloads in a key-value store; restoring it does not
//! touch the network. An expired session is dropped instead of restored.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::{json, Value};

use mindscape_core::ports::{AuthListener, AuthPort, Subscription};
use mindscape_types::{
    AppError, Result,
    session::{AuthChange, AuthSession, UserIdentity},
};
use crate::listeners::AuthListeners;
use crate::storage::{load_json, save_json, KeyValueStore};
use super::client::{failure_message, network, BackendClient};

pub const SESSION_KEY: &str = "mindscape:auth";

pub struct RestAuth {
    client: Rc<BackendClient>,
    store: Rc<dyn KeyValueStore>,
    session: RefCell<Option<AuthSession>>,
    listeners: AuthListeners,
}

impl RestAuth {
    pub fn new(client: Rc<BackendClient>, store: Rc<dyn KeyValueStore>) -> Self {
        let session = match load_json::<AuthSession>(store.as_ref(), SESSION_KEY) {
            Ok(Some(session)) if session.is_expired(Utc::now()) => {
                log::info!("Stored session for {} has expired", session.user.id);
                forget(store.as_ref());
                None
            }
            Ok(session) => session,
            Err(e) => {
                log::warn!("Discarding stored session: {}", e);
                forget(store.as_ref());
                None
            }
        };
        client.set_access_token(session.as_ref().map(|s| s.access_token.clone()));

        Self {
            client,
            store,
            session: RefCell::new(session),
            listeners: AuthListeners::new(),
        }
    }

    fn establish(&self, session: AuthSession) {
        if let Err(e) = save_json(self.store.as_ref(), SESSION_KEY, &session) {
            log::warn!("Could not persist session: {}", e);
        }
        self.client.set_access_token(Some(session.access_token.clone()));
        let user = session.user.clone();
        *self.session.borrow_mut() = Some(session);
        log::info!("Signed in as {}", user.id);
        self.listeners.broadcast(&AuthChange::SignedIn(user));
    }

    fn clear(&self) {
        forget(self.store.as_ref());
        self.client.set_access_token(None);
        *self.session.borrow_mut() = None;
        self.listeners.broadcast(&AuthChange::SignedOut);
    }

    async fn post_auth(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .authorize(Request::post(&self.client.auth_url(path)))
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| AppError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(network)?;

        if !response.ok() {
            return Err(AppError::Auth(failure_message(response).await));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))
    }
}

fn forget(store: &dyn KeyValueStore) {
    if let Err(e) = store.remove(SESSION_KEY) {
        log::warn!("Could not clear stored session: {}", e);
    }
}

#[async_trait(?Send)]
impl AuthPort for RestAuth {
    async fn current_session(&self) -> Result<Option<AuthSession>> {
        let session = self.session.borrow().clone();
        match session {
            Some(session) if session.is_expired(Utc::now()) => {
                log::info!("Session for {} has expired", session.user.id);
                self.clear();
                Ok(None)
            }
            session => Ok(session),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let body = json!({ "email": email, "password": password });
        let data = self.post_auth("token?grant_type=password", &body).await?;
        let session: AuthSession = serde_json::from_value::<ApiSession>(data)?.into();
        self.establish(session.clone());
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Option<AuthSession>> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "full_name": full_name },
        });
        let data = self.post_auth("signup", &body).await?;

        match parse_sign_up(data)? {
            Some(session) => {
                self.establish(session.clone());
                Ok(Some(session))
            }
            None => {
                log::info!("Sign-up for {} awaits email confirmation", email);
                Ok(None)
            }
        }
    }

    /// The local session is cleared even if the backend call fails
    async fn sign_out(&self) -> Result<()> {
        let result = if self.client.has_access_token() {
            match self
                .client
                .authorize(Request::post(&self.client.auth_url("logout")))
                .send()
                .await
            {
                Ok(response) if response.ok() => Ok(()),
                Ok(response) => Err(AppError::Auth(failure_message(response).await)),
                Err(e) => Err(network(e)),
            }
        } else {
            Ok(())
        };
        self.clear();
        result
    }

    fn subscribe(&self, listener: AuthListener) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

// ─── API response types (private) ────────────────────────────

#[derive(Deserialize)]
struct ApiSession {
    access_token: String,
    /// Unix seconds
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: ApiUser,
}

#[derive(Deserialize)]
struct ApiUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
}

/// With email confirmation on, sign-up answers with the bare user object
#[derive(Deserialize)]
struct ApiSignUp {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    user: Option<ApiUser>,
}

impl From<ApiUser> for UserIdentity {
    fn from(user: ApiUser) -> Self {
        let full_name = user
            .user_metadata
            .get("full_name")
            .and_then(Value::as_str)
            .map(str::to_string);
        UserIdentity {
            id: user.id,
            email: user.email,
            full_name,
        }
    }
}

impl From<ApiSession> for AuthSession {
    fn from(session: ApiSession) -> Self {
        AuthSession {
            access_token: session.access_token,
            expires_at: expiry(session.expires_at, session.expires_in),
            user: session.user.into(),
        }
    }
}

/// `None` when the account still needs confirming
pub fn parse_sign_up(data: Value) -> Result<Option<AuthSession>> {
    let parsed: ApiSignUp = serde_json::from_value(data)?;
    Ok(match (parsed.access_token, parsed.user) {
        (Some(access_token), Some(user)) => Some(AuthSession {
            access_token,
            expires_at: expiry(parsed.expires_at, parsed.expires_in),
            user: user.into(),
        }),
        _ => None,
    })
}

/// Prefers the absolute timestamp; falls back to a lifetime counted from now
fn expiry(expires_at: Option<i64>, expires_in: Option<i64>) -> Option<DateTime<Utc>> {
    match (expires_at, expires_in) {
        (Some(at), _) => Utc.timestamp_opt(at, 0).single(),
        (None, Some(secs)) => Some(Utc::now() + Duration::seconds(secs)),
        (None, None) => None,
    }
}
