//! Session gate: decides whether a page may run.
//!
//! There are exactly two states: no credential (the caller routes to sign-in)
//! or an authenticated user whose id scopes every row the pages touch.

use std::rc::Rc;

use mindscape_types::{
    event::{AppEvent, Notification},
    session::{AuthChange, AuthState},
};
use crate::event_bus::EventBus;
use crate::ports::{AuthPort, Subscription};

pub struct SessionGate {
    auth: Rc<dyn AuthPort>,
    event_bus: EventBus,
}

impl SessionGate {
    pub fn new(auth: Rc<dyn AuthPort>, event_bus: EventBus) -> Self {
        Self { auth, event_bus }
    }

    /// Look up the current credential. A failed lookup counts as signed out.
    pub async fn resolve(&self) -> AuthState {
        match self.auth.current_session().await {
            Ok(Some(session)) => AuthState::Authenticated(session.user),
            Ok(None) => AuthState::Unauthenticated,
            Err(e) => {
                log::error!("Error looking up session: {}", e);
                AuthState::Unauthenticated
            }
        }
    }

    /// Forward sign-in/sign-out to the event bus until the handle is dropped.
    pub fn watch(&self) -> Subscription {
        let bus = self.event_bus.clone();
        self.auth.subscribe(Box::new(move |change| {
            let signed_in = matches!(change, AuthChange::SignedIn(_));
            log::debug!("Auth state changed, signed_in={}", signed_in);
            bus.emit(AppEvent::AuthChanged { signed_in });
        }))
    }

    /// Returns true when a session was obtained
    pub async fn sign_in(&self, email: &str, password: &str) -> bool {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return false;
        }
        match self.auth.sign_in_with_password(email, password).await {
            Ok(_) => true,
            Err(e) => {
                log::error!("Error signing in: {}", e);
                self.event_bus.notify(Notification::error(e.to_string()));
                false
            }
        }
    }

    /// Returns true when the account exists and is signed in
    pub async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> bool {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return false;
        }
        match self.auth.sign_up(email, password, full_name.trim()).await {
            Ok(Some(_)) => true,
            Ok(None) => {
                self.event_bus.notify(Notification::info(
                    "Check your email",
                    "Confirm your address to finish signing up.",
                ));
                false
            }
            Err(e) => {
                log::error!("Error signing up: {}", e);
                self.event_bus.notify(Notification::error(e.to_string()));
                false
            }
        }
    }
}
