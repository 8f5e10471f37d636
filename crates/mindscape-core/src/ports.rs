//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `mindscape-core` (pure Rust).
//! Implementations live in `mindscape-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use serde_json::Value;
use mindscape_types::{
    Result,
    entry::{JournalEntry, JournalPatch, MoodEntry, NewJournalEntry, NewMoodEntry, Profile, ProfileUpdate},
    message::{ChatMessage, ChatTurn, NewChatMessage},
    session::{AuthChange, AuthSession},
};

// ─── Auth Port ───────────────────────────────────────────────

pub type AuthListener = Box<dyn Fn(&AuthChange)>;

#[async_trait(?Send)]
pub trait AuthPort {
    /// The current credential, if any
    async fn current_session(&self) -> Result<Option<AuthSession>>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Creates an account; returns a session when the backend signs the user in directly
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Option<AuthSession>>;

    async fn sign_out(&self) -> Result<()>;

    /// Register for sign-in/sign-out notifications.
    /// The listener stays registered until the returned handle is torn down.
    fn subscribe(&self, listener: AuthListener) -> Subscription;
}

/// Teardown handle for an auth subscription.
///
/// Calling `unsubscribe` or dropping the handle runs the teardown once.
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A handle with nothing to tear down
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub fn is_active(&self) -> bool {
        self.teardown.is_some()
    }

    pub fn unsubscribe(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

// ─── Message Store Port ──────────────────────────────────────

#[async_trait(?Send)]
pub trait MessageStorePort {
    /// Insert one message and return the stored row
    async fn insert(&self, message: NewChatMessage) -> Result<ChatMessage>;

    /// Up to `limit` messages of `user_id`, ordered by `created_at` ascending.
    /// Which `limit` messages is the adapter's choice; the hosted one returns the oldest.
    async fn list(&self, user_id: &str, limit: usize) -> Result<Vec<ChatMessage>>;
}

// ─── AI Invoker Port ─────────────────────────────────────────

#[async_trait(?Send)]
pub trait AiInvokerPort {
    /// Send the conversation and return the raw reply payload.
    /// Reply extraction is the caller's concern.
    async fn invoke(&self, turns: &[ChatTurn]) -> Result<Value>;
}

// ─── Mood / Journal / Profile Ports ──────────────────────────

#[async_trait(?Send)]
pub trait MoodStorePort {
    async fn insert(&self, entry: NewMoodEntry) -> Result<MoodEntry>;

    /// Most recent `limit` entries, newest first
    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<MoodEntry>>;
}

#[async_trait(?Send)]
pub trait JournalStorePort {
    /// All entries, newest first
    async fn list(&self, user_id: &str) -> Result<Vec<JournalEntry>>;
    async fn create(&self, entry: NewJournalEntry) -> Result<JournalEntry>;
    async fn update(&self, id: &str, patch: JournalPatch) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait(?Send)]
pub trait ProfileStorePort {
    /// At most one row; `None` when the profile has not been created
    async fn get(&self, user_id: &str) -> Result<Option<Profile>>;
    async fn update(&self, user_id: &str, update: ProfileUpdate) -> Result<()>;
}
