//! In-memory backend.
//!
//! Stands in for the hosted project when no backend URL is configured, and
//! backs the adapter tests. Nothing survives a page reload. Sign-up signs the
//! new account in directly.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use mindscape_core::ports::*;
use mindscape_types::{
    AppError, Result,
    entry::{JournalEntry, JournalPatch, MoodEntry, NewJournalEntry, NewMoodEntry, Profile, ProfileUpdate},
    message::{ChatMessage, ChatTurn, MessageId, NewChatMessage},
    session::{AuthChange, AuthSession, UserIdentity},
};
use crate::listeners::AuthListeners;

pub const OFFLINE_REPLY: &str = "I'm offline right now, so I can't give you a proper answer. \
    Writing down how you feel in your journal can help until I'm back.";

struct Account {
    password: String,
    user: UserIdentity,
}

/// Rows are kept with their owner's user id
#[derive(Default)]
pub struct OfflineBackend {
    accounts: RefCell<HashMap<String, Account>>,
    session: RefCell<Option<AuthSession>>,
    listeners: AuthListeners,
    messages: RefCell<Vec<(String, ChatMessage)>>,
    moods: RefCell<Vec<(String, MoodEntry)>>,
    journal: RefCell<Vec<(String, JournalEntry)>>,
    profiles: RefCell<HashMap<String, Profile>>,
}

impl OfflineBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn start_session(&self, user: UserIdentity) -> AuthSession {
        let session = AuthSession {
            access_token: format!("offline-{}", Uuid::new_v4()),
            expires_at: None,
            user: user.clone(),
        };
        *self.session.borrow_mut() = Some(session.clone());
        self.listeners.broadcast(&AuthChange::SignedIn(user));
        session
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ─── Auth ────────────────────────────────────────────────────

#[async_trait(?Send)]
impl AuthPort for OfflineBackend {
    async fn current_session(&self) -> Result<Option<AuthSession>> {
        Ok(self.session.borrow().clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let user = {
            let accounts = self.accounts.borrow();
            match accounts.get(email) {
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(AppError::Auth("Invalid login credentials".to_string())),
            }
        };
        Ok(self.start_session(user))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Option<AuthSession>> {
        if self.accounts.borrow().contains_key(email) {
            return Err(AppError::Auth("User already registered".to_string()));
        }

        let full_name = (!full_name.is_empty()).then(|| full_name.to_string());
        let user = UserIdentity {
            id: new_id(),
            email: Some(email.to_string()),
            full_name: full_name.clone(),
        };
        self.accounts.borrow_mut().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        // The hosted project creates the profile row on sign-up
        self.profiles.borrow_mut().insert(
            user.id.clone(),
            Profile {
                full_name,
                ..Profile::default()
            },
        );

        Ok(Some(self.start_session(user)))
    }

    async fn sign_out(&self) -> Result<()> {
        *self.session.borrow_mut() = None;
        self.listeners.broadcast(&AuthChange::SignedOut);
        Ok(())
    }

    fn subscribe(&self, listener: AuthListener) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

// ─── Chat messages ───────────────────────────────────────────

#[async_trait(?Send)]
impl MessageStorePort for OfflineBackend {
    async fn insert(&self, message: NewChatMessage) -> Result<ChatMessage> {
        let row = ChatMessage {
            id: MessageId(new_id()),
            role: message.role,
            content: message.content,
            created_at: Utc::now(),
        };
        self.messages
            .borrow_mut()
            .push((message.user_id, row.clone()));
        Ok(row)
    }

    async fn list(&self, user_id: &str, limit: usize) -> Result<Vec<ChatMessage>> {
        let mut rows: Vec<ChatMessage> = self
            .messages
            .borrow()
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, row)| row.clone())
            .collect();
        rows.sort_by_key(|row| row.created_at);
        rows.truncate(limit);
        Ok(rows)
    }
}

// ─── Moods ───────────────────────────────────────────────────

#[async_trait(?Send)]
impl MoodStorePort for OfflineBackend {
    async fn insert(&self, entry: NewMoodEntry) -> Result<MoodEntry> {
        let row = MoodEntry {
            id: new_id(),
            mood: entry.mood,
            note: entry.note,
            created_at: Utc::now(),
        };
        self.moods.borrow_mut().push((entry.user_id, row.clone()));
        Ok(row)
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<MoodEntry>> {
        let mut rows: Vec<MoodEntry> = self
            .moods
            .borrow()
            .iter()
            .rev()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, row)| row.clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }
}

// ─── Journal ─────────────────────────────────────────────────

#[async_trait(?Send)]
impl JournalStorePort for OfflineBackend {
    async fn list(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        let mut rows: Vec<JournalEntry> = self
            .journal
            .borrow()
            .iter()
            .rev()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, row)| row.clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create(&self, entry: NewJournalEntry) -> Result<JournalEntry> {
        let now = Utc::now();
        let row = JournalEntry {
            id: new_id(),
            title: entry.title,
            content: entry.content,
            created_at: now,
            updated_at: now,
        };
        self.journal.borrow_mut().push((entry.user_id, row.clone()));
        Ok(row)
    }

    /// Unknown ids match no row and change nothing, as a filtered PATCH would
    async fn update(&self, id: &str, patch: JournalPatch) -> Result<()> {
        if let Some((_, row)) = self
            .journal
            .borrow_mut()
            .iter_mut()
            .find(|(_, row)| row.id == id)
        {
            row.title = patch.title;
            row.content = patch.content;
            row.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.journal.borrow_mut().retain(|(_, row)| row.id != id);
        Ok(())
    }
}

// ─── Profiles ────────────────────────────────────────────────

#[async_trait(?Send)]
impl ProfileStorePort for OfflineBackend {
    async fn get(&self, user_id: &str) -> Result<Option<Profile>> {
        Ok(self.profiles.borrow().get(user_id).cloned())
    }

    async fn update(&self, user_id: &str, update: ProfileUpdate) -> Result<()> {
        self.profiles.borrow_mut().insert(
            user_id.to_string(),
            Profile {
                full_name: Some(update.full_name),
                bio: Some(update.bio),
                theme_preference: Some(update.theme_preference),
            },
        );
        Ok(())
    }
}

// ─── AI function ─────────────────────────────────────────────

/// Answers every conversation with the same note, in the hosted function's
/// response shape
pub struct OfflineInvoker;

#[async_trait(?Send)]
impl AiInvokerPort for OfflineInvoker {
    async fn invoke(&self, turns: &[ChatTurn]) -> Result<Value> {
        log::debug!("Offline reply to {} turns", turns.len());
        Ok(json!({
            "choices": [{ "message": { "role": "assistant", "content": OFFLINE_REPLY } }]
        }))
    }
}
