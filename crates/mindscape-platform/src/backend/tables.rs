//! Row stores over the REST table endpoints.
//!
//! Row-level security on the backend scopes every table to the signed-in
//! user; the `user_id` filters mirror it.

use std::rc::Rc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use mindscape_core::ports::{JournalStorePort, MessageStorePort, MoodStorePort, ProfileStorePort};
use mindscape_types::{
    Result,
    entry::{JournalEntry, JournalPatch, MoodEntry, NewJournalEntry, NewMoodEntry, Profile, ProfileUpdate},
    message::{ChatMessage, NewChatMessage},
};
use super::client::BackendClient;

pub const CHAT_MESSAGES: &str = "chat_messages";
pub const MOOD_ENTRIES: &str = "mood_entries";
pub const JOURNAL_ENTRIES: &str = "journal_entries";
pub const PROFILES: &str = "profiles";

pub struct RestTables {
    client: Rc<BackendClient>,
}

impl RestTables {
    pub fn new(client: Rc<BackendClient>) -> Self {
        Self { client }
    }
}

pub fn by_id(id: &str) -> String {
    format!("id=eq.{}", id)
}

/// The first `limit` messages of the user, oldest first. Past `limit` stored
/// messages, newer turns are not part of the loaded history.
pub fn chat_history_query(user_id: &str, limit: usize) -> String {
    format!("select=*&user_id=eq.{}&order=created_at.asc&limit={}", user_id, limit)
}

pub fn recent_moods_query(user_id: &str, limit: usize) -> String {
    format!("select=*&user_id=eq.{}&order=created_at.desc&limit={}", user_id, limit)
}

pub fn journal_query(user_id: &str) -> String {
    format!("select=*&user_id=eq.{}&order=created_at.desc", user_id)
}

#[async_trait(?Send)]
impl MessageStorePort for RestTables {
    async fn insert(&self, message: NewChatMessage) -> Result<ChatMessage> {
        self.client.insert(CHAT_MESSAGES, &message).await
    }

    async fn list(&self, user_id: &str, limit: usize) -> Result<Vec<ChatMessage>> {
        self.client
            .select(CHAT_MESSAGES, &chat_history_query(user_id, limit))
            .await
    }
}

#[async_trait(?Send)]
impl MoodStorePort for RestTables {
    async fn insert(&self, entry: NewMoodEntry) -> Result<MoodEntry> {
        self.client.insert(MOOD_ENTRIES, &entry).await
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<MoodEntry>> {
        self.client
            .select(MOOD_ENTRIES, &recent_moods_query(user_id, limit))
            .await
    }
}

#[async_trait(?Send)]
impl JournalStorePort for RestTables {
    async fn list(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        self.client.select(JOURNAL_ENTRIES, &journal_query(user_id)).await
    }

    async fn create(&self, entry: NewJournalEntry) -> Result<JournalEntry> {
        self.client.insert(JOURNAL_ENTRIES, &entry).await
    }

    async fn update(&self, id: &str, patch: JournalPatch) -> Result<()> {
        let body = json!({
            "title": patch.title,
            "content": patch.content,
            "updated_at": Utc::now(),
        });
        self.client.update(JOURNAL_ENTRIES, &by_id(id), &body).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(JOURNAL_ENTRIES, &by_id(id)).await
    }
}

#[async_trait(?Send)]
impl ProfileStorePort for RestTables {
    /// Profile rows are keyed by the user id
    async fn get(&self, user_id: &str) -> Result<Option<Profile>> {
        let query = format!("select=full_name,bio,theme_preference&{}", by_id(user_id));
        let rows: Vec<Profile> = self.client.select(PROFILES, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn update(&self, user_id: &str, update: ProfileUpdate) -> Result<()> {
        let body = json!({
            "full_name": update.full_name,
            "bio": update.bio,
            "theme_preference": update.theme_preference,
            "updated_at": Utc::now(),
        });
        self.client.update(PROFILES, &by_id(user_id), &body).await
    }
}
