use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Opaque message identifier.
///
/// Server rows carry the id the backend assigned; optimistic entries carry a
/// client-generated UUID until the insert is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Fresh client-side identity for an optimistic entry
    pub fn provisional() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chat message as stored in the `chat_messages` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::provisional(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::provisional(Role::Assistant, content)
    }

    fn provisional(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::provisional(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn as_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Row to insert; the backend assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChatMessage {
    pub user_id: String,
    pub role: Role,
    pub content: String,
}

/// Role/content pair handed to the AI function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Durability of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delivery {
    /// Shown locally, insert not yet answered
    Pending,
    /// Insert succeeded; id and timestamp are the server's
    Confirmed,
    /// Insert failed; the entry stays visible but is not stored
    Failed,
}

/// One line of the visible conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub message: ChatMessage,
    pub delivery: Delivery,
}

impl TranscriptEntry {
    pub fn pending(message: ChatMessage) -> Self {
        Self { message, delivery: Delivery::Pending }
    }

    pub fn confirmed(message: ChatMessage) -> Self {
        Self { message, delivery: Delivery::Confirmed }
    }

    pub fn role(&self) -> Role {
        self.message.role
    }

    pub fn content(&self) -> &str {
        &self.message.content
    }
}
