use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub chat: ChatConfig,
    pub mood_history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            chat: ChatConfig::default(),
            mood_history_limit: 30,
        }
    }
}

impl AppConfig {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(|e| AppError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL; empty means run against the in-memory backend
    pub url: String,
    /// Public (anon) API key sent as `apikey`
    pub anon_key: String,
    /// Edge function that answers chat turns
    pub chat_function: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            chat_function: "ai-chat".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// How many stored messages a session loads
    pub history_limit: usize,
    /// Shown when the AI reply has no text
    pub fallback_reply: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            fallback_reply: FALLBACK_REPLY.to_string(),
        }
    }
}

pub const FALLBACK_REPLY: &str = "Sorry, I could not process that.";
