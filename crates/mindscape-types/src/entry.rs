//! Rows of the mood, journal and profile tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Mood ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Excited,
    Neutral,
    Sad,
    Anxious,
}

impl Mood {
    pub fn all() -> &'static [Mood] {
        &[Mood::Happy, Mood::Excited, Mood::Neutral, Mood::Sad, Mood::Anxious]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Excited => "Excited",
            Mood::Neutral => "Neutral",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Excited => "😄",
            Mood::Neutral => "😐",
            Mood::Sad => "😔",
            Mood::Anxious => "😟",
        }
    }

    pub fn from_label(label: &str) -> Option<Mood> {
        Mood::all().iter().copied().find(|m| m.label() == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    /// Stored as free text; rows written by older clients may not match the catalog
    pub mood: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    pub fn mood(&self) -> Option<Mood> {
        Mood::from_label(&self.mood)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMoodEntry {
    pub user_id: String,
    pub mood: String,
    pub note: Option<String>,
}

// ─── Journal ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub user_id: String,
    pub title: String,
    pub content: String,
}

/// Fields the journal editor may change on an existing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalPatch {
    pub title: String,
    pub content: String,
}

// ─── Profile ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub theme_preference: Option<ThemePreference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub bio: String,
    pub theme_preference: ThemePreference,
}
