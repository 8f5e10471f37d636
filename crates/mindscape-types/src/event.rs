use serde::{Deserialize, Serialize};

/// Events emitted by the page controllers.
/// The UI drains these each frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// A user-visible toast
    Notify(Notification),

    /// The chat transcript was appended to or reconciled
    TranscriptChanged,

    /// A list page (mood, journal) reloaded its rows
    EntriesChanged,

    /// The profile form was loaded from the backend
    ProfileLoaded,

    /// Sign-in state flipped
    AuthChanged { signed_in: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    /// Titled "Error", as every failed write is
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}
