//! Dashboard: greeting, feature catalog, sign-out.

use std::rc::Rc;

use mindscape_types::{event::Notification, session::UserIdentity};
use crate::event_bus::EventBus;
use crate::ports::AuthPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Assistant,
    MoodTracker,
    Journal,
    Goals,
}

impl Feature {
    pub fn all() -> &'static [Feature] {
        &[Feature::Assistant, Feature::MoodTracker, Feature::Journal, Feature::Goals]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Feature::Assistant => "AI Assistant",
            Feature::MoodTracker => "Mood Tracker",
            Feature::Journal => "Journal",
            Feature::Goals => "Goals",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Feature::Assistant => "Chat with your wellness companion",
            Feature::MoodTracker => "Track and visualize your emotions",
            Feature::Journal => "Reflect and document your thoughts",
            Feature::Goals => "Set and achieve your wellness goals",
        }
    }
}

pub fn greeting(user: &UserIdentity) -> String {
    let name = user
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("friend");
    format!("Welcome back, {}!", name)
}

pub struct Dashboard {
    auth: Rc<dyn AuthPort>,
    event_bus: EventBus,
}

impl Dashboard {
    pub fn new(auth: Rc<dyn AuthPort>, event_bus: EventBus) -> Self {
        Self { auth, event_bus }
    }

    /// The auth subscription reports the state change; this only says goodbye.
    pub async fn sign_out(&self) {
        if let Err(e) = self.auth.sign_out().await {
            log::error!("Error signing out: {}", e);
        }
        self.event_bus
            .notify(Notification::info("Signed out", "See you soon!"));
    }
}
