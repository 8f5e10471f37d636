//! Mood tracker page controller.
//!
//! Bound to one user at a time. A load or write that finishes after `close`
//! or a newer `load` leaves the current entries alone.

use std::cell::RefCell;
use std::rc::Rc;

use mindscape_types::{
    entry::{Mood, MoodEntry, NewMoodEntry},
    event::{AppEvent, Notification},
    session::UserIdentity,
};
use crate::event_bus::EventBus;
use crate::flight::{Epoch, InFlight, Outcome};
use crate::ports::MoodStorePort;

pub struct MoodTracker {
    store: Rc<dyn MoodStorePort>,
    event_bus: EventBus,
    limit: usize,
    user: RefCell<Option<UserIdentity>>,
    entries: RefCell<Vec<MoodEntry>>,
    flight: InFlight,
    epoch: Epoch,
}

impl MoodTracker {
    pub fn new(store: Rc<dyn MoodStorePort>, event_bus: EventBus, limit: usize) -> Self {
        Self {
            store,
            event_bus,
            limit,
            user: RefCell::new(None),
            entries: RefCell::new(Vec::new()),
            flight: InFlight::new(),
            epoch: Epoch::default(),
        }
    }

    pub async fn load(&self, user: UserIdentity) {
        let epoch = self.rebind(Some(user.clone()));
        self.refresh(&user, epoch).await;
    }

    pub async fn log_mood(&self, mood: Mood, note: &str) -> Outcome {
        let Some(user) = self.user.borrow().clone() else {
            return Outcome::Skipped;
        };
        let Some(_guard) = self.flight.try_begin() else {
            return Outcome::Busy;
        };
        let epoch = self.epoch.current();

        let note = note.trim();
        let entry = NewMoodEntry {
            user_id: user.id.clone(),
            mood: mood.label().to_string(),
            note: (!note.is_empty()).then(|| note.to_string()),
        };

        let result = self.store.insert(entry).await;
        if !self.epoch.is_current(epoch) {
            log::info!("Dropping mood save result for {}: session changed", user.id);
            return Outcome::Skipped;
        }

        match result {
            Ok(_) => {
                self.event_bus
                    .notify(Notification::info("Mood logged!", "Your mood has been saved."));
                self.refresh(&user, epoch).await;
                Outcome::Done
            }
            Err(e) => {
                log::error!("Error saving mood: {}", e);
                self.event_bus
                    .notify(Notification::error("Failed to save mood. Please try again."));
                Outcome::Failed(e)
            }
        }
    }

    pub fn entries(&self) -> Vec<MoodEntry> {
        self.entries.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.flight.is_busy()
    }

    pub fn close(&self) {
        self.rebind(None);
    }

    fn rebind(&self, user: Option<UserIdentity>) -> u64 {
        self.flight.reset();
        *self.user.borrow_mut() = user;
        self.entries.borrow_mut().clear();
        self.epoch.advance()
    }

    async fn refresh(&self, user: &UserIdentity, epoch: u64) {
        let entries = match self.store.recent(&user.id, self.limit).await {
            Ok(mut rows) => {
                rows.truncate(self.limit);
                rows
            }
            Err(e) => {
                log::error!("Error loading mood entries: {}", e);
                Vec::new()
            }
        };
        if !self.epoch.is_current(epoch) {
            log::debug!("Discarding mood entries for {}: session changed", user.id);
            return;
        }
        *self.entries.borrow_mut() = entries;
        self.event_bus.emit(AppEvent::EntriesChanged);
    }
}
