//! Journal page controller.
//!
//! Same user binding as the mood tracker: results that arrive after `close`
//! or a newer `load` are dropped.

use std::cell::RefCell;
use std::rc::Rc;

use mindscape_types::{
    entry::{JournalEntry, JournalPatch, NewJournalEntry},
    event::{AppEvent, Notification},
    session::UserIdentity,
};
use crate::event_bus::EventBus;
use crate::flight::{Epoch, InFlight, Outcome};
use crate::ports::JournalStorePort;

/// Editor contents. `id` is set when editing an existing entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalDraft {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
}

impl JournalDraft {
    pub fn edit(entry: &JournalEntry) -> Self {
        Self {
            id: Some(entry.id.clone()),
            title: entry.title.clone(),
            content: entry.content.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

pub struct Journal {
    store: Rc<dyn JournalStorePort>,
    event_bus: EventBus,
    user: RefCell<Option<UserIdentity>>,
    entries: RefCell<Vec<JournalEntry>>,
    flight: InFlight,
    epoch: Epoch,
}

impl Journal {
    pub fn new(store: Rc<dyn JournalStorePort>, event_bus: EventBus) -> Self {
        Self {
            store,
            event_bus,
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

    pub async fn save(&self, draft: &JournalDraft) -> Outcome {
        if !draft.is_complete() {
            return Outcome::Skipped;
        }
        let Some(user) = self.user.borrow().clone() else {
            return Outcome::Skipped;
        };
        let Some(_guard) = self.flight.try_begin() else {
            return Outcome::Busy;
        };
        let epoch = self.epoch.current();

        let title = draft.title.trim().to_string();
        let content = draft.content.trim().to_string();

        let (result, done_title) = match &draft.id {
            Some(id) => (
                self.store.update(id, JournalPatch { title, content }).await,
                "Entry updated!",
            ),
            None => {
                let entry = NewJournalEntry {
                    user_id: user.id.clone(),
                    title,
                    content,
                };
                (self.store.create(entry).await.map(|_| ()), "Entry created!")
            }
        };
        if !self.epoch.is_current(epoch) {
            log::info!("Dropping journal save result for {}: session changed", user.id);
            return Outcome::Skipped;
        }

        match result {
            Ok(()) => {
                self.event_bus
                    .notify(Notification::info(done_title, "Your journal entry has been saved."));
                self.refresh(&user, epoch).await;
                Outcome::Done
            }
            Err(e) => {
                log::error!("Error saving entry: {}", e);
                self.event_bus
                    .notify(Notification::error("Failed to save entry. Please try again."));
                Outcome::Failed(e)
            }
        }
    }

    /// Confirmation is the caller's job
    pub async fn delete(&self, id: &str) -> Outcome {
        let Some(user) = self.user.borrow().clone() else {
            return Outcome::Skipped;
        };
        let epoch = self.epoch.current();

        let result = self.store.delete(id).await;
        if !self.epoch.is_current(epoch) {
            log::info!("Dropping journal delete result for {}: session changed", user.id);
            return Outcome::Skipped;
        }

        match result {
            Ok(()) => {
                self.event_bus
                    .notify(Notification::info("Entry deleted", "Your journal entry has been removed."));
                self.refresh(&user, epoch).await;
                Outcome::Done
            }
            Err(e) => {
                log::error!("Error deleting entry: {}", e);
                self.event_bus
                    .notify(Notification::error("Failed to delete entry. Please try again."));
                Outcome::Failed(e)
            }
        }
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
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
        let entries = self.store.list(&user.id).await.unwrap_or_else(|e| {
            log::error!("Error loading journal entries: {}", e);
            Vec::new()
        });
        if !self.epoch.is_current(epoch) {
            log::debug!("Discarding journal entries for {}: session changed", user.id);
            return;
        }
        *self.entries.borrow_mut() = entries;
        self.event_bus.emit(AppEvent::EntriesChanged);
    }
}
