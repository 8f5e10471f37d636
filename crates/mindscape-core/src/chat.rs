//! Chat session: the assistant page's transcript and its round trip.
//!
//! One `submit` runs:
//! 1. append the user turn locally (pending, provisional id)
//! 2. store it, then reconcile the entry with the stored row
//! 3. send every prior turn plus the new one to the AI function
//! 4. pull the reply out of the payload, or fall back to a fixed text
//! 5. append the assistant turn locally and store it the same way
//!
//! A failure in steps 2 to 5 stops the round trip, marks nothing as removed, and raises
//! one error toast. Nothing is retried.
//!
//! `initialize` and `close` start a new epoch. A round trip from an older epoch
//! no longer holds the in-flight guard, appends nothing and raises no toast.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use mindscape_types::{
    AppError, Result,
    config::ChatConfig,
    event::{AppEvent, Notification},
    message::{ChatMessage, ChatTurn, Delivery, MessageId, NewChatMessage, Role, TranscriptEntry},
    session::UserIdentity,
};
use crate::event_bus::EventBus;
use crate::flight::{Epoch, InFlight, Outcome};
use crate::ports::{AiInvokerPort, MessageStorePort};

const SEND_FAILED: &str = "Failed to send message. Please try again.";

/// JSON pointer of the reply text in the function's response
const REPLY_POINTER: &str = "/choices/0/message/content";

pub struct ChatSession {
    store: Rc<dyn MessageStorePort>,
    invoker: Rc<dyn AiInvokerPort>,
    event_bus: EventBus,
    config: ChatConfig,
    user: RefCell<Option<UserIdentity>>,
    transcript: RefCell<Vec<TranscriptEntry>>,
    flight: InFlight,
    epoch: Epoch,
}

impl ChatSession {
    pub fn new(
        store: Rc<dyn MessageStorePort>,
        invoker: Rc<dyn AiInvokerPort>,
        event_bus: EventBus,
        config: ChatConfig,
    ) -> Self {
        Self {
            store,
            invoker,
            event_bus,
            config,
            user: RefCell::new(None),
            transcript: RefCell::new(Vec::new()),
            flight: InFlight::new(),
            epoch: Epoch::default(),
        }
    }

    /// Load the user's stored history and bind the session to them.
    ///
    /// A failed load is logged and leaves an empty transcript.
    pub async fn initialize(&self, user: UserIdentity) {
        let epoch = self.next_epoch();
        *self.user.borrow_mut() = None;
        self.transcript.borrow_mut().clear();

        let limit = self.config.history_limit;
        let history = match self.store.list(&user.id, limit).await {
            Ok(rows) => normalize_history(rows, limit),
            Err(e) => {
                log::error!("Error loading messages: {}", e);
                Vec::new()
            }
        };

        if !self.epoch.is_current(epoch) {
            log::debug!("Discarding history for {}: session was reset while loading", user.id);
            return;
        }

        log::info!("Loaded {} messages for {}", history.len(), user.id);
        *self.transcript.borrow_mut() = history.into_iter().map(TranscriptEntry::confirmed).collect();
        *self.user.borrow_mut() = Some(user);
        self.event_bus.emit(AppEvent::TranscriptChanged);
    }

    /// Drop the bound user and the transcript
    pub fn close(&self) {
        self.next_epoch();
        *self.user.borrow_mut() = None;
        self.transcript.borrow_mut().clear();
        self.event_bus.emit(AppEvent::TranscriptChanged);
    }

    pub async fn submit(&self, text: &str) -> Outcome {
        let text = text.trim();
        if text.is_empty() {
            return Outcome::Skipped;
        }
        let Some(user) = self.user.borrow().clone() else {
            log::warn!("Ignoring chat submit without a session");
            return Outcome::Skipped;
        };
        let Some(_guard) = self.flight.try_begin() else {
            log::warn!("Ignoring chat submit while a reply is pending");
            return Outcome::Busy;
        };
        let epoch = self.epoch.current();

        let mut turns: Vec<ChatTurn> = self
            .transcript
            .borrow()
            .iter()
            .map(|entry| entry.message.as_turn())
            .collect();
        turns.push(ChatTurn::user(text));

        let user_message = ChatMessage::user(text);
        let user_message_id = user_message.id.clone();
        self.append(TranscriptEntry::pending(user_message));

        if let Err(e) = self.persist(&user, &user_message_id, Role::User, text).await {
            return self.fail(epoch, e);
        }

        let payload = match self.invoker.invoke(&turns).await {
            Ok(payload) => payload,
            Err(e) => return self.fail(epoch, e),
        };
        let reply = extract_reply(&payload)
            .unwrap_or(&self.config.fallback_reply)
            .to_string();

        if !self.epoch.is_current(epoch) {
            log::info!("Session reset while waiting for a reply; dropping it");
            return Outcome::Skipped;
        }

        let assistant_message = ChatMessage::assistant(reply.clone());
        let assistant_message_id = assistant_message.id.clone();
        self.append(TranscriptEntry::pending(assistant_message));

        if let Err(e) = self
            .persist(&user, &assistant_message_id, Role::Assistant, &reply)
            .await
        {
            return self.fail(epoch, e);
        }

        Outcome::Done
    }

    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.borrow().clone()
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.user.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.flight.is_busy()
    }

    // ─── internals ───────────────────────────────────────────

    fn next_epoch(&self) -> u64 {
        self.flight.reset();
        self.epoch.advance()
    }

    fn append(&self, entry: TranscriptEntry) {
        self.transcript.borrow_mut().push(entry);
        self.event_bus.emit(AppEvent::TranscriptChanged);
    }

    /// Store one turn and settle its pending entry either way.
    async fn persist(
        &self,
        user: &UserIdentity,
        provisional: &MessageId,
        role: Role,
        content: &str,
    ) -> Result<()> {
        let row = NewChatMessage {
            user_id: user.id.clone(),
            role,
            content: content.to_string(),
        };
        match self.store.insert(row).await {
            Ok(stored) => {
                self.settle(provisional, Delivery::Confirmed, Some(stored));
                Ok(())
            }
            Err(e) => {
                self.settle(provisional, Delivery::Failed, None);
                Err(e)
            }
        }
    }

    /// Entries that are gone (session reset) are left alone.
    fn settle(&self, provisional: &MessageId, delivery: Delivery, stored: Option<ChatMessage>) {
        let mut transcript = self.transcript.borrow_mut();
        let Some(entry) = transcript
            .iter_mut()
            .find(|entry| &entry.message.id == provisional)
        else {
            return;
        };
        entry.delivery = delivery;
        if let Some(stored) = stored {
            entry.message.id = stored.id;
            entry.message.created_at = stored.created_at;
        }
        drop(transcript);
        self.event_bus.emit(AppEvent::TranscriptChanged);
    }

    fn fail(&self, epoch: u64, e: AppError) -> Outcome {
        log::error!("Error sending message: {}", e);
        if !self.epoch.is_current(epoch) {
            return Outcome::Skipped;
        }
        self.event_bus.notify(Notification::error(SEND_FAILED));
        Outcome::Failed(e)
    }
}

/// The reply text, if the payload has a non-empty string at the reply path
pub fn extract_reply(payload: &Value) -> Option<&str> {
    payload
        .pointer(REPLY_POINTER)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

/// Oldest first, at most `limit`. An over-long list keeps its newest rows;
/// the hosted store already caps the query, so this only sorts there.
fn normalize_history(mut rows: Vec<ChatMessage>, limit: usize) -> Vec<ChatMessage> {
    rows.sort_by_key(|message| message.created_at);
    if rows.len() > limit {
        rows.drain(..rows.len() - limit);
    }
    rows
}
