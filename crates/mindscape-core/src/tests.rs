#[cfg(test)]
mod tests {
    use crate::auth::SessionGate;
    use crate::chat::{extract_reply, ChatSession};
    use crate::dashboard::{greeting, Dashboard, Feature};
    use crate::event_bus::EventBus;
    use crate::flight::{Epoch, InFlight, Outcome};
    use crate::journal::{Journal, JournalDraft};
    use crate::mood::MoodTracker;
    use crate::ports::*;
    use crate::profile::{ProfileEditor, ProfileForm};
    use mindscape_types::config::ChatConfig;
    use mindscape_types::entry::*;
    use mindscape_types::event::{AppEvent, Notification};
    use mindscape_types::message::*;
    use mindscape_types::session::*;
    use mindscape_types::{AppError, Result};

    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use serde_json::{json, Value};

    // ─── Helpers ─────────────────────────────────────────────

    fn user() -> UserIdentity {
        UserIdentity {
            id: "user-1".to_string(),
            email: Some("sam@example.com".to_string()),
            full_name: None,
        }
    }

    fn named(id: &str) -> UserIdentity {
        UserIdentity {
            id: id.to_string(),
            email: None,
            full_name: None,
        }
    }

    fn reply(text: &str) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": text } }] })
    }

    fn notifications(bus: &EventBus) -> Vec<Notification> {
        bus.drain()
            .into_iter()
            .filter_map(|e| match e {
                AppEvent::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    // ─── Mock ports ──────────────────────────────────────────

    /// Records inserts; `fail_on` makes the n-th insert (1-based) fail
    #[derive(Default)]
    struct MockMessageStore {
        history: RefCell<Vec<ChatMessage>>,
        inserted: RefCell<Vec<NewChatMessage>>,
        fail_on: Cell<Option<usize>>,
        fail_list: Cell<bool>,
        listed_limit: Cell<Option<usize>>,
    }

    #[async_trait(?Send)]
    impl MessageStorePort for MockMessageStore {
        async fn insert(&self, message: NewChatMessage) -> Result<ChatMessage> {
            let n = self.inserted.borrow().len() + 1;
            self.inserted.borrow_mut().push(message.clone());
            if self.fail_on.get() == Some(n) {
                return Err(AppError::store("chat_messages", "insert rejected"));
            }
            Ok(ChatMessage {
                id: MessageId(format!("srv-{}", n)),
                role: message.role,
                content: message.content,
                created_at: Utc::now(),
            })
        }

        async fn list(&self, _user_id: &str, limit: usize) -> Result<Vec<ChatMessage>> {
            self.listed_limit.set(Some(limit));
            if self.fail_list.get() {
                return Err(AppError::Network("offline".to_string()));
            }
            Ok(self.history.borrow().clone())
        }
    }

    enum InvokerBehavior {
        Reply(Value),
        Fail,
    }

    struct MockInvoker {
        behavior: InvokerBehavior,
        calls: RefCell<Vec<Vec<ChatTurn>>>,
    }

    impl MockInvoker {
        fn replying(payload: Value) -> Self {
            Self {
                behavior: InvokerBehavior::Reply(payload),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                behavior: InvokerBehavior::Fail,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl AiInvokerPort for MockInvoker {
        async fn invoke(&self, turns: &[ChatTurn]) -> Result<Value> {
            self.calls.borrow_mut().push(turns.to_vec());
            match &self.behavior {
                InvokerBehavior::Reply(v) => Ok(v.clone()),
                InvokerBehavior::Fail => Err(AppError::Invoke("HTTP 500".to_string())),
            }
        }
    }

    /// Invoker that parks until the test releases it
    struct GatedInvoker {
        gate: RefCell<Option<oneshot::Receiver<Value>>>,
    }

    #[async_trait(?Send)]
    impl AiInvokerPort for GatedInvoker {
        async fn invoke(&self, _turns: &[ChatTurn]) -> Result<Value> {
            let rx = self.gate.borrow_mut().take();
            match rx {
                Some(rx) => rx.await.map_err(|_| AppError::Network("gate dropped".to_string())),
                None => Ok(reply("ungated")),
            }
        }
    }

    fn chat(store: Rc<MockMessageStore>, invoker: Rc<dyn AiInvokerPort>, bus: &EventBus) -> ChatSession {
        ChatSession::new(store, invoker, bus.clone(), ChatConfig::default())
    }

    // ─── EventBus Tests ──────────────────────────────────────

    #[test]
    fn test_event_bus_new_is_empty() {
        let bus = EventBus::new();
        assert!(!bus.has_pending());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_event_bus_clone_shares_state() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        bus1.notify(Notification::info("a", "b"));
        assert!(bus2.has_pending());
        assert_eq!(bus2.drain().len(), 1);
        assert!(!bus1.has_pending());
    }

    // ─── InFlight Tests ──────────────────────────────────────

    #[test]
    fn test_in_flight_single_holder() {
        let flight = InFlight::new();
        let guard = flight.try_begin();
        assert!(guard.is_some());
        assert!(flight.is_busy());
        assert!(flight.try_begin().is_none());

        drop(guard);
        assert!(!flight.is_busy());
        assert!(flight.try_begin().is_some());
    }

    #[test]
    fn test_in_flight_clone_shares_guard() {
        let a = InFlight::new();
        let b = a.clone();
        let _guard = a.try_begin().unwrap();
        assert!(b.try_begin().is_none());
    }

    #[test]
    fn test_in_flight_reset_detaches_old_guard() {
        let flight = InFlight::new();
        let old = flight.try_begin().unwrap();

        flight.reset();
        assert!(!flight.is_busy());
        let current = flight.try_begin().unwrap();

        // The detached guard must not release the current holder
        drop(old);
        assert!(flight.is_busy());
        assert!(flight.try_begin().is_none());

        drop(current);
        assert!(!flight.is_busy());
    }

    #[test]
    fn test_epoch_advance() {
        let epoch = Epoch::default();
        let first = epoch.advance();
        assert!(epoch.is_current(first));
        let second = epoch.advance();
        assert!(!epoch.is_current(first));
        assert_eq!(epoch.current(), second);
    }

    // ─── Subscription Tests ──────────────────────────────────

    #[test]
    fn test_subscription_teardown_runs_once_on_unsubscribe() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || c.set(c.get() + 1));
        assert!(sub.is_active());
        sub.unsubscribe();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_subscription_teardown_runs_on_drop() {
        let count = Rc::new(Cell::new(0));
        {
            let c = count.clone();
            let _sub = Subscription::new(move || c.set(c.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }

    // ─── Reply extraction ────────────────────────────────────

    #[test]
    fn test_extract_reply_present() {
        assert_eq!(extract_reply(&reply("hello")), Some("hello"));
    }

    #[test]
    fn test_extract_reply_missing_paths() {
        assert_eq!(extract_reply(&json!({})), None);
        assert_eq!(extract_reply(&json!({ "choices": [] })), None);
        assert_eq!(extract_reply(&json!({ "choices": [{ "message": {} }] })), None);
        assert_eq!(extract_reply(&json!({ "choices": [{ "message": { "content": null } }] })), None);
        assert_eq!(extract_reply(&json!({ "choices": [{ "message": { "content": 42 } }] })), None);
        assert_eq!(extract_reply(&Value::Null), None);
    }

    #[test]
    fn test_extract_reply_empty_string() {
        assert_eq!(extract_reply(&reply("")), None);
    }

    // ─── ChatSession: initialize ─────────────────────────────

    #[test]
    fn test_initialize_loads_oldest_first() {
        let store = Rc::new(MockMessageStore::default());
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        *store.history.borrow_mut() = vec![
            ChatMessage {
                id: MessageId("b".to_string()),
                role: Role::Assistant,
                content: "second".to_string(),
                created_at: base + Duration::seconds(5),
            },
            ChatMessage {
                id: MessageId("a".to_string()),
                role: Role::User,
                content: "first".to_string(),
                created_at: base,
            },
        ];
        let bus = EventBus::new();
        let session = chat(store.clone(), Rc::new(MockInvoker::replying(reply("x"))), &bus);

        block_on(session.initialize(user()));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].content(), "first");
        assert_eq!(transcript[1].content(), "second");
        assert!(transcript.iter().all(|e| e.delivery == Delivery::Confirmed));
        assert_eq!(store.listed_limit.get(), Some(50));
        assert!(session.is_active());
    }

    #[test]
    fn test_initialize_caps_at_history_limit() {
        let store = Rc::new(MockMessageStore::default());
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        *store.history.borrow_mut() = (0..75)
            .map(|i| ChatMessage {
                id: MessageId(i.to_string()),
                role: Role::User,
                content: i.to_string(),
                created_at: base + Duration::minutes(i),
            })
            .collect();
        let bus = EventBus::new();
        let session = chat(store, Rc::new(MockInvoker::replying(reply("x"))), &bus);

        block_on(session.initialize(user()));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 50);
        for pair in transcript.windows(2) {
            assert!(pair[0].message.created_at <= pair[1].message.created_at);
        }
    }

    #[test]
    fn test_initialize_load_error_degrades_to_empty() {
        let store = Rc::new(MockMessageStore::default());
        store.fail_list.set(true);
        let bus = EventBus::new();
        let session = chat(store, Rc::new(MockInvoker::replying(reply("x"))), &bus);

        block_on(session.initialize(user()));

        assert!(session.transcript().is_empty());
        assert!(session.is_active());
        // Logged, not surfaced
        assert!(notifications(&bus).is_empty());
    }

    // ─── ChatSession: submit ─────────────────────────────────

    #[test]
    fn test_submit_first_message_scenario() {
        let store = Rc::new(MockMessageStore::default());
        let invoker = Rc::new(MockInvoker::replying(reply("I hear you — want to talk about it?")));
        let bus = EventBus::new();
        let session = chat(store.clone(), invoker.clone(), &bus);
        block_on(session.initialize(user()));

        let outcome = block_on(session.submit("I feel anxious today"));
        assert!(outcome.is_done());

        let inserted = store.inserted.borrow();
        assert_eq!(inserted.len(), 2);
        assert_eq!(inserted[0].role, Role::User);
        assert_eq!(inserted[0].content, "I feel anxious today");
        assert_eq!(inserted[0].user_id, "user-1");
        assert_eq!(inserted[1].role, Role::Assistant);
        assert_eq!(inserted[1].content, "I hear you — want to talk about it?");

        let calls = invoker.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec![ChatTurn::user("I feel anxious today")]);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role(), Role::User);
        assert_eq!(transcript[0].content(), "I feel anxious today");
        assert_eq!(transcript[1].role(), Role::Assistant);
        assert_eq!(transcript[1].content(), "I hear you — want to talk about it?");
        assert!(notifications(&bus).is_empty());
    }

    #[test]
    fn test_submit_reconciles_server_ids() {
        let store = Rc::new(MockMessageStore::default());
        let bus = EventBus::new();
        let session = chat(store, Rc::new(MockInvoker::replying(reply("ok"))), &bus);
        block_on(session.initialize(user()));

        block_on(session.submit("hi"));

        let transcript = session.transcript();
        assert_eq!(transcript[0].message.id, MessageId("srv-1".to_string()));
        assert_eq!(transcript[1].message.id, MessageId("srv-2".to_string()));
        assert!(transcript.iter().all(|e| e.delivery == Delivery::Confirmed));
    }

    #[test]
    fn test_submit_trims_input() {
        let store = Rc::new(MockMessageStore::default());
        let invoker = Rc::new(MockInvoker::replying(reply("ok")));
        let bus = EventBus::new();
        let session = chat(store.clone(), invoker.clone(), &bus);
        block_on(session.initialize(user()));

        block_on(session.submit("  hello there \n"));

        assert_eq!(store.inserted.borrow()[0].content, "hello there");
        assert_eq!(invoker.calls.borrow()[0], vec![ChatTurn::user("hello there")]);
    }

    #[test]
    fn test_submit_blank_is_noop() {
        let store = Rc::new(MockMessageStore::default());
        let invoker = Rc::new(MockInvoker::replying(reply("ok")));
        let bus = EventBus::new();
        let session = chat(store.clone(), invoker.clone(), &bus);
        block_on(session.initialize(user()));
        let _ = bus.drain();

        for text in ["", "   ", "\t\n"] {
            assert!(matches!(block_on(session.submit(text)), Outcome::Skipped));
        }

        assert!(store.inserted.borrow().is_empty());
        assert!(invoker.calls.borrow().is_empty());
        assert!(session.transcript().is_empty());
        assert!(!bus.has_pending());
    }

    #[test]
    fn test_submit_without_session_is_noop() {
        let store = Rc::new(MockMessageStore::default());
        let invoker = Rc::new(MockInvoker::replying(reply("ok")));
        let bus = EventBus::new();
        let session = chat(store.clone(), invoker.clone(), &bus);

        assert!(matches!(block_on(session.submit("hello")), Outcome::Skipped));
        assert!(store.inserted.borrow().is_empty());
        assert!(invoker.calls.borrow().is_empty());
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_submit_sends_prior_transcript() {
        let store = Rc::new(MockMessageStore::default());
        let invoker = Rc::new(MockInvoker::replying(reply("reply")));
        let bus = EventBus::new();
        let session = chat(store, invoker.clone(), &bus);
        block_on(session.initialize(user()));

        block_on(session.submit("one"));
        block_on(session.submit("two"));

        let calls = invoker.calls.borrow();
        assert_eq!(
            calls[1],
            vec![
                ChatTurn::user("one"),
                ChatTurn::assistant("reply"),
                ChatTurn::user("two"),
            ]
        );
        assert_eq!(session.transcript().len(), 4);
    }

    #[test]
    fn test_submit_missing_reply_uses_fallback() {
        let store = Rc::new(MockMessageStore::default());
        let bus = EventBus::new();
        let session = chat(store.clone(), Rc::new(MockInvoker::replying(json!({ "choices": [] }))), &bus);
        block_on(session.initialize(user()));

        assert!(block_on(session.submit("hello")).is_done());

        let transcript = session.transcript();
        assert_eq!(transcript[1].role(), Role::Assistant);
        assert_eq!(transcript[1].content(), "Sorry, I could not process that.");
        assert_eq!(store.inserted.borrow()[1].content, "Sorry, I could not process that.");
    }

    #[test]
    fn test_submit_empty_reply_uses_fallback() {
        let store = Rc::new(MockMessageStore::default());
        let bus = EventBus::new();
        let session = chat(store, Rc::new(MockInvoker::replying(reply(""))), &bus);
        block_on(session.initialize(user()));

        block_on(session.submit("hello"));

        assert_eq!(session.transcript()[1].content(), "Sorry, I could not process that.");
    }

    #[test]
    fn test_submit_user_insert_failure_keeps_entry() {
        let store = Rc::new(MockMessageStore::default());
        store.fail_on.set(Some(1));
        let invoker = Rc::new(MockInvoker::replying(reply("never")));
        let bus = EventBus::new();
        let session = chat(store, invoker.clone(), &bus);
        block_on(session.initialize(user()));
        let _ = bus.drain();

        let outcome = block_on(session.submit("hello"));
        assert!(matches!(outcome, Outcome::Failed(AppError::Store { .. })));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].content(), "hello");
        assert_eq!(transcript[0].delivery, Delivery::Failed);
        assert!(invoker.calls.borrow().is_empty());

        let toasts = notifications(&bus);
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0], Notification::error("Failed to send message. Please try again."));
    }

    #[test]
    fn test_submit_invoker_failure() {
        let store = Rc::new(MockMessageStore::default());
        let bus = EventBus::new();
        let session = chat(store.clone(), Rc::new(MockInvoker::failing()), &bus);
        block_on(session.initialize(user()));
        let _ = bus.drain();

        let outcome = block_on(session.submit("hello"));
        assert!(matches!(outcome, Outcome::Failed(AppError::Invoke(_))));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].delivery, Delivery::Confirmed);
        assert_eq!(store.inserted.borrow().len(), 1);
        assert_eq!(notifications(&bus).len(), 1);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_submit_assistant_insert_failure_flags_reply() {
        let store = Rc::new(MockMessageStore::default());
        store.fail_on.set(Some(2));
        let bus = EventBus::new();
        let session = chat(store, Rc::new(MockInvoker::replying(reply("shown but unsaved"))), &bus);
        block_on(session.initialize(user()));
        let _ = bus.drain();

        let outcome = block_on(session.submit("hello"));
        assert!(matches!(outcome, Outcome::Failed(_)));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].delivery, Delivery::Confirmed);
        assert_eq!(transcript[1].content(), "shown but unsaved");
        assert_eq!(transcript[1].delivery, Delivery::Failed);
        assert_eq!(notifications(&bus).len(), 1);
    }

    #[test]
    fn test_submit_is_optimistic() {
        let store = Rc::new(MockMessageStore::default());
        let (tx, rx) = oneshot::channel();
        let invoker = Rc::new(GatedInvoker { gate: RefCell::new(Some(rx)) });
        let bus = EventBus::new();
        let session = chat(store, invoker, &bus);
        block_on(session.initialize(user()));

        block_on(async {
            let first = session.submit("hello");
            futures::pin_mut!(first);
            assert!(futures::poll!(first.as_mut()).is_pending());

            // User turn is visible while the reply is outstanding
            let transcript = session.transcript();
            assert_eq!(transcript.len(), 1);
            assert_eq!(transcript[0].role(), Role::User);
            assert!(session.is_busy());

            tx.send(reply("there")).unwrap();
            assert!(first.await.is_done());
        });

        assert_eq!(session.transcript().len(), 2);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_submit_single_flight() {
        let store = Rc::new(MockMessageStore::default());
        let (tx, rx) = oneshot::channel();
        let invoker = Rc::new(GatedInvoker { gate: RefCell::new(Some(rx)) });
        let bus = EventBus::new();
        let session = chat(store.clone(), invoker, &bus);
        block_on(session.initialize(user()));

        block_on(async {
            let first = session.submit("first");
            futures::pin_mut!(first);
            assert!(futures::poll!(first.as_mut()).is_pending());

            assert!(matches!(session.submit("second").await, Outcome::Busy));

            tx.send(reply("answer")).unwrap();
            assert!(first.await.is_done());
        });

        let contents: Vec<String> = session
            .transcript()
            .iter()
            .map(|e| e.content().to_string())
            .collect();
        assert_eq!(contents, vec!["first", "answer"]);
        assert_eq!(store.inserted.borrow().len(), 2);
    }

    #[test]
    fn test_close_drops_late_reply() {
        let store = Rc::new(MockMessageStore::default());
        let (tx, rx) = oneshot::channel();
        let invoker = Rc::new(GatedInvoker { gate: RefCell::new(Some(rx)) });
        let bus = EventBus::new();
        let session = chat(store.clone(), invoker, &bus);
        block_on(session.initialize(user()));

        block_on(async {
            let pending = session.submit("hello");
            futures::pin_mut!(pending);
            assert!(futures::poll!(pending.as_mut()).is_pending());

            session.close();
            tx.send(reply("late")).unwrap();
            assert!(matches!(pending.await, Outcome::Skipped));
        });

        assert!(session.transcript().is_empty());
        assert!(!session.is_active());
        assert_eq!(store.inserted.borrow().len(), 1);
    }

    #[test]
    fn test_close_frees_submit_for_next_user() {
        let store = Rc::new(MockMessageStore::default());
        let (tx, rx) = oneshot::channel();
        let invoker = Rc::new(GatedInvoker { gate: RefCell::new(Some(rx)) });
        let bus = EventBus::new();
        let session = chat(store.clone(), invoker, &bus);
        block_on(session.initialize(user()));

        block_on(async {
            let stale = session.submit("from the first user");
            futures::pin_mut!(stale);
            assert!(futures::poll!(stale.as_mut()).is_pending());

            session.close();
            assert!(!session.is_busy());
            session.initialize(named("user-2")).await;
            let _ = bus.drain();

            // The old round trip no longer blocks the new session
            assert!(session.submit("hello").await.is_done());

            drop(tx);
            assert!(matches!(stale.await, Outcome::Skipped));
        });

        assert!(notifications(&bus).iter().all(|n| !n.is_error()));
        let contents: Vec<String> = session
            .transcript()
            .iter()
            .map(|e| e.content().to_string())
            .collect();
        assert_eq!(contents, vec!["hello", "ungated"]);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_user_turn_precedes_assistant_turn() {
        let store = Rc::new(MockMessageStore::default());
        let bus = EventBus::new();
        let session = chat(store, Rc::new(MockInvoker::replying(reply("r"))), &bus);
        block_on(session.initialize(user()));

        for text in ["a", "b", "c"] {
            block_on(session.submit(text));
        }

        let roles: Vec<Role> = session.transcript().iter().map(|e| e.role()).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
    }

    // ─── Auth mock & SessionGate ─────────────────────────────

    #[derive(Default)]
    struct MockAuth {
        session: RefCell<Option<AuthSession>>,
        fail_lookup: Cell<bool>,
        listeners: Rc<RefCell<Vec<(u64, AuthListener)>>>,
        next_listener: Cell<u64>,
        signed_out: Cell<bool>,
    }

    impl MockAuth {
        fn signed_in() -> Self {
            let auth = Self::default();
            *auth.session.borrow_mut() = Some(AuthSession {
                access_token: "token".to_string(),
                expires_at: None,
                user: user(),
            });
            auth
        }

        fn broadcast(&self, change: AuthChange) {
            for (_, listener) in self.listeners.borrow().iter() {
                listener(&change);
            }
        }
    }

    #[async_trait(?Send)]
    impl AuthPort for MockAuth {
        async fn current_session(&self) -> Result<Option<AuthSession>> {
            if self.fail_lookup.get() {
                return Err(AppError::Network("offline".to_string()));
            }
            Ok(self.session.borrow().clone())
        }

        async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
            if password != "correct" {
                return Err(AppError::Auth("Invalid login credentials".to_string()));
            }
            let session = AuthSession {
                access_token: "token".to_string(),
                expires_at: None,
                user: UserIdentity {
                    id: "user-1".to_string(),
                    email: Some(email.to_string()),
                    full_name: None,
                },
            };
            *self.session.borrow_mut() = Some(session.clone());
            self.broadcast(AuthChange::SignedIn(session.user.clone()));
            Ok(session)
        }

        async fn sign_up(&self, _email: &str, _password: &str, _full_name: &str) -> Result<Option<AuthSession>> {
            Ok(None)
        }

        async fn sign_out(&self) -> Result<()> {
            self.signed_out.set(true);
            *self.session.borrow_mut() = None;
            self.broadcast(AuthChange::SignedOut);
            Ok(())
        }

        fn subscribe(&self, listener: AuthListener) -> Subscription {
            let id = self.next_listener.get();
            self.next_listener.set(id + 1);
            self.listeners.borrow_mut().push((id, listener));
            let listeners = self.listeners.clone();
            Subscription::new(move || listeners.borrow_mut().retain(|(i, _)| *i != id))
        }
    }

    #[test]
    fn test_gate_resolves_authenticated() {
        let gate = SessionGate::new(Rc::new(MockAuth::signed_in()), EventBus::new());
        assert_eq!(block_on(gate.resolve()), AuthState::Authenticated(user()));
    }

    #[test]
    fn test_gate_resolves_unauthenticated() {
        let gate = SessionGate::new(Rc::new(MockAuth::default()), EventBus::new());
        assert_eq!(block_on(gate.resolve()), AuthState::Unauthenticated);
    }

    #[test]
    fn test_gate_lookup_error_is_unauthenticated() {
        let auth = MockAuth::signed_in();
        auth.fail_lookup.set(true);
        let bus = EventBus::new();
        let gate = SessionGate::new(Rc::new(auth), bus.clone());
        assert_eq!(block_on(gate.resolve()), AuthState::Unauthenticated);
        assert!(notifications(&bus).is_empty());
    }

    #[test]
    fn test_gate_watch_and_teardown() {
        let auth = Rc::new(MockAuth::default());
        let bus = EventBus::new();
        let gate = SessionGate::new(auth.clone(), bus.clone());

        let sub = gate.watch();
        assert!(block_on(gate.sign_in("sam@example.com", "correct")));
        let events = bus.drain();
        assert!(events.iter().any(|e| matches!(e, AppEvent::AuthChanged { signed_in: true })));

        sub.unsubscribe();
        assert!(auth.listeners.borrow().is_empty());
        block_on(auth.sign_out()).unwrap();
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_gate_sign_in_failure_notifies() {
        let bus = EventBus::new();
        let gate = SessionGate::new(Rc::new(MockAuth::default()), bus.clone());
        assert!(!block_on(gate.sign_in("sam@example.com", "wrong")));
        let toasts = notifications(&bus);
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].is_error());
    }

    #[test]
    fn test_gate_sign_in_blank_is_noop() {
        let bus = EventBus::new();
        let gate = SessionGate::new(Rc::new(MockAuth::default()), bus.clone());
        assert!(!block_on(gate.sign_in("  ", "correct")));
        assert!(!bus.has_pending());
    }

    #[test]
    fn test_gate_sign_up_needs_confirmation() {
        let bus = EventBus::new();
        let gate = SessionGate::new(Rc::new(MockAuth::default()), bus.clone());
        assert!(!block_on(gate.sign_up("new@example.com", "pw", "New Person")));
        let toasts = notifications(&bus);
        assert_eq!(toasts.len(), 1);
        assert!(!toasts[0].is_error());
    }

    // ─── Dashboard ───────────────────────────────────────────

    #[test]
    fn test_greeting_defaults_to_friend() {
        assert_eq!(greeting(&user()), "Welcome back, friend!");
        let mut named = user();
        named.full_name = Some("Robin".to_string());
        assert_eq!(greeting(&named), "Welcome back, Robin!");
        named.full_name = Some("  ".to_string());
        assert_eq!(greeting(&named), "Welcome back, friend!");
    }

    #[test]
    fn test_feature_catalog() {
        let titles: Vec<&str> = Feature::all().iter().map(|f| f.title()).collect();
        assert_eq!(titles, vec!["AI Assistant", "Mood Tracker", "Journal", "Goals"]);
    }

    #[test]
    fn test_dashboard_sign_out() {
        let auth = Rc::new(MockAuth::signed_in());
        let bus = EventBus::new();
        let dashboard = Dashboard::new(auth.clone(), bus.clone());
        block_on(dashboard.sign_out());
        assert!(auth.signed_out.get());
        assert_eq!(notifications(&bus), vec![Notification::info("Signed out", "See you soon!")]);
    }

    // ─── Mood tracker ────────────────────────────────────────

    #[derive(Default)]
    struct MockMoodStore {
        rows: RefCell<Vec<MoodEntry>>,
        fail_insert: Cell<bool>,
        fail_recent: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl MoodStorePort for MockMoodStore {
        async fn insert(&self, entry: NewMoodEntry) -> Result<MoodEntry> {
            if self.fail_insert.get() {
                return Err(AppError::store("mood_entries", "denied"));
            }
            let row = MoodEntry {
                id: format!("m{}", self.rows.borrow().len() + 1),
                mood: entry.mood,
                note: entry.note,
                created_at: Utc::now(),
            };
            self.rows.borrow_mut().insert(0, row.clone());
            Ok(row)
        }

        async fn recent(&self, _user_id: &str, limit: usize) -> Result<Vec<MoodEntry>> {
            if self.fail_recent.get() {
                return Err(AppError::Network("offline".to_string()));
            }
            Ok(self.rows.borrow().iter().take(limit).cloned().collect())
        }
    }

    #[test]
    fn test_log_mood_saves_and_reloads() {
        let store = Rc::new(MockMoodStore::default());
        let bus = EventBus::new();
        let tracker = MoodTracker::new(store.clone(), bus.clone(), 30);
        block_on(tracker.load(user()));

        assert!(block_on(tracker.log_mood(Mood::Happy, "  sunny day  ")).is_done());

        let entries = tracker.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mood(), Some(Mood::Happy));
        assert_eq!(entries[0].note.as_deref(), Some("sunny day"));
        assert_eq!(
            notifications(&bus),
            vec![Notification::info("Mood logged!", "Your mood has been saved.")]
        );
    }

    #[test]
    fn test_log_mood_blank_note_is_none() {
        let store = Rc::new(MockMoodStore::default());
        let tracker = MoodTracker::new(store.clone(), EventBus::new(), 30);
        block_on(tracker.load(user()));
        block_on(tracker.log_mood(Mood::Sad, "   "));
        assert!(store.rows.borrow()[0].note.is_none());
    }

    #[test]
    fn test_log_mood_failure() {
        let store = Rc::new(MockMoodStore::default());
        store.fail_insert.set(true);
        let bus = EventBus::new();
        let tracker = MoodTracker::new(store, bus.clone(), 30);
        block_on(tracker.load(user()));
        let _ = bus.drain();

        assert!(matches!(block_on(tracker.log_mood(Mood::Anxious, "")), Outcome::Failed(_)));
        assert_eq!(
            notifications(&bus),
            vec![Notification::error("Failed to save mood. Please try again.")]
        );
        assert!(!tracker.is_busy());
    }

    #[test]
    fn test_mood_load_error_is_empty() {
        let store = Rc::new(MockMoodStore::default());
        store.fail_recent.set(true);
        let bus = EventBus::new();
        let tracker = MoodTracker::new(store, bus.clone(), 30);
        block_on(tracker.load(user()));
        assert!(tracker.entries().is_empty());
        assert!(notifications(&bus).is_empty());
    }

    #[test]
    fn test_log_mood_without_user_is_skipped() {
        let tracker = MoodTracker::new(Rc::new(MockMoodStore::default()), EventBus::new(), 30);
        assert!(matches!(block_on(tracker.log_mood(Mood::Happy, "")), Outcome::Skipped));
    }

    // ─── Journal ─────────────────────────────────────────────

    #[derive(Default)]
    struct MockJournalStore {
        rows: RefCell<Vec<JournalEntry>>,
        updates: RefCell<Vec<(String, JournalPatch)>>,
        fail_writes: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl JournalStorePort for MockJournalStore {
        async fn list(&self, _user_id: &str) -> Result<Vec<JournalEntry>> {
            Ok(self.rows.borrow().clone())
        }

        async fn create(&self, entry: NewJournalEntry) -> Result<JournalEntry> {
            if self.fail_writes.get() {
                return Err(AppError::store("journal_entries", "denied"));
            }
            let now = Utc::now();
            let row = JournalEntry {
                id: format!("j{}", self.rows.borrow().len() + 1),
                title: entry.title,
                content: entry.content,
                created_at: now,
                updated_at: now,
            };
            self.rows.borrow_mut().insert(0, row.clone());
            Ok(row)
        }

        async fn update(&self, id: &str, patch: JournalPatch) -> Result<()> {
            if self.fail_writes.get() {
                return Err(AppError::store("journal_entries", "denied"));
            }
            self.updates.borrow_mut().push((id.to_string(), patch));
            Ok(())
        }

        async fn delete(&self, id: &str) -> Result<()> {
            if self.fail_writes.get() {
                return Err(AppError::store("journal_entries", "denied"));
            }
            self.rows.borrow_mut().retain(|r| r.id != id);
            Ok(())
        }
    }

    #[test]
    fn test_journal_create() {
        let store = Rc::new(MockJournalStore::default());
        let bus = EventBus::new();
        let journal = Journal::new(store.clone(), bus.clone());
        block_on(journal.load(user()));
        let _ = bus.drain();

        let draft = JournalDraft {
            id: None,
            title: " Morning ".to_string(),
            content: " Slept well ".to_string(),
        };
        assert!(block_on(journal.save(&draft)).is_done());

        let entries = journal.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Morning");
        assert_eq!(entries[0].content, "Slept well");
        assert_eq!(
            notifications(&bus),
            vec![Notification::info("Entry created!", "Your journal entry has been saved.")]
        );
    }

    #[test]
    fn test_journal_update_existing() {
        let store = Rc::new(MockJournalStore::default());
        let bus = EventBus::new();
        let journal = Journal::new(store.clone(), bus.clone());
        block_on(journal.load(user()));

        let draft = JournalDraft {
            id: Some("j9".to_string()),
            title: "Edited".to_string(),
            content: "New body".to_string(),
        };
        assert!(block_on(journal.save(&draft)).is_done());

        let updates = store.updates.borrow();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "j9");
        assert_eq!(updates[0].1.title, "Edited");
        assert!(notifications(&bus).iter().any(|n| n.title == "Entry updated!"));
    }

    #[test]
    fn test_journal_incomplete_draft_skipped() {
        let store = Rc::new(MockJournalStore::default());
        let journal = Journal::new(store.clone(), EventBus::new());
        block_on(journal.load(user()));

        let draft = JournalDraft {
            id: None,
            title: "Title only".to_string(),
            content: "   ".to_string(),
        };
        assert!(matches!(block_on(journal.save(&draft)), Outcome::Skipped));
        assert!(store.rows.borrow().is_empty());
    }

    #[test]
    fn test_journal_delete() {
        let store = Rc::new(MockJournalStore::default());
        let bus = EventBus::new();
        let journal = Journal::new(store.clone(), bus.clone());
        block_on(journal.load(user()));
        block_on(journal.save(&JournalDraft {
            id: None,
            title: "t".to_string(),
            content: "c".to_string(),
        }));
        let _ = bus.drain();

        assert!(block_on(journal.delete("j1")).is_done());
        assert!(journal.entries().is_empty());
        assert_eq!(
            notifications(&bus),
            vec![Notification::info("Entry deleted", "Your journal entry has been removed.")]
        );
    }

    #[test]
    fn test_journal_write_failure() {
        let store = Rc::new(MockJournalStore::default());
        store.fail_writes.set(true);
        let bus = EventBus::new();
        let journal = Journal::new(store, bus.clone());
        block_on(journal.load(user()));
        let _ = bus.drain();

        let draft = JournalDraft {
            id: None,
            title: "t".to_string(),
            content: "c".to_string(),
        };
        assert!(matches!(block_on(journal.save(&draft)), Outcome::Failed(_)));
        assert!(matches!(block_on(journal.delete("j1")), Outcome::Failed(_)));

        let toasts = notifications(&bus);
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].description, "Failed to save entry. Please try again.");
        assert_eq!(toasts[1].description, "Failed to delete entry. Please try again.");
    }

    #[test]
    fn test_journal_draft_edit() {
        let now = Utc::now();
        let entry = JournalEntry {
            id: "j1".to_string(),
            title: "T".to_string(),
            content: "C".to_string(),
            created_at: now,
            updated_at: now,
        };
        let draft = JournalDraft::edit(&entry);
        assert_eq!(draft.id.as_deref(), Some("j1"));
        assert!(draft.is_complete());
        assert!(!JournalDraft::default().is_complete());
    }

    // ─── Profile ─────────────────────────────────────────────

    #[derive(Default)]
    struct MockProfileStore {
        row: RefCell<Option<Profile>>,
        saved: RefCell<Vec<ProfileUpdate>>,
        fail: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl ProfileStorePort for MockProfileStore {
        async fn get(&self, _user_id: &str) -> Result<Option<Profile>> {
            if self.fail.get() {
                return Err(AppError::Network("offline".to_string()));
            }
            Ok(self.row.borrow().clone())
        }

        async fn update(&self, _user_id: &str, update: ProfileUpdate) -> Result<()> {
            if self.fail.get() {
                return Err(AppError::store("profiles", "denied"));
            }
            self.saved.borrow_mut().push(update);
            Ok(())
        }
    }

    #[test]
    fn test_profile_load_defaults_when_missing() {
        let editor = ProfileEditor::new(Rc::new(MockProfileStore::default()), EventBus::new());
        block_on(editor.load(user()));
        assert_eq!(editor.form(), ProfileForm::default());
        assert_eq!(editor.form().theme, ThemePreference::Light);
    }

    #[test]
    fn test_profile_load_existing() {
        let store = Rc::new(MockProfileStore::default());
        *store.row.borrow_mut() = Some(Profile {
            full_name: Some("Robin".to_string()),
            bio: None,
            theme_preference: Some(ThemePreference::Dark),
        });
        let editor = ProfileEditor::new(store, EventBus::new());
        block_on(editor.load(user()));

        let form = editor.form();
        assert_eq!(form.full_name, "Robin");
        assert_eq!(form.bio, "");
        assert_eq!(form.theme, ThemePreference::Dark);
    }

    #[test]
    fn test_profile_save_trims() {
        let store = Rc::new(MockProfileStore::default());
        let bus = EventBus::new();
        let editor = ProfileEditor::new(store.clone(), bus.clone());
        block_on(editor.load(user()));
        let _ = bus.drain();

        let form = ProfileForm {
            full_name: "  Robin  ".to_string(),
            bio: " hi ".to_string(),
            theme: ThemePreference::Dark,
        };
        assert!(block_on(editor.save(&form)).is_done());

        let saved = store.saved.borrow();
        assert_eq!(saved[0].full_name, "Robin");
        assert_eq!(saved[0].bio, "hi");
        assert_eq!(saved[0].theme_preference, ThemePreference::Dark);
        assert_eq!(editor.form().full_name, "Robin");
        assert_eq!(
            notifications(&bus),
            vec![Notification::info("Profile updated!", "Your changes have been saved.")]
        );
    }

    #[test]
    fn test_profile_save_failure() {
        let store = Rc::new(MockProfileStore::default());
        let bus = EventBus::new();
        let editor = ProfileEditor::new(store.clone(), bus.clone());
        block_on(editor.load(user()));
        store.fail.set(true);
        let _ = bus.drain();

        assert!(matches!(block_on(editor.save(&ProfileForm::default())), Outcome::Failed(_)));
        assert_eq!(
            notifications(&bus),
            vec![Notification::error("Failed to save profile. Please try again.")]
        );
    }

    // ─── User rebinding ──────────────────────────────────────

    /// Per-user parked results; a user without a gate gets the default
    struct Gates<T> {
        parked: RefCell<Vec<(String, oneshot::Receiver<T>)>>,
    }

    impl<T: Default> Gates<T> {
        fn new() -> Self {
            Self { parked: RefCell::new(Vec::new()) }
        }

        fn park(&self, user_id: &str) -> oneshot::Sender<T> {
            let (tx, rx) = oneshot::channel();
            self.parked.borrow_mut().push((user_id.to_string(), rx));
            tx
        }

        async fn wait(&self, user_id: &str) -> Result<T> {
            let rx = {
                let mut parked = self.parked.borrow_mut();
                parked
                    .iter()
                    .position(|(id, _)| id == user_id)
                    .map(|i| parked.remove(i).1)
            };
            match rx {
                Some(rx) => rx.await.map_err(|_| AppError::Network("gate dropped".to_string())),
                None => Ok(T::default()),
            }
        }
    }

    struct GatedJournalStore {
        lists: Gates<Vec<JournalEntry>>,
    }

    #[async_trait(?Send)]
    impl JournalStorePort for GatedJournalStore {
        async fn list(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
            self.lists.wait(user_id).await
        }

        async fn create(&self, _entry: NewJournalEntry) -> Result<JournalEntry> {
            Err(AppError::store("journal_entries", "read only"))
        }

        async fn update(&self, _id: &str, _patch: JournalPatch) -> Result<()> {
            Err(AppError::store("journal_entries", "read only"))
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            Err(AppError::store("journal_entries", "read only"))
        }
    }

    fn journal_entry(title: &str) -> JournalEntry {
        let now = Utc::now();
        JournalEntry {
            id: title.to_string(),
            title: title.to_string(),
            content: "private".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_journal_late_load_does_not_leak_into_next_user() {
        let store = Rc::new(GatedJournalStore { lists: Gates::new() });
        let alice_rows = store.lists.park("alice");
        let bob_rows = store.lists.park("bob");
        let journal = Journal::new(store.clone(), EventBus::new());

        block_on(async {
            let alice = journal.load(named("alice"));
            futures::pin_mut!(alice);
            assert!(futures::poll!(alice.as_mut()).is_pending());

            journal.close();
            bob_rows.send(vec![journal_entry("bob diary")]).unwrap();
            journal.load(named("bob")).await;

            alice_rows.send(vec![journal_entry("alice secret")]).unwrap();
            alice.await;
        });

        let titles: Vec<String> = journal.entries().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["bob diary"]);
    }

    #[test]
    fn test_journal_close_drops_late_load() {
        let store = Rc::new(GatedJournalStore { lists: Gates::new() });
        let rows = store.lists.park("alice");
        let bus = EventBus::new();
        let journal = Journal::new(store.clone(), bus.clone());

        block_on(async {
            let load = journal.load(named("alice"));
            futures::pin_mut!(load);
            assert!(futures::poll!(load.as_mut()).is_pending());

            journal.close();
            rows.send(vec![journal_entry("alice secret")]).unwrap();
            load.await;
        });

        assert!(journal.entries().is_empty());
        assert!(!bus.drain().iter().any(|e| matches!(e, AppEvent::EntriesChanged)));
    }

    struct GatedProfileStore {
        rows: Gates<Option<Profile>>,
        saved: RefCell<Vec<(String, ProfileUpdate)>>,
    }

    #[async_trait(?Send)]
    impl ProfileStorePort for GatedProfileStore {
        async fn get(&self, user_id: &str) -> Result<Option<Profile>> {
            self.rows.wait(user_id).await
        }

        async fn update(&self, user_id: &str, update: ProfileUpdate) -> Result<()> {
            self.saved.borrow_mut().push((user_id.to_string(), update));
            Ok(())
        }
    }

    fn profile_named(name: &str) -> Profile {
        Profile {
            full_name: Some(name.to_string()),
            bio: Some(format!("{} bio", name)),
            theme_preference: Some(ThemePreference::Light),
        }
    }

    #[test]
    fn test_profile_late_load_keeps_next_users_form() {
        let store = Rc::new(GatedProfileStore {
            rows: Gates::new(),
            saved: RefCell::new(Vec::new()),
        });
        let alice_row = store.rows.park("alice");
        let bob_row = store.rows.park("bob");
        let editor = ProfileEditor::new(store.clone(), EventBus::new());

        block_on(async {
            let alice = editor.load(named("alice"));
            futures::pin_mut!(alice);
            assert!(futures::poll!(alice.as_mut()).is_pending());

            editor.close();
            bob_row.send(Some(profile_named("Bob"))).unwrap();
            editor.load(named("bob")).await;

            alice_row.send(Some(profile_named("Alice"))).unwrap();
            alice.await;
        });

        let form = editor.form();
        assert_eq!(form.full_name, "Bob");
        assert_eq!(form.bio, "Bob bio");

        // Saving what the form shows writes bob's own values to bob's row
        assert!(block_on(editor.save(&form)).is_done());
        let saved = store.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "bob");
        assert_eq!(saved[0].1.full_name, "Bob");
    }

    struct GatedMoodStore {
        recent: Gates<Vec<MoodEntry>>,
    }

    #[async_trait(?Send)]
    impl MoodStorePort for GatedMoodStore {
        async fn insert(&self, _entry: NewMoodEntry) -> Result<MoodEntry> {
            Err(AppError::store("mood_entries", "read only"))
        }

        async fn recent(&self, user_id: &str, _limit: usize) -> Result<Vec<MoodEntry>> {
            self.recent.wait(user_id).await
        }
    }

    #[test]
    fn test_mood_late_load_does_not_leak_into_next_user() {
        let store = Rc::new(GatedMoodStore { recent: Gates::new() });
        let alice_rows = store.recent.park("alice");
        let tracker = MoodTracker::new(store.clone(), EventBus::new(), 30);

        block_on(async {
            let alice = tracker.load(named("alice"));
            futures::pin_mut!(alice);
            assert!(futures::poll!(alice.as_mut()).is_pending());

            tracker.close();
            tracker.load(named("bob")).await;

            alice_rows
                .send(vec![MoodEntry {
                    id: "m1".to_string(),
                    mood: Mood::Sad.label().to_string(),
                    note: Some("alice note".to_string()),
                    created_at: Utc::now(),
                }])
                .unwrap();
            alice.await;
        });

        assert!(tracker.entries().is_empty());
    }
}
