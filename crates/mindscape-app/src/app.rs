//! Main egui application: routes between pages and runs controller work.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use egui::{self, CentralPanel, TopBottomPanel};
use gloo_timers::future::TimeoutFuture;

use mindscape_core::auth::SessionGate;
use mindscape_core::dashboard::Dashboard;
use mindscape_core::event_bus::EventBus;
use mindscape_core::journal::Journal;
use mindscape_core::mood::MoodTracker;
use mindscape_core::ports::*;
use mindscape_core::profile::ProfileEditor;
use mindscape_core::{ChatSession, Outcome};
use mindscape_platform::config::load_config;
use mindscape_platform::storage::{auto_detect_store, KeyValueStore};
use mindscape_platform::{BackendClient, FunctionInvoker, OfflineBackend, OfflineInvoker, RestAuth, RestTables};
use mindscape_types::config::AppConfig;
use mindscape_types::entry::ThemePreference;
use mindscape_types::session::AuthState;
use mindscape_ui::panels::assistant::{assistant_panel, AssistantAction};
use mindscape_ui::panels::auth::{auth_panel, AuthAction};
use mindscape_ui::panels::dashboard::dashboard_panel;
use mindscape_ui::panels::goals::goals_panel;
use mindscape_ui::panels::journal::{journal_panel, JournalAction};
use mindscape_ui::panels::mood::{mood_panel, MoodAction};
use mindscape_ui::panels::nav::{nav_bar, NavAction};
use mindscape_ui::panels::profile::{profile_panel, ProfileAction};
use mindscape_ui::panels::toasts::toasts_overlay;
use mindscape_ui::state::{Page, UiState};
use mindscape_ui::theme;

const TOAST_LIFETIME_MS: u32 = 5_000;

/// Adapters behind every port, hosted or offline
struct Backend {
    auth: Rc<dyn AuthPort>,
    messages: Rc<dyn MessageStorePort>,
    invoker: Rc<dyn AiInvokerPort>,
    moods: Rc<dyn MoodStorePort>,
    journal: Rc<dyn JournalStorePort>,
    profiles: Rc<dyn ProfileStorePort>,
}

impl Backend {
    fn build(config: &AppConfig, store: Rc<dyn KeyValueStore>) -> Self {
        if config.backend.is_configured() {
            log::info!("Backend: {}", config.backend.url);
            let client = Rc::new(BackendClient::new(&config.backend));
            let tables = Rc::new(RestTables::new(client.clone()));
            Self {
                auth: Rc::new(RestAuth::new(client.clone(), store)),
                messages: tables.clone(),
                invoker: Rc::new(FunctionInvoker::new(client, config.backend.chat_function.clone())),
                moods: tables.clone(),
                journal: tables.clone(),
                profiles: tables,
            }
        } else {
            log::warn!("No backend URL configured, running offline");
            let offline = Rc::new(OfflineBackend::new());
            Self {
                auth: offline.clone(),
                messages: offline.clone(),
                invoker: Rc::new(OfflineInvoker),
                moods: offline.clone(),
                journal: offline.clone(),
                profiles: offline,
            }
        }
    }
}

/// Results of spawned work that the next frame folds into `UiState`
enum Completed {
    Auth(AuthState),
    MoodLogged,
    JournalSaved,
    ProfileSaved(ThemePreference),
}

/// The main application state
pub struct MindscapeApp {
    ui_state: UiState,
    event_bus: EventBus,
    ctx: egui::Context,
    gate: Rc<SessionGate>,
    dashboard: Rc<Dashboard>,
    chat: Rc<ChatSession>,
    moods: Rc<MoodTracker>,
    journal: Rc<Journal>,
    profile: Rc<ProfileEditor>,
    _auth_watch: Subscription,
    completed: Rc<RefCell<Vec<Completed>>>,
    expired_toasts: Rc<RefCell<Vec<u64>>>,
    auth_busy: Rc<Cell<bool>>,
    applied_theme: Option<ThemePreference>,
}

impl MindscapeApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let store = auto_detect_store();
        let config = with_build_overrides(load_config(store.as_ref()));
        let event_bus = EventBus::new();
        let backend = Backend::build(&config, store);

        let gate = Rc::new(SessionGate::new(backend.auth.clone(), event_bus.clone()));
        let auth_watch = gate.watch();

        let app = Self {
            ui_state: UiState::new(),
            event_bus: event_bus.clone(),
            ctx: cc.egui_ctx.clone(),
            dashboard: Rc::new(Dashboard::new(backend.auth.clone(), event_bus.clone())),
            chat: Rc::new(ChatSession::new(
                backend.messages,
                backend.invoker,
                event_bus.clone(),
                config.chat.clone(),
            )),
            moods: Rc::new(MoodTracker::new(backend.moods, event_bus.clone(), config.mood_history_limit)),
            journal: Rc::new(Journal::new(backend.journal, event_bus.clone())),
            profile: Rc::new(ProfileEditor::new(backend.profiles, event_bus)),
            gate,
            _auth_watch: auth_watch,
            completed: Rc::new(RefCell::new(Vec::new())),
            expired_toasts: Rc::new(RefCell::new(Vec::new())),
            auth_busy: Rc::new(Cell::new(false)),
            applied_theme: None,
        };

        app.resolve_session();
        app
    }

    /// Spawn a task and repaint when it finishes
    fn spawn(&self, task: impl std::future::Future<Output = ()> + 'static) {
        let ctx = self.ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            task.await;
            ctx.request_repaint();
        });
    }

    fn resolve_session(&self) {
        let gate = self.gate.clone();
        let completed = self.completed.clone();
        self.spawn(async move {
            let state = gate.resolve().await;
            completed.borrow_mut().push(Completed::Auth(state));
        });
    }

    fn schedule_toast_expiry(&self, id: u64) {
        let expired = self.expired_toasts.clone();
        self.spawn(async move {
            TimeoutFuture::new(TOAST_LIFETIME_MS).await;
            expired.borrow_mut().push(id);
        });
    }

    // ─── Frame bookkeeping ───────────────────────────────────

    fn pump(&mut self) {
        let events = self.event_bus.drain();
        if !events.is_empty() {
            let refresh = self.ui_state.process_events(events);
            if refresh.transcript {
                self.ui_state.transcript = self.chat.transcript();
            }
            if refresh.entries {
                self.ui_state.moods = self.moods.entries();
                self.ui_state.journal = self.journal.entries();
            }
            if refresh.profile {
                let form = self.profile.form();
                self.ui_state.theme = form.theme;
                self.ui_state.profile_form = form;
            }
            if refresh.auth.is_some() {
                self.resolve_session();
            }
            for id in refresh.new_toasts {
                self.schedule_toast_expiry(id);
            }
        }

        let completed: Vec<Completed> = self.completed.borrow_mut().drain(..).collect();
        for done in completed {
            match done {
                Completed::Auth(state) => self.apply_auth(state),
                Completed::MoodLogged => self.ui_state.reset_mood_form(),
                Completed::JournalSaved => self.ui_state.close_journal_editor(),
                Completed::ProfileSaved(theme) => self.ui_state.theme = theme,
            }
        }

        let expired: Vec<u64> = self.expired_toasts.borrow_mut().drain(..).collect();
        for id in expired {
            self.ui_state.dismiss_toast(id);
        }

        self.ui_state.auth_busy = self.auth_busy.get();
        self.ui_state.chat_busy = self.chat.is_busy();
        self.ui_state.mood_busy = self.moods.is_busy();
        self.ui_state.journal_busy = self.journal.is_busy();
        self.ui_state.profile_busy = self.profile.is_busy();
    }

    fn apply_auth(&mut self, state: AuthState) {
        match state {
            AuthState::Authenticated(user) => {
                if self.ui_state.user.as_ref() == Some(&user) {
                    return;
                }
                log::info!("Session active for {}", user.id);
                self.ui_state.signed_in(user.clone());

                let chat = self.chat.clone();
                let moods = self.moods.clone();
                let journal = self.journal.clone();
                let profile = self.profile.clone();
                self.spawn(async move {
                    chat.initialize(user.clone()).await;
                    moods.load(user.clone()).await;
                    journal.load(user.clone()).await;
                    profile.load(user).await;
                });
            }
            AuthState::Unauthenticated => {
                self.chat.close();
                self.moods.close();
                self.journal.close();
                self.profile.close();
                self.ui_state.signed_out();
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.ui_state.auth_busy
            || self.ui_state.chat_busy
            || self.ui_state.mood_busy
            || self.ui_state.journal_busy
            || self.ui_state.profile_busy
    }
}

impl eframe::App for MindscapeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump();

        if self.applied_theme != Some(self.ui_state.theme) {
            theme::apply_theme(ctx, self.ui_state.theme);
            self.applied_theme = Some(self.ui_state.theme);
        }

        if self.is_busy() {
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        if self.ui_state.user.is_some() {
            TopBottomPanel::top("top_bar").show(ctx, |ui| {
                match nav_bar(ui, &self.ui_state) {
                    Some(NavAction::Go(page)) => self.ui_state.navigate(page),
                    Some(NavAction::SignOut) => {
                        let dashboard = self.dashboard.clone();
                        self.spawn(async move { dashboard.sign_out().await });
                    }
                    None => {}
                }
            });
        }

        // ── Main content ─────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_max_width(theme::CONTENT_WIDTH);
                ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                    self.show_page(ui);
                });
            });
        });

        toasts_overlay(ctx, &mut self.ui_state);
    }
}

impl MindscapeApp {
    fn show_page(&mut self, ui: &mut egui::Ui) {
        match self.ui_state.page {
            Page::Auth => {
                if let Some(action) = auth_panel(ui, &mut self.ui_state) {
                    self.dispatch_auth(action);
                }
            }
            Page::Dashboard => {
                if let Some(page) = dashboard_panel(ui, &self.ui_state) {
                    self.ui_state.navigate(page);
                }
            }
            Page::Assistant => match assistant_panel(ui, &mut self.ui_state) {
                Some(AssistantAction::Submit(text)) => self.dispatch_message(text),
                Some(AssistantAction::Back) => self.ui_state.navigate(Page::Dashboard),
                None => {}
            },
            Page::Mood => match mood_panel(ui, &mut self.ui_state) {
                Some(MoodAction::Log { mood, note }) => {
                    let moods = self.moods.clone();
                    let completed = self.completed.clone();
                    self.spawn(async move {
                        if moods.log_mood(mood, &note).await.is_done() {
                            completed.borrow_mut().push(Completed::MoodLogged);
                        }
                    });
                }
                Some(MoodAction::Back) => self.ui_state.navigate(Page::Dashboard),
                None => {}
            },
            Page::Journal => match journal_panel(ui, &mut self.ui_state) {
                Some(JournalAction::Save(draft)) => {
                    let journal = self.journal.clone();
                    let completed = self.completed.clone();
                    self.spawn(async move {
                        if journal.save(&draft).await.is_done() {
                            completed.borrow_mut().push(Completed::JournalSaved);
                        }
                    });
                }
                Some(JournalAction::Delete(id)) => {
                    let journal = self.journal.clone();
                    self.spawn(async move {
                        journal.delete(&id).await;
                    });
                }
                Some(JournalAction::Back) => self.ui_state.navigate(Page::Dashboard),
                None => {}
            },
            Page::Profile => match profile_panel(ui, &mut self.ui_state) {
                Some(ProfileAction::Save(form)) => {
                    let profile = self.profile.clone();
                    let completed = self.completed.clone();
                    self.spawn(async move {
                        if profile.save(&form).await.is_done() {
                            completed
                                .borrow_mut()
                                .push(Completed::ProfileSaved(profile.form().theme));
                        }
                    });
                }
                Some(ProfileAction::Back) => self.ui_state.navigate(Page::Dashboard),
                None => {}
            },
            Page::Goals => {
                if goals_panel(ui, &self.ui_state) {
                    self.ui_state.navigate(Page::Dashboard);
                }
            }
        }
    }

    /// Hand a chat message to the session (async)
    fn dispatch_message(&self, text: String) {
        let chat = self.chat.clone();
        self.spawn(async move {
            match chat.submit(&text).await {
                Outcome::Busy => log::warn!("Dropped message while a reply was pending"),
                Outcome::Failed(e) => log::debug!("Chat round trip failed: {}", e),
                Outcome::Done | Outcome::Skipped => {}
            }
        });
    }

    /// The auth watch reports success; this only tracks the busy flag
    fn dispatch_auth(&self, action: AuthAction) {
        if self.auth_busy.replace(true) {
            return;
        }
        let gate = self.gate.clone();
        let busy = self.auth_busy.clone();
        self.spawn(async move {
            match action {
                AuthAction::SignIn { email, password } => {
                    gate.sign_in(&email, &password).await;
                }
                AuthAction::SignUp { email, password, full_name } => {
                    gate.sign_up(&email, &password, &full_name).await;
                }
            }
            busy.set(false);
        });
    }
}

/// Build-time backend settings fill in what the stored config leaves empty
fn with_build_overrides(mut config: AppConfig) -> AppConfig {
    if config.backend.url.trim().is_empty() {
        if let Some(url) = option_env!("MINDSCAPE_BACKEND_URL") {
            config.backend.url = url.to_string();
        }
    }
    if config.backend.anon_key.is_empty() {
        if let Some(key) = option_env!("MINDSCAPE_ANON_KEY") {
            config.backend.anon_key = key.to_string();
        }
    }
    config
}
