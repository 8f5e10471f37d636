//! UI-level state that drives rendering.
//!
//! Form buffers live here; everything else is a read-only projection of the
//! page controllers, refreshed by the app after it drains the EventBus.

use mindscape_core::journal::JournalDraft;
use mindscape_core::profile::ProfileForm;
use mindscape_types::entry::{JournalEntry, Mood, MoodEntry, ThemePreference};
use mindscape_types::event::{AppEvent, Notification};
use mindscape_types::message::TranscriptEntry;
use mindscape_types::session::UserIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Auth,
    Dashboard,
    Assistant,
    Mood,
    Journal,
    Profile,
    Goals,
}

impl Page {
    /// Pages that need a signed-in user
    pub fn is_protected(&self) -> bool {
        !matches!(self, Page::Auth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

/// What the app should re-read from the controllers after a batch of events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Refresh {
    pub transcript: bool,
    pub entries: bool,
    pub profile: bool,
    /// Set when sign-in state flipped
    pub auth: Option<bool>,
    /// Toasts added by this batch; the app schedules their expiry
    pub new_toasts: Vec<u64>,
}

/// State visible to UI pages
pub struct UiState {
    pub page: Page,
    pub user: Option<UserIdentity>,
    pub theme: ThemePreference,
    pub toasts: Vec<Toast>,
    next_toast_id: u64,

    pub auth_form: AuthForm,
    pub auth_busy: bool,

    pub transcript: Vec<TranscriptEntry>,
    /// Assistant input field content
    pub input_text: String,
    pub chat_busy: bool,

    pub moods: Vec<MoodEntry>,
    pub selected_mood: Option<Mood>,
    pub mood_note: String,
    pub mood_busy: bool,

    pub journal: Vec<JournalEntry>,
    pub journal_draft: JournalDraft,
    /// Whether the editor is open
    pub journal_editing: bool,
    /// Entry awaiting delete confirmation
    pub confirm_delete: Option<String>,
    pub journal_busy: bool,

    pub profile_form: ProfileForm,
    pub profile_busy: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            page: Page::Auth,
            user: None,
            theme: ThemePreference::default(),
            toasts: Vec::new(),
            next_toast_id: 0,
            auth_form: AuthForm::default(),
            auth_busy: false,
            transcript: Vec::new(),
            input_text: String::new(),
            chat_busy: false,
            moods: Vec::new(),
            selected_mood: None,
            mood_note: String::new(),
            mood_busy: false,
            journal: Vec::new(),
            journal_draft: JournalDraft::default(),
            journal_editing: false,
            confirm_delete: None,
            journal_busy: false,
            profile_form: ProfileForm::default(),
            profile_busy: false,
        }
    }

    /// Process events from the EventBus
    pub fn process_events(&mut self, events: Vec<AppEvent>) -> Refresh {
        let mut refresh = Refresh::default();
        for event in events {
            match event {
                AppEvent::Notify(notification) => {
                    let id = self.push_toast(notification);
                    refresh.new_toasts.push(id);
                }
                AppEvent::TranscriptChanged => refresh.transcript = true,
                AppEvent::EntriesChanged => refresh.entries = true,
                AppEvent::ProfileLoaded => refresh.profile = true,
                AppEvent::AuthChanged { signed_in } => {
                    refresh.auth = Some(signed_in);
                }
            }
        }
        refresh
    }

    pub fn push_toast(&mut self, notification: Notification) -> u64 {
        let id = self.next_toast_id;
        self.next_toast_id += 1;
        self.toasts.push(Toast { id, notification });
        id
    }

    pub fn dismiss_toast(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    pub fn navigate(&mut self, page: Page) {
        if page.is_protected() && self.user.is_none() {
            self.page = Page::Auth;
            return;
        }
        if page == Page::Journal {
            self.close_journal_editor();
        }
        self.page = page;
    }

    pub fn signed_in(&mut self, user: UserIdentity) {
        self.user = Some(user);
        self.auth_form = AuthForm::default();
        if self.page == Page::Auth {
            self.page = Page::Dashboard;
        }
    }

    /// Drop every projection and form so nothing of the previous user remains
    pub fn signed_out(&mut self) {
        let toasts = std::mem::take(&mut self.toasts);
        let next_toast_id = self.next_toast_id;
        *self = Self::new();
        self.toasts = toasts;
        self.next_toast_id = next_toast_id;
    }

    // ─── Journal editor ──────────────────────────────────────

    pub fn open_new_entry(&mut self) {
        self.journal_draft = JournalDraft::default();
        self.journal_editing = true;
    }

    pub fn open_entry(&mut self, entry: &JournalEntry) {
        self.journal_draft = JournalDraft::edit(entry);
        self.journal_editing = true;
    }

    pub fn close_journal_editor(&mut self) {
        self.journal_draft = JournalDraft::default();
        self.journal_editing = false;
    }

    /// After a successful mood save
    pub fn reset_mood_form(&mut self) {
        self.selected_mood = None;
        self.mood_note.clear();
    }

    pub fn is_dark(&self) -> bool {
        self.theme == ThemePreference::Dark
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
