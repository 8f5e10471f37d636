//! Profile & settings page controller.

use std::cell::RefCell;
use std::rc::Rc;

use mindscape_types::{
    entry::{Profile, ProfileUpdate, ThemePreference},
    event::{AppEvent, Notification},
    session::UserIdentity,
};
use crate::event_bus::EventBus;
use crate::flight::{Epoch, InFlight, Outcome};
use crate::ports::ProfileStorePort;

/// Editable profile fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub full_name: String,
    pub bio: String,
    pub theme: ThemePreference,
}

impl From<Profile> for ProfileForm {
    fn from(profile: Profile) -> Self {
        Self {
            full_name: profile.full_name.unwrap_or_default(),
            bio: profile.bio.unwrap_or_default(),
            theme: profile.theme_preference.unwrap_or_default(),
        }
    }
}

pub struct ProfileEditor {
    store: Rc<dyn ProfileStorePort>,
    event_bus: EventBus,
    user: RefCell<Option<UserIdentity>>,
    form: RefCell<ProfileForm>,
    flight: InFlight,
    epoch: Epoch,
}

impl ProfileEditor {
    pub fn new(store: Rc<dyn ProfileStorePort>, event_bus: EventBus) -> Self {
        Self {
            store,
            event_bus,
            user: RefCell::new(None),
            form: RefCell::new(ProfileForm::default()),
            flight: InFlight::new(),
            epoch: Epoch::default(),
        }
    }

    /// Missing profile or a failed load both leave the defaults in place.
    /// A load overtaken by `close` or another `load` writes nothing.
    pub async fn load(&self, user: UserIdentity) {
        let epoch = self.rebind(Some(user.clone()));

        let profile = match self.store.get(&user.id).await {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => {
                log::debug!("No profile row for {}", user.id);
                None
            }
            Err(e) => {
                log::error!("Error loading profile: {}", e);
                None
            }
        };
        if !self.epoch.is_current(epoch) {
            log::debug!("Discarding profile for {}: session changed", user.id);
            return;
        }
        if let Some(profile) = profile {
            *self.form.borrow_mut() = profile.into();
        }
        self.event_bus.emit(AppEvent::ProfileLoaded);
    }

    pub async fn save(&self, form: &ProfileForm) -> Outcome {
        let Some(user) = self.user.borrow().clone() else {
            return Outcome::Skipped;
        };
        let Some(_guard) = self.flight.try_begin() else {
            return Outcome::Busy;
        };
        let epoch = self.epoch.current();

        let update = ProfileUpdate {
            full_name: form.full_name.trim().to_string(),
            bio: form.bio.trim().to_string(),
            theme_preference: form.theme,
        };

        let result = self.store.update(&user.id, update.clone()).await;
        if !self.epoch.is_current(epoch) {
            log::info!("Dropping profile save result for {}: session changed", user.id);
            return Outcome::Skipped;
        }

        match result {
            Ok(()) => {
                *self.form.borrow_mut() = ProfileForm {
                    full_name: update.full_name,
                    bio: update.bio,
                    theme: update.theme_preference,
                };
                self.event_bus
                    .notify(Notification::info("Profile updated!", "Your changes have been saved."));
                Outcome::Done
            }
            Err(e) => {
                log::error!("Error saving profile: {}", e);
                self.event_bus
                    .notify(Notification::error("Failed to save profile. Please try again."));
                Outcome::Failed(e)
            }
        }
    }

    /// Last loaded or saved values
    pub fn form(&self) -> ProfileForm {
        self.form.borrow().clone()
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
        *self.form.borrow_mut() = ProfileForm::default();
        self.epoch.advance()
    }
}
