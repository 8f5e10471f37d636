//! Auth listener registry shared by the auth adapters.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mindscape_core::ports::{AuthListener, Subscription};
use mindscape_types::session::AuthChange;

type Listener = Rc<dyn Fn(&AuthChange)>;

#[derive(Clone, Default)]
pub struct AuthListeners {
    listeners: Rc<RefCell<Vec<(u64, Listener)>>>,
    next_id: Rc<Cell<u64>>,
}

impl AuthListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: AuthListener) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::from(listener)));

        let listeners = self.listeners.clone();
        Subscription::new(move || {
            listeners.borrow_mut().retain(|(other, _)| *other != id);
        })
    }

    /// Listeners may subscribe or unsubscribe while being notified
    pub fn broadcast(&self, change: &AuthChange) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            listener(change);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
