//! Pick the best available key-value store.
//!
//! Priority: localStorage → memory (private browsing, storage disabled)

use std::rc::Rc;
use super::{KeyValueStore, LocalStore, MemoryStore};

pub fn auto_detect_store() -> Rc<dyn KeyValueStore> {
    match LocalStore::open() {
        Ok(local) => {
            log::info!("Key-value store: localStorage");
            Rc::new(local)
        }
        Err(e) => {
            log::warn!("localStorage unavailable ({}), falling back to memory", e);
            Rc::new(MemoryStore::new())
        }
    }
}
