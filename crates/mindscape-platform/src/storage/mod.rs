//! Small key-value stores for the persisted auth session and config.
//!
//! `localStorage` is synchronous, so unlike the row stores this is not an
//! async port.

pub mod memory;
pub mod local;
pub mod auto;

pub use memory::MemoryStore;
pub use local::LocalStore;
pub use auto::auto_detect_store;

use serde::{de::DeserializeOwned, Serialize};
use mindscape_types::Result;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn backend_name(&self) -> &str;
}

/// `None` when the key is missing
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
