//! Persisted configuration overrides.

use mindscape_types::config::AppConfig;
use crate::storage::KeyValueStore;

pub const CONFIG_KEY: &str = "mindscape:config";

/// Stored overrides, or the defaults when missing or unreadable
pub fn load_config(store: &dyn KeyValueStore) -> AppConfig {
    match store.get(CONFIG_KEY) {
        Ok(Some(raw)) => match AppConfig::from_json(raw.as_bytes()) {
            Ok(config) => {
                log::info!("Config restored from {}", store.backend_name());
                config
            }
            Err(e) => {
                log::warn!("Ignoring stored config: {}", e);
                AppConfig::default()
            }
        },
        Ok(None) => AppConfig::default(),
        Err(e) => {
            log::warn!("Could not read stored config: {}", e);
            AppConfig::default()
        }
    }
}
