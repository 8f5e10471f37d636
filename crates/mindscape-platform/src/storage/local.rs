//! Browser `localStorage` store.

use wasm_bindgen::JsValue;
use mindscape_types::{AppError, Result};
use super::KeyValueStore;

pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| AppError::JsInterop("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| AppError::JsInterop("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_err)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_err)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_err)
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}

fn js_err(e: JsValue) -> AppError {
    AppError::JsInterop(format!("{:?}", e))
}
