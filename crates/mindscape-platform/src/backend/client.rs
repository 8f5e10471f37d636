//! REST client for the hosted backend.
//!
//! Rows live under `/rest/v1/{table}`, functions under `/functions/v1/{name}`
//! and auth under `/auth/v1/`. Every request carries the public `apikey`; the
//! bearer is the signed-in user's access token, or the anon key before sign-in.
//! Uses browser `fetch()` via gloo-net for WASM compatibility.

use std::cell::RefCell;

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use mindscape_types::{AppError, Result, config::BackendConfig};

pub struct BackendClient {
    base_url: String,
    anon_key: String,
    access_token: RefCell<Option<String>>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: RefCell::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.borrow_mut() = token;
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.borrow().is_some()
    }

    pub fn rest_url(&self, table: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}/rest/v1/{}", self.base_url, table)
        } else {
            format!("{}/rest/v1/{}?{}", self.base_url, table, query)
        }
    }

    pub fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url, name)
    }

    /// `path` may carry its own query, e.g. `token?grant_type=password`
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Attach `apikey` and `Authorization`
    pub fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token
            .borrow()
            .clone()
            .unwrap_or_else(|| self.anon_key.clone());
        builder
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", bearer))
    }

    // ─── Table operations ────────────────────────────────────

    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &str) -> Result<Vec<T>> {
        let response = self
            .authorize(Request::get(&self.rest_url(table, query)))
            .send()
            .await
            .map_err(network)?;

        if !response.ok() {
            return Err(AppError::store(table, failure_message(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::store(table, e.to_string()))
    }

    /// Insert one row and return it as stored
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .authorize(Request::post(&self.rest_url(table, "")))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .json(row)
            .map_err(|e| AppError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(network)?;

        if !response.ok() {
            return Err(AppError::store(table, failure_message(response).await));
        }

        let rows: Vec<T> = response
            .json()
            .await
            .map_err(|e| AppError::store(table, e.to_string()))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::store(table, "insert returned no row"))
    }

    pub async fn update<B>(&self, table: &str, filter: &str, patch: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .authorize(Request::patch(&self.rest_url(table, filter)))
            .header("Content-Type", "application/json")
            .json(patch)
            .map_err(|e| AppError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(network)?;

        if !response.ok() {
            return Err(AppError::store(table, failure_message(response).await));
        }
        Ok(())
    }

    pub async fn delete(&self, table: &str, filter: &str) -> Result<()> {
        let response = self
            .authorize(Request::delete(&self.rest_url(table, filter)))
            .send()
            .await
            .map_err(network)?;

        if !response.ok() {
            return Err(AppError::store(table, failure_message(response).await));
        }
        Ok(())
    }
}

pub(crate) fn network(e: gloo_net::Error) -> AppError {
    AppError::Network(e.to_string())
}

/// `HTTP {status}: {detail}` for a non-2xx response
pub(crate) async fn failure_message(response: Response) -> String {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    format!("HTTP {}: {}", status, error_detail(&body))
}

/// The human-readable part of a backend error body.
///
/// The REST, auth and function services each name the field differently.
pub fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
