//! AI chat function adapter.
//!
//! Posts the whole conversation to the backend's chat function and hands the
//! response body back untouched; reply extraction happens in core.

use std::rc::Rc;

use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::{json, Value};

use mindscape_core::ports::AiInvokerPort;
use mindscape_types::{AppError, Result, message::ChatTurn};
use super::client::{failure_message, network, BackendClient};

pub struct FunctionInvoker {
    client: Rc<BackendClient>,
    function: String,
}

impl FunctionInvoker {
    pub fn new(client: Rc<BackendClient>, function: impl Into<String>) -> Self {
        Self {
            client,
            function: function.into(),
        }
    }
}

pub fn request_body(turns: &[ChatTurn]) -> Value {
    json!({ "messages": turns })
}

#[async_trait(?Send)]
impl AiInvokerPort for FunctionInvoker {
    async fn invoke(&self, turns: &[ChatTurn]) -> Result<Value> {
        let url = self.client.function_url(&self.function);
        log::debug!("Invoking {} with {} turns", self.function, turns.len());

        let response = self
            .client
            .authorize(Request::post(&url))
            .header("Content-Type", "application/json")
            .json(&request_body(turns))
            .map_err(|e| AppError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(network)?;

        if !response.ok() {
            return Err(AppError::Invoke(failure_message(response).await));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Invoke(e.to_string()))
    }
}
