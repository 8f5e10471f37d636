use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Store error: {table}: {message}")]
    Store { table: String, message: String },

    #[error("Function error: {0}")]
    Invoke(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),
}

impl AppError {
    pub fn store(table: &str, message: impl Into<String>) -> Self {
        AppError::Store {
            table: table.to_string(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}
