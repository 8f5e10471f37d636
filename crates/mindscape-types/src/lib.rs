pub mod message;
pub mod entry;
pub mod event;
pub mod config;
pub mod error;
pub mod session;


pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
