//! MindScape core: everything a page does, minus the browser.

pub mod ports;
pub mod event_bus;
pub mod flight;
pub mod auth;
pub mod chat;
pub mod mood;
pub mod journal;
pub mod profile;
pub mod dashboard;

#[cfg(test)]
mod tests;

pub use chat::ChatSession;
pub use flight::Outcome;
