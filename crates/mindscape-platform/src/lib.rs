//! Browser adapters for the MindScape core ports.
//!
//! `backend` talks to the hosted project over REST; `offline` keeps
//! everything in memory for when no project is configured.

pub mod storage;
pub mod config;
pub mod listeners;
pub mod backend;
pub mod offline;

pub use backend::{BackendClient, FunctionInvoker, RestAuth, RestTables};
pub use offline::{OfflineBackend, OfflineInvoker};
