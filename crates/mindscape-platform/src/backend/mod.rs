pub mod client;
pub mod auth;
pub mod functions;
pub mod tables;

pub use client::BackendClient;
pub use auth::RestAuth;
pub use functions::FunctionInvoker;
pub use tables::RestTables;
