//! HTTP surface of the application.
//!
//! The router serves the server-rendered form page at `/` and a JSON API
//! under `/api/` for the controlled form. `start_server` binds it and runs
//! it in a background task.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::app_router;
pub use server::{start_server, AppServer, ServerError, ServerSession};
pub use types::ApiContext;
