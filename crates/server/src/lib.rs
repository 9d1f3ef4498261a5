//! HTTP surface and process wiring for GraphRAG QA

pub mod config;
pub mod routes;
pub mod server;
pub mod state;

mod error;

pub use config::AppConfig;
pub use error::{ApiError, Result, ServerError};
pub use server::{router, start_server};
pub use state::AppContext;
