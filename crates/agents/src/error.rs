//! Agent error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Core(#[from] graphrag_qa_core::CoreError),

    #[error("Database error: {0}")]
    Database(#[from] graphrag_qa_db::DbError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Language model API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
