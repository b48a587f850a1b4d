//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Store error: {0}")]
    Store(#[from] binding_store::StoreError),

    #[error("Chain error: {0}")]
    Chain(#[from] influence_client::ChainError),

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("Invalid channel id: {0}")]
    InvalidChannel(String),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
