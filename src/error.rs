use serde_json::Value;
use thiserror::Error;

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by the ledger node client
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("RPC call {method} rejected: {reason}")]
    Rpc { method: String, reason: Value },

    #[error("Malformed RPC response: {0}")]
    MalformedResponse(String),

    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(error: reqwest::Error) -> Self {
        LedgerError::Transport(format!("{:?}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        AppError::Ledger(LedgerError::from(error))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal(format!("{:?}", error))
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        AppError::Internal(format!("Migration error: {:?}", error))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError::Config(error.to_string())
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;
