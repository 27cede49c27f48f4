//! Error types for supalink-core

use thiserror::Error;

/// Result type alias using supalink-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in supalink-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Supabase API returned an error payload
    #[error("Supabase API error: {0}")]
    Api(String),

    /// Local Supabase instance did not answer its health check
    #[error("Supabase not reachable at {0}")]
    Unreachable(String),

    /// Supabase cloud access is required but no token is stored
    #[error("Not connected to Supabase. Sign in first.")]
    NotAuthenticated,

    /// OS keyring / secure storage error
    #[error("Secure storage error: {0}")]
    SecureStorage(String),

    /// Malformed or unsupported deep link
    #[error("Invalid deep link: {0}")]
    DeepLink(String),
}
