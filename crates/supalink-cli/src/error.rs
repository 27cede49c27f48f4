use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] supalink_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("App not found: {0}")]
    AppNotFound(String),
    #[error("App name cannot be empty")]
    EmptyAppName,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Not signed in to Supabase. Run `supalink login --app <ID>` first.")]
    NotSignedIn,
    /// The action already reported its failure on stderr
    #[error("{0}")]
    ActionFailed(String),
}
