//! Supabase OAuth token handling.
//!
//! The OAuth exchange itself happens out of process; the broker hands the
//! resulting tokens back through a deep link. This module only models and
//! persists them.

mod keyring_store;

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::unix_timestamp_now;

pub use keyring_store::KeyringTokenStore;

const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds
    pub expires_at: i64,
}

impl OAuthTokens {
    /// Build tokens from an `expires_in` duration relative to now.
    pub fn from_expires_in(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: i64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at: unix_timestamp_now().saturating_add(expires_in),
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= unix_timestamp_now() + EXPIRY_SKEW_SECONDS
    }
}

impl fmt::Debug for OAuthTokens {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Secure storage for OAuth tokens.
pub trait TokenPersistence: Clone + Send + Sync + 'static {
    fn load(&self) -> Result<Option<OAuthTokens>>;
    fn save(&self, tokens: &OAuthTokens) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-local token store, used by tests and when no keyring is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<Mutex<Option<OAuthTokens>>>,
}

impl MemoryTokenStore {
    pub fn with_tokens(tokens: OAuthTokens) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(Some(tokens))),
        }
    }
}

impl TokenPersistence for MemoryTokenStore {
    fn load(&self) -> Result<Option<OAuthTokens>> {
        let guard = self
            .tokens
            .lock()
            .map_err(|error| Error::SecureStorage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, tokens: &OAuthTokens) -> Result<()> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|error| Error::SecureStorage(error.to_string()))?;
        *guard = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|error| Error::SecureStorage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}
