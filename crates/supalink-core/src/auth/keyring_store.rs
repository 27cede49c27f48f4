//! Supabase OAuth token persistence using the OS keyring.

use keyring::Entry;

use super::{OAuthTokens, TokenPersistence};
use crate::error::{Error, Result};

const KEYRING_SERVICE_NAME: &str = "supalink";
const KEYRING_TOKENS_USERNAME: &str = "supabase_oauth_tokens";

/// Token store backed by the OS keyring (`keyring` crate).
///
/// The desktop app and the CLI both use the default entry, so signing in
/// through either one is visible to the other.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service_name: String,
    username: String,
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE_NAME, KEYRING_TOKENS_USERNAME)
    }
}

impl KeyringTokenStore {
    pub fn new(service_name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            username: username.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service_name, &self.username)
            .map_err(|error| Error::SecureStorage(error.to_string()))
    }
}

impl TokenPersistence for KeyringTokenStore {
    fn load(&self) -> Result<Option<OAuthTokens>> {
        match self.entry()?.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::SecureStorage(error.to_string())),
        }
    }

    fn save(&self, tokens: &OAuthTokens) -> Result<()> {
        let serialized = serde_json::to_string(tokens)?;
        self.entry()?
            .set_password(&serialized)
            .map_err(|error| Error::SecureStorage(error.to_string()))
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::SecureStorage(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_store_uses_shared_entry() {
        let store = KeyringTokenStore::default();
        assert_eq!(store.service_name, "supalink");
        assert_eq!(store.username, "supabase_oauth_tokens");
    }

    #[test]
    #[ignore = "requires an OS keyring"]
    fn keyring_store_roundtrip() {
        let store = KeyringTokenStore::new(
            KEYRING_SERVICE_NAME,
            format!("test_tokens_{}", std::process::id()),
        );
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        let tokens = OAuthTokens::from_expires_in("access-1", "refresh-1", 3600);
        store.save(&tokens).unwrap();
        assert_eq!(store.load().unwrap(), Some(tokens));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
