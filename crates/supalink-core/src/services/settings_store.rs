use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::{OAuthTokens, TokenPersistence};
use crate::db::{Database, LibSqlSettingsRepository, SettingsRepository};
use crate::error::Result;
use crate::models::{Settings, SettingsPatch};

/// Persisted settings with change notification.
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    /// Snapshot of the last loaded or written settings.
    fn current(&self) -> Settings;

    fn subscribe(&self) -> watch::Receiver<Settings>;

    /// Apply a partial update, persist it and publish the result.
    async fn update(&self, patch: SettingsPatch) -> Result<()>;

    /// Reload from persistent storage and publish.
    async fn refresh(&self) -> Result<()>;
}

/// Settings backed by the libSQL settings table plus secure token storage.
#[derive(Clone)]
pub struct SettingsService<T: TokenPersistence> {
    db: Database,
    tokens: T,
    tx: Arc<watch::Sender<Settings>>,
}

impl<T: TokenPersistence> SettingsService<T> {
    pub async fn load(db: Database, tokens: T) -> Result<Self> {
        let settings = read_settings(&db, &tokens).await?;
        let (tx, _) = watch::channel(settings);
        Ok(Self {
            db,
            tokens,
            tx: Arc::new(tx),
        })
    }

    async fn persist(&self, settings: &Settings) -> Result<()> {
        LibSqlSettingsRepository::new(self.db.connection())
            .save(settings)
            .await?;

        let supabase = &settings.supabase;
        match supabase.access_token.as_deref() {
            Some(access_token) if !access_token.trim().is_empty() => {
                self.tokens.save(&OAuthTokens {
                    access_token: access_token.to_string(),
                    refresh_token: supabase.refresh_token.clone().unwrap_or_default(),
                    expires_at: supabase.expires_at.unwrap_or(i64::MAX),
                })?;
            }
            _ => self.tokens.clear()?,
        }
        Ok(())
    }
}

impl<T: TokenPersistence> SettingsStore for SettingsService<T> {
    fn current(&self) -> Settings {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    async fn update(&self, patch: SettingsPatch) -> Result<()> {
        let mut next = self.current();
        patch.apply(&mut next);
        self.persist(&next).await?;
        self.tx.send_replace(next);
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        let settings = read_settings(&self.db, &self.tokens).await?;
        self.tx.send_replace(settings);
        Ok(())
    }
}

async fn read_settings<T: TokenPersistence>(db: &Database, tokens: &T) -> Result<Settings> {
    let mut settings = LibSqlSettingsRepository::new(db.connection()).load().await?;
    if let Some(stored) = tokens.load()? {
        if stored.is_expired() {
            tracing::warn!("Stored Supabase access token has expired");
        }
        settings.supabase.access_token = Some(stored.access_token);
        settings.supabase.refresh_token =
            Some(stored.refresh_token).filter(|token| !token.is_empty());
        settings.supabase.expires_at = Some(stored.expires_at);
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::models::{SupabaseSettings, ThemeMode};

    async fn setup() -> (SettingsService<MemoryTokenStore>, MemoryTokenStore) {
        let db = Database::open_in_memory().await.unwrap();
        let tokens = MemoryTokenStore::default();
        let service = SettingsService::load(db, tokens.clone()).await.unwrap();
        (service, tokens)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_publishes_to_subscribers() {
        let (service, _) = setup().await;
        let mut rx = service.subscribe();

        service
            .update(SettingsPatch {
                theme: Some(ThemeMode::Dark),
                ..SettingsPatch::default()
            })
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().theme, ThemeMode::Dark);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn access_token_goes_to_token_store() {
        let (service, tokens) = setup().await;

        service
            .update(SettingsPatch::supabase(SupabaseSettings {
                access_token: Some("access".to_string()),
                refresh_token: Some("refresh".to_string()),
                expires_at: Some(4_000_000_000),
                ..SupabaseSettings::default()
            }))
            .await
            .unwrap();
        let stored = tokens.load().unwrap().unwrap();
        assert_eq!(stored.access_token, "access");
        assert_eq!(stored.refresh_token, "refresh");

        service
            .update(SettingsPatch::supabase(SupabaseSettings::default()))
            .await
            .unwrap();
        assert!(tokens.load().unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn refresh_picks_up_external_changes() {
        let (service, tokens) = setup().await;
        assert!(!service.current().supabase.has_access_token());

        tokens
            .save(&OAuthTokens::from_expires_in("external", "refresh", 3600))
            .unwrap();
        assert!(!service.current().supabase.has_access_token());

        service.refresh().await.unwrap();
        assert_eq!(
            service.current().supabase.access_token.as_deref(),
            Some("external")
        );
    }
}
