use crate::db::{AppRepository, Database, LibSqlAppRepository};
use crate::error::{Error, Result};
use crate::models::{AppId, SettingsPatch};

use super::SettingsStore;

pub const FAKE_PROJECT_ID: &str = "fake-project-id";
pub const FAKE_PROJECT_NAME: &str = "Fake Supabase Project";

const FAKE_ACCESS_TOKEN: &str = "fake-access-token";
const FAKE_REFRESH_TOKEN: &str = "fake-refresh-token";
const FAKE_EXPIRES_IN_SECS: i64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeConnectRequest {
    pub app_id: AppId,
    pub fake_project_id: String,
}

/// Host process capabilities the panel needs.
#[allow(async_fn_in_trait)]
pub trait HostBridge {
    /// Open a URL in the system browser.
    async fn open_external_url(&self, url: &str) -> Result<()>;

    /// Simulate a completed OAuth flow (test mode only).
    async fn fake_handle_supabase_connect(&self, request: FakeConnectRequest) -> Result<()>;
}

/// Store fake credentials and link the app to the fake project.
pub async fn fake_supabase_connect<S: SettingsStore>(
    settings: &S,
    db: &Database,
    request: &FakeConnectRequest,
) -> Result<()> {
    let mut supabase = settings.current().supabase;
    supabase.access_token = Some(FAKE_ACCESS_TOKEN.to_string());
    supabase.refresh_token = Some(FAKE_REFRESH_TOKEN.to_string());
    supabase.expires_at = Some(crate::util::unix_timestamp_now() + FAKE_EXPIRES_IN_SECS);
    settings.update(SettingsPatch::supabase(supabase)).await?;

    LibSqlAppRepository::new(db.connection())
        .set_supabase_project(
            request.app_id,
            &request.fake_project_id,
            Some(FAKE_PROJECT_NAME),
        )
        .await?;
    tracing::info!(
        "Fake-connected app {} to project {}",
        request.app_id,
        request.fake_project_id
    );
    Ok(())
}

/// Host bridge backed by the system URL opener.
#[derive(Clone)]
pub struct SystemHost<S> {
    settings: S,
    db: Database,
}

impl<S: SettingsStore> SystemHost<S> {
    pub const fn new(settings: S, db: Database) -> Self {
        Self { settings, db }
    }
}

impl<S: SettingsStore> HostBridge for SystemHost<S> {
    async fn open_external_url(&self, url: &str) -> Result<()> {
        if !crate::util::is_http_url(url) {
            return Err(Error::InvalidInput(format!("Refusing to open '{url}'")));
        }
        tracing::debug!("Opening {}", url);
        open::that_detached(url)?;
        Ok(())
    }

    async fn fake_handle_supabase_connect(&self, request: FakeConnectRequest) -> Result<()> {
        fake_supabase_connect(&self.settings, &self.db, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStore, TokenPersistence};
    use crate::services::SettingsService;

    #[tokio::test(flavor = "multi_thread")]
    async fn fake_connect_stores_token_and_links_app() {
        let db = Database::open_in_memory().await.unwrap();
        let tokens = MemoryTokenStore::default();
        let settings = SettingsService::load(db.clone(), tokens.clone())
            .await
            .unwrap();
        let app = LibSqlAppRepository::new(db.connection())
            .create("Todo App")
            .await
            .unwrap();

        let host = SystemHost::new(settings.clone(), db.clone());
        host.fake_handle_supabase_connect(FakeConnectRequest {
            app_id: app.id,
            fake_project_id: FAKE_PROJECT_ID.to_string(),
        })
        .await
        .unwrap();

        assert!(settings.current().supabase.has_access_token());
        assert!(tokens.load().unwrap().is_some());
        let linked = LibSqlAppRepository::new(db.connection())
            .get(app.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(linked.supabase_project_id.as_deref(), Some(FAKE_PROJECT_ID));
        assert_eq!(
            linked.supabase_project_name.as_deref(),
            Some(FAKE_PROJECT_NAME)
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn open_external_url_rejects_non_http() {
        let db = Database::open_in_memory().await.unwrap();
        let settings = SettingsService::load(db.clone(), MemoryTokenStore::default())
            .await
            .unwrap();
        let host = SystemHost::new(settings, db);
        assert!(host.open_external_url("file:///etc/passwd").await.is_err());
    }
}
