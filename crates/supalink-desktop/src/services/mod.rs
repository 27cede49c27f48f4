//! Desktop services
//!
//! Wires the core stores to the desktop environment: libSQL on disk, the OS
//! keyring and the deep-link inbox.

mod deep_links;
mod notifier;

pub use deep_links::{dispatch_deep_link, handoff_deep_link, INBOX_POLL_INTERVAL};
pub use notifier::{DesktopNotifier, ToastEntry};
pub use supalink_core::auth::KeyringTokenStore;

use supalink_core::config::BootstrapConfig;
use supalink_core::db::{default_db_path, AppRepository, Database, LibSqlAppRepository};
use supalink_core::deep_link::DeepLinkNotifier;
use supalink_core::models::{App, SettingsPatch};
use supalink_core::services::{SettingsService, SettingsStore};
use supalink_core::Result;

use crate::bootstrap_config::test_mode_forced;

/// Long-lived handles shared by every window component.
#[derive(Clone)]
pub struct DesktopServices {
    pub db: Database,
    pub settings: SettingsService<KeyringTokenStore>,
    pub config: BootstrapConfig,
    pub deep_links: DeepLinkNotifier,
}

impl DesktopServices {
    pub async fn open(config: BootstrapConfig) -> Result<Self> {
        let db_path = default_db_path();
        tracing::info!("Opening database at {}", db_path.display());
        let db = Database::open(&db_path).await?;

        let settings = SettingsService::load(db.clone(), KeyringTokenStore::default()).await?;
        if test_mode_forced() && !settings.current().is_test_mode {
            tracing::info!("SUPALINK_TEST_MODE is set, enabling test mode");
            settings
                .update(SettingsPatch {
                    is_test_mode: Some(true),
                    ..SettingsPatch::default()
                })
                .await?;
        }

        Ok(Self {
            db,
            settings,
            config,
            deep_links: DeepLinkNotifier::new(),
        })
    }

    pub async fn list_apps(&self) -> Result<Vec<App>> {
        LibSqlAppRepository::new(self.db.connection()).list().await
    }

    pub async fn create_app(&self, name: &str) -> Result<App> {
        LibSqlAppRepository::new(self.db.connection())
            .create(name)
            .await
    }
}
