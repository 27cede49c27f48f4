use crate::auth::TokenPersistence;
use crate::config::BootstrapConfig;
use crate::db::Database;
use crate::error::Result;
use crate::health::{HealthProbe, HttpHealthProbe};
use crate::models::AppId;
use crate::services::{
    AppLoader, AppSource, HostBridge, ProjectDirectory, SettingsService, SettingsStore,
    SupabaseProjects, SystemHost,
};
use crate::supabase::ManagementClient;

use super::Notifier;

/// Everything a panel talks to, bundled so the panel stays generic over
/// real and fake collaborators.
pub trait PanelBackend {
    type Settings: SettingsStore;
    type App: AppSource;
    type Projects: ProjectDirectory;
    type Host: HostBridge;
    type Probe: HealthProbe;
    type Notifier: Notifier;

    fn settings(&self) -> &Self::Settings;
    fn app(&self) -> &Self::App;
    fn projects(&self) -> &Self::Projects;
    fn host(&self) -> &Self::Host;
    fn probe(&self) -> &Self::Probe;
    fn notifier(&self) -> &Self::Notifier;
    fn config(&self) -> &BootstrapConfig;
}

/// Backend wired to libSQL, the Management API and the system browser.
#[derive(Clone)]
pub struct ServiceBackend<T: TokenPersistence, N> {
    settings: SettingsService<T>,
    app: AppLoader,
    projects: SupabaseProjects<SettingsService<T>>,
    host: SystemHost<SettingsService<T>>,
    probe: HttpHealthProbe,
    notifier: N,
    config: BootstrapConfig,
}

impl<T: TokenPersistence, N: Notifier> ServiceBackend<T, N> {
    pub async fn new(
        db: Database,
        settings: SettingsService<T>,
        app_id: AppId,
        config: BootstrapConfig,
        notifier: N,
    ) -> Result<Self> {
        let client = ManagementClient::new(&config.management_api_url)?;
        Ok(Self {
            app: AppLoader::load(db.clone(), app_id).await?,
            projects: SupabaseProjects::new(client, db.clone(), settings.clone()),
            host: SystemHost::new(settings.clone(), db),
            probe: HttpHealthProbe::new()?,
            settings,
            notifier,
            config,
        })
    }
}

impl<T: TokenPersistence, N: Notifier> PanelBackend for ServiceBackend<T, N> {
    type Settings = SettingsService<T>;
    type App = AppLoader;
    type Projects = SupabaseProjects<SettingsService<T>>;
    type Host = SystemHost<SettingsService<T>>;
    type Probe = HttpHealthProbe;
    type Notifier = N;

    fn settings(&self) -> &Self::Settings {
        &self.settings
    }

    fn app(&self) -> &Self::App {
        &self.app
    }

    fn projects(&self) -> &Self::Projects {
        &self.projects
    }

    fn host(&self) -> &Self::Host {
        &self.host
    }

    fn probe(&self) -> &Self::Probe {
        &self.probe
    }

    fn notifier(&self) -> &Self::Notifier {
        &self.notifier
    }

    fn config(&self) -> &BootstrapConfig {
        &self.config
    }
}
