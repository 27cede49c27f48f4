//! The Supabase connection panel for one app.
//!
//! `ConnectionPanel` derives a [`PanelView`] from the current store snapshots
//! and turns user actions into collaborator calls. Handlers never return
//! errors; every failure ends up as a [`Toast`].

mod backend;
mod toast;
mod view;


pub use backend::{PanelBackend, ServiceBackend};
pub use toast::{Notifier, Toast, ToastLevel, ToastQueue};
pub use view::{derive_view, LocalForm, PanelView, PickerBody, NO_PROJECTS_MESSAGE};

use crate::deep_link::{DeepLink, SUPABASE_OAUTH_RETURN};
use crate::error::{Error, Result};
use crate::health::HealthProbe;
use crate::models::{AppId, SettingsPatch};
use crate::services::{
    AppSource, FakeConnectRequest, HostBridge, ProjectDirectory, SettingsStore, FAKE_PROJECT_ID,
};

pub struct ConnectionPanel<B> {
    backend: B,
}

impl<B: PanelBackend> ConnectionPanel<B> {
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub fn app_id(&self) -> AppId {
        self.backend.app().app_id()
    }

    pub fn view(&self) -> PanelView {
        derive_view(
            &self.backend.settings().current(),
            self.backend.app().current().as_ref(),
            &self.backend.projects().state(),
            self.backend.config(),
        )
    }

    /// Load the project list if signed in. Call on mount and whenever the
    /// access token changes.
    pub async fn activate(&self) {
        if self.backend.settings().current().supabase.has_access_token() {
            self.load_projects().await;
        }
    }

    /// Fetch projects; failures are shown in the picker, not as toasts.
    pub async fn load_projects(&self) {
        if let Err(error) = self.backend.projects().load_projects().await {
            tracing::debug!("Project list load failed: {}", error);
        }
    }

    pub async fn retry(&self) {
        self.load_projects().await;
    }

    pub async fn handle_project_select(&self, project_id: &str) {
        if let Err(error) = self.select_project(project_id).await {
            self.notify(Toast::error(format!(
                "Failed to connect project to app: {error}"
            )));
        }
    }

    async fn select_project(&self, project_id: &str) -> Result<()> {
        self.backend
            .projects()
            .set_app_project(project_id, self.app_id())
            .await?;
        self.notify(Toast::success("Project connected to app successfully"));
        self.backend.app().refresh().await
    }

    pub async fn handle_unset_project(&self) {
        if let Err(error) = self.unset_project().await {
            tracing::error!("Failed to disconnect project: {}", error);
            self.notify(Toast::error("Failed to disconnect project from app"));
        }
    }

    async fn unset_project(&self) -> Result<()> {
        self.backend
            .projects()
            .unset_app_project(self.app_id())
            .await?;
        self.notify(Toast::success("Project disconnected from app successfully"));
        self.backend.app().refresh().await?;

        let settings = self.backend.settings();
        let mut supabase = settings.current().supabase;
        supabase.local_url = None;
        supabase.local_anon_key = None;
        settings.update(SettingsPatch::supabase(supabase)).await?;
        settings.refresh().await
    }

    pub async fn handle_local_connect(&self, form: &LocalForm) {
        if let Err(error) = self.connect_local(form).await {
            self.notify(Toast::error(format!(
                "Failed to connect to local Supabase: {error}"
            )));
        }
    }

    async fn connect_local(&self, form: &LocalForm) -> Result<()> {
        if !form.can_connect() {
            return Err(Error::InvalidInput(
                "URL and anon key are required".to_string(),
            ));
        }
        let url = form.url.trim();
        let anon_key = form.anon_key.trim();

        self.backend.probe().check(url).await?;

        let settings = self.backend.settings();
        let mut supabase = settings.current().supabase;
        supabase.local_url = Some(url.to_string());
        supabase.local_anon_key = Some(anon_key.to_string());
        settings.update(SettingsPatch::supabase(supabase)).await?;

        self.backend
            .projects()
            .unset_app_project(self.app_id())
            .await?;
        self.notify(Toast::success("Connected to local Supabase instance"));
        self.backend.app().refresh().await?;
        settings.refresh().await
    }

    /// Start the OAuth flow, or fake it in test mode.
    pub async fn handle_oauth_connect(&self) {
        if let Err(error) = self.connect_oauth().await {
            self.notify(Toast::error(format!(
                "Failed to connect to Supabase: {error}"
            )));
        }
    }

    async fn connect_oauth(&self) -> Result<()> {
        if self.backend.settings().current().is_test_mode {
            self.backend
                .host()
                .fake_handle_supabase_connect(FakeConnectRequest {
                    app_id: self.app_id(),
                    fake_project_id: FAKE_PROJECT_ID.to_string(),
                })
                .await?;
            self.backend.settings().refresh().await?;
            return self.backend.app().refresh().await;
        }

        let url = self.backend.config().oauth_login_url.clone();
        self.backend.host().open_external_url(&url).await
    }

    /// Open the dashboard of the linked project. No-op when nothing is linked.
    pub async fn open_dashboard(&self) {
        let PanelView::ConnectedProject { dashboard_url, .. } = self.view() else {
            return;
        };
        if let Err(error) = self.backend.host().open_external_url(&dashboard_url).await {
            self.notify(Toast::error(format!(
                "Failed to open Supabase dashboard: {error}"
            )));
        }
    }

    /// React to a deep link delivered to this window.
    pub async fn handle_deep_link(&self, link: &DeepLink) {
        if link.kind() != SUPABASE_OAUTH_RETURN {
            return;
        }
        if let Err(error) = self.backend.settings().refresh().await {
            tracing::warn!("Failed to refresh settings after OAuth return: {}", error);
        }
        if let Err(error) = self.backend.app().refresh().await {
            tracing::warn!("Failed to refresh app after OAuth return: {}", error);
        }
    }

    fn notify(&self, toast: Toast) {
        self.backend.notifier().notify(toast);
    }
}
