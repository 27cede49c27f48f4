use std::path::{Path, PathBuf};

use serde::Serialize;
use supalink_core::auth::TokenPersistence;
use supalink_core::config::BootstrapConfig;
use supalink_core::db::{default_db_path, AppRepository, Database, LibSqlAppRepository};
use supalink_core::panel::{
    ConnectionPanel, Notifier, PanelBackend, PanelView, PickerBody, ServiceBackend, Toast,
    ToastLevel, ToastQueue, NO_PROJECTS_MESSAGE,
};
use supalink_core::services::SettingsService;
use supalink_core::{App, AppId};

use crate::error::CliError;

pub type CliPanel<T> = ConnectionPanel<ServiceBackend<T, ConsoleNotifier>>;

/// Everything a command needs besides its own arguments.
pub struct CliContext<T> {
    pub db_path: PathBuf,
    pub tokens: T,
    pub config: BootstrapConfig,
}

impl<T: TokenPersistence> CliContext<T> {
    pub fn new(db_path: Option<PathBuf>, tokens: T, config: BootstrapConfig) -> Self {
        Self {
            db_path: resolve_db_path(db_path),
            tokens,
            config,
        }
    }

    pub async fn open_database(&self) -> Result<Database, CliError> {
        Ok(Database::open(&self.db_path).await?)
    }

    pub async fn open_settings(&self, db: &Database) -> Result<SettingsService<T>, CliError> {
        Ok(SettingsService::load(db.clone(), self.tokens.clone()).await?)
    }

    /// Panel for an existing app.
    pub async fn open_panel(&self, app_id: AppId) -> Result<(CliPanel<T>, App), CliError> {
        let db = self.open_database().await?;
        let app = require_app(&db, app_id).await?;
        let settings = self.open_settings(&db).await?;
        let backend = ServiceBackend::new(
            db,
            settings,
            app_id,
            self.config.clone(),
            ConsoleNotifier::default(),
        )
        .await?;
        Ok((ConnectionPanel::new(backend), app))
    }
}

pub fn resolve_db_path(db_path: Option<PathBuf>) -> PathBuf {
    db_path.unwrap_or_else(default_db_path)
}

pub async fn require_app(db: &Database, app_id: AppId) -> Result<App, CliError> {
    LibSqlAppRepository::new(db.connection())
        .get(app_id)
        .await?
        .ok_or_else(|| CliError::AppNotFound(app_id.to_string()))
}

pub fn database_label(path: &Path) -> String {
    path.display().to_string()
}

/// Prints successes right away; errors are kept for the exit status.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier {
    toasts: ToastQueue,
}

impl ConsoleNotifier {
    /// Fail with the first error toast reported since the last call.
    pub fn finish(&self) -> Result<(), CliError> {
        match self
            .toasts
            .drain()
            .into_iter()
            .find(|toast| toast.level == ToastLevel::Error)
        {
            Some(toast) => Err(CliError::ActionFailed(toast.message)),
            None => Ok(()),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        if toast.level == ToastLevel::Success {
            println!("{}", toast.message);
        }
        self.toasts.notify(toast);
    }
}

pub fn finish<T: TokenPersistence>(panel: &CliPanel<T>) -> Result<(), CliError> {
    panel.backend().notifier().finish()
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusItem {
    pub app_id: i64,
    pub app_name: String,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn status_item(app: &App, view: &PanelView) -> StatusItem {
    let mut item = StatusItem {
        app_id: app.id.0,
        app_name: app.name.clone(),
        state: "setup",
        project_id: None,
        project_name: None,
        dashboard_url: None,
        local_url: None,
        error: None,
    };

    match view {
        PanelView::ConnectedProject {
            project_id,
            project_name,
            dashboard_url,
        } => {
            item.state = "connected_project";
            item.project_id = Some(project_id.clone());
            item.project_name = Some(project_name.clone());
            item.dashboard_url = Some(dashboard_url.clone());
        }
        PanelView::ProjectPicker(body) => {
            item.state = "project_picker";
            match body {
                PickerBody::Failed { message } => item.error = Some(message.clone()),
                PickerBody::Ready {
                    current_project_id, ..
                } => item.project_id.clone_from(current_project_id),
                PickerBody::Loading | PickerBody::Empty => {}
            }
        }
        PanelView::LocalConnected { url } => {
            item.state = "local_connected";
            item.local_url = Some(url.clone());
        }
        PanelView::SetupForm(_) => {}
    }
    item
}

/// Plain-text rendering of a panel view, one line per entry.
pub fn render_view(view: &PanelView) -> Vec<String> {
    match view {
        PanelView::ConnectedProject {
            project_id,
            project_name,
            dashboard_url,
        } => vec![
            format!("Connected to Supabase project: {project_name} ({project_id})"),
            format!("Dashboard: {dashboard_url}"),
        ],
        PanelView::ProjectPicker(body) => render_picker(body),
        PanelView::LocalConnected { url } => {
            vec![format!("Connected to local Supabase at {url}")]
        }
        PanelView::SetupForm(_) => vec![
            "Not connected to Supabase.".to_string(),
            "Run `supalink connect-local` for a local instance or `supalink login` for Supabase Cloud."
                .to_string(),
        ],
    }
}

pub fn render_picker(body: &PickerBody) -> Vec<String> {
    let mut lines = match body {
        PickerBody::Loading => vec!["Loading Supabase projects...".to_string()],
        PickerBody::Failed { message } => vec![format!("Error loading projects: {message}")],
        PickerBody::Empty => vec![NO_PROJECTS_MESSAGE.to_string()],
        PickerBody::Ready {
            projects,
            current_project_id,
            ..
        } => {
            let mut lines = vec!["Supabase projects:".to_string()];
            lines.extend(projects.iter().map(|project| {
                let marker = if current_project_id.as_deref() == Some(project.id.as_str()) {
                    '*'
                } else {
                    ' '
                };
                format!("{marker} {}  {}", project.id, project.display_name())
            }));
            lines
        }
    };
    lines.extend(body.current_project_notice());
    lines
}
