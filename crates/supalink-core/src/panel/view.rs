//! Which of the four panel views to show, derived from store snapshots.

use crate::config::BootstrapConfig;
use crate::models::{App, Project, Settings};
use crate::services::ProjectListState;

pub const NO_PROJECTS_MESSAGE: &str = "No projects found in your Supabase account.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    /// Signed in and the app is linked to a cloud project.
    ConnectedProject {
        project_id: String,
        project_name: String,
        dashboard_url: String,
    },
    /// Signed in, no project linked yet.
    ProjectPicker(PickerBody),
    /// Not signed in, app uses a local instance.
    LocalConnected { url: String },
    /// Nothing configured; form seeded from settings.
    SetupForm(LocalForm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerBody {
    Loading,
    Failed {
        message: String,
    },
    Empty,
    Ready {
        projects: Vec<Project>,
        current_project_id: Option<String>,
        /// Name of the current project, falling back to its id
        current_project_label: Option<String>,
    },
}

impl PickerBody {
    /// "This app is connected to project: ..." line, if a project is set.
    pub fn current_project_notice(&self) -> Option<String> {
        match self {
            Self::Ready {
                current_project_label: Some(label),
                ..
            } => Some(format!("This app is connected to project: {label}")),
            _ => None,
        }
    }
}

/// Transient local-connection form state.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LocalForm {
    pub url: String,
    pub anon_key: String,
}

impl LocalForm {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            url: settings.supabase.local_url.clone().unwrap_or_default(),
            anon_key: settings.supabase.local_anon_key.clone().unwrap_or_default(),
        }
    }

    /// Both fields non-empty after trimming.
    pub fn can_connect(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

impl std::fmt::Debug for LocalForm {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LocalForm")
            .field("url", &self.url)
            .field(
                "anon_key",
                &if self.anon_key.is_empty() { "" } else { "[REDACTED]" },
            )
            .finish()
    }
}

/// First matching rule wins: cloud link, project picker, local, setup form.
pub fn derive_view(
    settings: &Settings,
    app: Option<&App>,
    projects: &ProjectListState,
    config: &BootstrapConfig,
) -> PanelView {
    let supabase = &settings.supabase;

    if supabase.has_access_token() {
        if let Some(project_name) = app.and_then(|app| app.supabase_project_name.clone()) {
            let project_id = app
                .and_then(|app| app.supabase_project_id.clone())
                .unwrap_or_default();
            return PanelView::ConnectedProject {
                dashboard_url: config.project_dashboard_url(&project_id),
                project_id,
                project_name,
            };
        }
        return PanelView::ProjectPicker(picker_body(app, projects));
    }

    let has_cloud_project = app.is_some_and(App::has_cloud_project);
    if !has_cloud_project {
        if let Some(url) = supabase.local_connection() {
            return PanelView::LocalConnected {
                url: url.to_string(),
            };
        }
    }

    PanelView::SetupForm(LocalForm::from_settings(settings))
}

fn picker_body(app: Option<&App>, state: &ProjectListState) -> PickerBody {
    if state.loading {
        return PickerBody::Loading;
    }
    if let Some(message) = &state.error {
        return PickerBody::Failed {
            message: message.clone(),
        };
    }
    if state.projects.is_empty() {
        return PickerBody::Empty;
    }

    let current_project_id = app.and_then(|app| app.supabase_project_id.clone());
    let current_project_label = current_project_id.as_deref().map(|id| {
        state
            .projects
            .iter()
            .find(|project| project.id == id)
            .map_or_else(|| id.to_string(), |project| project.display_name().to_string())
    });

    PickerBody::Ready {
        projects: state.projects.clone(),
        current_project_id,
        current_project_label,
    }
}
