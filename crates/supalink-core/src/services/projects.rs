use std::sync::Arc;

use tokio::sync::watch;

use crate::db::{AppRepository, Database, LibSqlAppRepository};
use crate::error::{Error, Result};
use crate::models::{AppId, Project};
use crate::supabase::ManagementClient;

use super::SettingsStore;

/// Snapshot of the cloud project list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectListState {
    pub projects: Vec<Project>,
    pub loading: bool,
    /// Message of the last failed load, cleared when a new load starts
    pub error: Option<String>,
}

/// Cloud project listing plus linking of an app to one of them.
#[allow(async_fn_in_trait)]
pub trait ProjectDirectory {
    fn state(&self) -> ProjectListState;

    fn subscribe(&self) -> watch::Receiver<ProjectListState>;

    /// Fetch the project list. Failures land in `state().error` and are
    /// also returned.
    async fn load_projects(&self) -> Result<()>;

    async fn set_app_project(&self, project_id: &str, app_id: AppId) -> Result<()>;

    async fn unset_app_project(&self, app_id: AppId) -> Result<()>;
}

/// Projects from the Supabase Management API, links stored in libSQL.
#[derive(Clone)]
pub struct SupabaseProjects<S> {
    client: ManagementClient,
    db: Database,
    settings: S,
    tx: Arc<watch::Sender<ProjectListState>>,
}

impl<S: SettingsStore> SupabaseProjects<S> {
    pub fn new(client: ManagementClient, db: Database, settings: S) -> Self {
        let (tx, _) = watch::channel(ProjectListState::default());
        Self {
            client,
            db,
            settings,
            tx: Arc::new(tx),
        }
    }

    async fn fetch(&self) -> Result<Vec<Project>> {
        let token = self
            .settings
            .current()
            .supabase
            .access_token
            .ok_or(Error::NotAuthenticated)?;
        self.client.list_projects(&token).await
    }

    fn project_name(&self, project_id: &str) -> Option<String> {
        self.tx
            .borrow()
            .projects
            .iter()
            .find(|project| project.id == project_id)
            .and_then(|project| project.name.clone())
    }
}

impl<S: SettingsStore> ProjectDirectory for SupabaseProjects<S> {
    fn state(&self) -> ProjectListState {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<ProjectListState> {
        self.tx.subscribe()
    }

    async fn load_projects(&self) -> Result<()> {
        self.tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        match self.fetch().await {
            Ok(projects) => {
                self.tx.send_replace(ProjectListState {
                    projects,
                    loading: false,
                    error: None,
                });
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Failed to load Supabase projects: {}", error);
                self.tx.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(error.to_string());
                });
                Err(error)
            }
        }
    }

    async fn set_app_project(&self, project_id: &str, app_id: AppId) -> Result<()> {
        let project_id = project_id.trim();
        if project_id.is_empty() {
            return Err(Error::InvalidInput("Project ID cannot be empty".into()));
        }

        let name = self.project_name(project_id);
        LibSqlAppRepository::new(self.db.connection())
            .set_supabase_project(app_id, project_id, name.as_deref())
            .await?;
        tracing::info!("Linked app {} to Supabase project {}", app_id, project_id);
        Ok(())
    }

    async fn unset_app_project(&self, app_id: AppId) -> Result<()> {
        LibSqlAppRepository::new(self.db.connection())
            .clear_supabase_project(app_id)
            .await?;
        tracing::info!("Unlinked app {} from its Supabase project", app_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::auth::{MemoryTokenStore, OAuthTokens};
    use crate::services::SettingsService;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn projects_handler(headers: HeaderMap) -> (StatusCode, Json<serde_json::Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            == Some("Bearer good-token");
        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized" })),
            );
        }
        (
            StatusCode::OK,
            Json(json!([
                { "id": "proj-b", "name": "Staging" },
                { "id": "proj-a", "name": "Production" }
            ])),
        )
    }

    type TestProjects = SupabaseProjects<SettingsService<MemoryTokenStore>>;

    async fn setup(token: Option<&str>) -> (TestProjects, Database) {
        let base_url = serve(Router::new().route("/v1/projects", get(projects_handler))).await;
        let db = Database::open_in_memory().await.unwrap();
        let tokens = token.map_or_else(MemoryTokenStore::default, |token| {
            MemoryTokenStore::with_tokens(OAuthTokens::from_expires_in(token, "refresh", 3600))
        });
        let settings = SettingsService::load(db.clone(), tokens).await.unwrap();
        let client = ManagementClient::new(base_url).unwrap();
        (SupabaseProjects::new(client, db.clone(), settings), db)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn load_projects_publishes_sorted_list() {
        let (projects, _) = setup(Some("good-token")).await;
        let mut rx = projects.subscribe();

        projects.load_projects().await.unwrap();

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert!(!state.loading);
        assert_eq!(state.error, None);
        let ids: Vec<_> = state.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["proj-a", "proj-b"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn load_failure_is_kept_in_state() {
        let (projects, _) = setup(Some("stale-token")).await;

        assert!(projects.load_projects().await.is_err());

        let state = projects.state();
        assert!(!state.loading);
        assert!(state.error.unwrap().contains("401"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn load_without_token_is_not_authenticated() {
        let (projects, _) = setup(None).await;
        let error = projects.load_projects().await.unwrap_err();
        assert!(matches!(error, Error::NotAuthenticated));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn set_app_project_uses_cached_project_name() {
        let (projects, db) = setup(Some("good-token")).await;
        let repo = LibSqlAppRepository::new(db.connection());
        let app = repo.create("Todo App").await.unwrap();

        projects.load_projects().await.unwrap();
        projects.set_app_project("proj-b", app.id).await.unwrap();

        let linked = repo.get(app.id).await.unwrap().unwrap();
        assert_eq!(linked.supabase_project_id.as_deref(), Some("proj-b"));
        assert_eq!(linked.supabase_project_name.as_deref(), Some("Staging"));

        projects.unset_app_project(app.id).await.unwrap();
        let unlinked = repo.get(app.id).await.unwrap().unwrap();
        assert_eq!(unlinked.supabase_project_id, None);
        assert_eq!(unlinked.supabase_project_name, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn set_app_project_for_missing_app_fails() {
        let (projects, _) = setup(Some("good-token")).await;
        let error = projects
            .set_app_project("proj-a", AppId(404))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
    }
}
