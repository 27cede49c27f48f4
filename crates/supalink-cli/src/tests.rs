use std::path::Path;

use pretty_assertions::assert_eq;
use supalink_core::auth::{MemoryTokenStore, TokenPersistence};
use supalink_core::config::BootstrapConfig;
use supalink_core::deep_link::DeepLinkInbox;
use supalink_core::models::Project;
use supalink_core::panel::{LocalForm, PanelBackend, PanelView, PickerBody};
use supalink_core::services::SettingsStore;
use supalink_core::AppId;

use crate::cli::Toggle;
use crate::commands::apps::{format_app_lines, list_apps, run_apps_add, run_apps_remove};
use crate::commands::common::{render_view, status_item, CliContext};
use crate::commands::connection::{run_connect_local, run_link, run_login, run_unlink};
use crate::commands::deep_link::run_deep_link;
use crate::commands::settings::run_test_mode;
use crate::commands::status::run_projects;
use crate::error::CliError;

/// A URL nothing listens on.
fn closed_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn test_context(dir: &Path) -> CliContext<MemoryTokenStore> {
    let config = BootstrapConfig {
        management_api_url: closed_local_url(),
        ..BootstrapConfig::default()
    };
    CliContext::new(
        Some(dir.join("supalink.db")),
        MemoryTokenStore::default(),
        config,
    )
}

fn project(id: &str, name: Option<&str>) -> Project {
    Project {
        id: id.to_string(),
        name: name.map(str::to_string),
        region: None,
        organization_id: None,
    }
}

#[test]
fn render_view_covers_every_state() {
    assert_eq!(
        render_view(&PanelView::ConnectedProject {
            project_id: "proj-1".to_string(),
            project_name: "Production".to_string(),
            dashboard_url: "https://supabase.com/dashboard/project/proj-1".to_string(),
        }),
        vec![
            "Connected to Supabase project: Production (proj-1)".to_string(),
            "Dashboard: https://supabase.com/dashboard/project/proj-1".to_string(),
        ]
    );
    assert_eq!(
        render_view(&PanelView::ProjectPicker(PickerBody::Empty)),
        vec!["No projects found in your Supabase account.".to_string()]
    );
    assert_eq!(
        render_view(&PanelView::ProjectPicker(PickerBody::Failed {
            message: "HTTP 500".to_string()
        })),
        vec!["Error loading projects: HTTP 500".to_string()]
    );
    assert_eq!(
        render_view(&PanelView::LocalConnected {
            url: "http://localhost:54321".to_string()
        }),
        vec!["Connected to local Supabase at http://localhost:54321".to_string()]
    );
    assert_eq!(
        render_view(&PanelView::SetupForm(LocalForm::default()))[0],
        "Not connected to Supabase."
    );
}

#[test]
fn render_picker_marks_current_project() {
    let lines = render_view(&PanelView::ProjectPicker(PickerBody::Ready {
        projects: vec![project("proj-1", Some("Production")), project("proj-2", None)],
        current_project_id: Some("proj-2".to_string()),
        current_project_label: Some("proj-2".to_string()),
    }));
    assert_eq!(
        lines,
        vec![
            "Supabase projects:".to_string(),
            "  proj-1  Production".to_string(),
            "* proj-2  proj-2".to_string(),
            "This app is connected to project: proj-2".to_string(),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn apps_add_and_list() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path());

    let first = run_apps_add(&ctx, "  Todo App ").await.unwrap();
    assert_eq!(first.name, "Todo App");
    run_apps_add(&ctx, "Blog").await.unwrap();

    let apps = list_apps(&ctx).await.unwrap();
    assert_eq!(apps.len(), 2);
    let lines = format_app_lines(&apps);
    assert!(lines.iter().any(|line| line.ends_with("Todo App")));

    let error = run_apps_add(&ctx, "   ").await.unwrap_err();
    assert!(matches!(error, CliError::EmptyAppName));
}

#[tokio::test(flavor = "multi_thread")]
async fn apps_remove_deletes_record() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path());
    let app = run_apps_add(&ctx, "Todo App").await.unwrap();
    let kept = run_apps_add(&ctx, "Blog").await.unwrap();

    run_apps_remove(&ctx, app.id).await.unwrap();
    let ids: Vec<AppId> = list_apps(&ctx).await.unwrap().iter().map(|app| app.id).collect();
    assert_eq!(ids, vec![kept.id]);

    let error = run_apps_remove(&ctx, app.id).await.unwrap_err();
    assert!(matches!(error, CliError::AppNotFound(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn commands_reject_unknown_app() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path());

    let error = run_unlink(&ctx, AppId(42)).await.unwrap_err();
    assert!(matches!(error, CliError::AppNotFound(id) if id == "42"));
}

#[tokio::test(flavor = "multi_thread")]
async fn login_in_test_mode_links_fake_project() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path());
    let app = run_apps_add(&ctx, "Todo App").await.unwrap();

    run_test_mode(&ctx, Toggle::On).await.unwrap();
    run_login(&ctx, app.id).await.unwrap();

    assert!(ctx.tokens.load().unwrap().is_some());
    let (panel, app) = ctx.open_panel(app.id).await.unwrap();
    let view = panel.view();
    assert_eq!(
        view,
        PanelView::ConnectedProject {
            project_id: "fake-project-id".to_string(),
            project_name: "Fake Supabase Project".to_string(),
            dashboard_url: "https://supabase.com/dashboard/project/fake-project-id".to_string(),
        }
    );
    assert_eq!(status_item(&app, &view).state, "connected_project");

    run_unlink(&ctx, app.id).await.unwrap();
    let (panel, _) = ctx.open_panel(app.id).await.unwrap();
    assert!(matches!(panel.view(), PanelView::ProjectPicker(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn link_and_projects_require_sign_in() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path());
    let app = run_apps_add(&ctx, "Todo App").await.unwrap();

    let error = run_link(&ctx, app.id, "proj-1").await.unwrap_err();
    assert!(matches!(error, CliError::NotSignedIn));
    let error = run_projects(&ctx, app.id, false).await.unwrap_err();
    assert!(matches!(error, CliError::NotSignedIn));
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_local_to_unreachable_instance_keeps_settings() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path());
    let app = run_apps_add(&ctx, "Todo App").await.unwrap();

    let error = run_connect_local(&ctx, app.id, &closed_local_url(), "anon")
        .await
        .unwrap_err();
    let CliError::ActionFailed(message) = error else {
        panic!("expected action failure, got {error:?}");
    };
    assert!(message.starts_with("Failed to connect to local Supabase: "));

    let (panel, _) = ctx.open_panel(app.id).await.unwrap();
    let settings = panel.backend().settings().current();
    assert_eq!(settings.supabase.local_url, None);
    assert_eq!(settings.supabase.local_anon_key, None);
    assert!(matches!(panel.view(), PanelView::SetupForm(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_local_rejects_blank_arguments() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path());
    let app = run_apps_add(&ctx, "Todo App").await.unwrap();

    let error = run_connect_local(&ctx, app.id, "http://localhost:54321", " ")
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::Config(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn deep_link_stores_tokens_and_forwards_link() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path());
    let inbox = DeepLinkInbox::new(tmp.path().join("pending-deep-link"));
    let url = "supalink://supabase-oauth-return?token=access-1&refreshToken=refresh-1&expiresIn=3600";

    run_deep_link(&ctx, url, Some(&inbox)).await.unwrap();

    let stored = ctx.tokens.load().unwrap().unwrap();
    assert_eq!(stored.access_token, "access-1");
    assert_eq!(stored.refresh_token, "refresh-1");
    assert_eq!(inbox.take().unwrap(), vec![url.to_string()]);

    let app = run_apps_add(&ctx, "Todo App").await.unwrap();
    let (panel, _) = ctx.open_panel(app.id).await.unwrap();
    panel.backend().settings().refresh().await.unwrap();
    assert_eq!(
        panel.backend().settings().current().supabase.access_token.as_deref(),
        Some("access-1")
    );
    assert!(matches!(panel.view(), PanelView::ProjectPicker(_)));
    let error = run_projects(&ctx, app.id, false).await.unwrap_err();
    assert!(matches!(error, CliError::ActionFailed(_)));

    let error = run_deep_link(&ctx, "https://example.com", None)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        CliError::Core(supalink_core::Error::DeepLink(_))
    ));
}
