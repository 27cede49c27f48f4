use supalink_core::auth::TokenPersistence;
use supalink_core::panel::{PanelBackend, PanelView};
use supalink_core::services::{ProjectDirectory, SettingsStore};
use supalink_core::AppId;

use crate::commands::common::{render_picker, render_view, status_item, CliContext};
use crate::error::CliError;

pub async fn run_status<T: TokenPersistence>(
    ctx: &CliContext<T>,
    app_id: AppId,
    as_json: bool,
) -> Result<(), CliError> {
    let (panel, app) = ctx.open_panel(app_id).await?;
    panel.activate().await;
    let view = panel.view();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&status_item(&app, &view))?);
        return Ok(());
    }

    println!("{} ({})", app.name, app.id);
    for line in render_view(&view) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_projects<T: TokenPersistence>(
    ctx: &CliContext<T>,
    app_id: AppId,
    as_json: bool,
) -> Result<(), CliError> {
    let (panel, _) = ctx.open_panel(app_id).await?;
    if !panel.backend().settings().current().supabase.has_access_token() {
        return Err(CliError::NotSignedIn);
    }

    panel.load_projects().await;
    let state = panel.backend().projects().state();
    if let Some(error) = state.error {
        return Err(CliError::ActionFailed(format!(
            "Error loading projects: {error}"
        )));
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&state.projects)?);
        return Ok(());
    }

    let lines = match panel.view() {
        PanelView::ProjectPicker(body) => render_picker(&body),
        view => render_view(&view),
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
