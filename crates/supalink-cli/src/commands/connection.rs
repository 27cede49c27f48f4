use supalink_core::auth::TokenPersistence;
use supalink_core::panel::{LocalForm, PanelBackend};
use supalink_core::services::SettingsStore;
use supalink_core::AppId;

use crate::commands::common::{finish, CliContext};
use crate::error::CliError;

pub async fn run_link<T: TokenPersistence>(
    ctx: &CliContext<T>,
    app_id: AppId,
    project_id: &str,
) -> Result<(), CliError> {
    let (panel, _) = ctx.open_panel(app_id).await?;
    if !panel.backend().settings().current().supabase.has_access_token() {
        return Err(CliError::NotSignedIn);
    }

    // Loads the project names so the link stores one
    panel.load_projects().await;
    panel.handle_project_select(project_id.trim()).await;
    finish(&panel)
}

pub async fn run_unlink<T: TokenPersistence>(
    ctx: &CliContext<T>,
    app_id: AppId,
) -> Result<(), CliError> {
    let (panel, _) = ctx.open_panel(app_id).await?;
    panel.handle_unset_project().await;
    finish(&panel)
}

pub async fn run_connect_local<T: TokenPersistence>(
    ctx: &CliContext<T>,
    app_id: AppId,
    url: &str,
    anon_key: &str,
) -> Result<(), CliError> {
    let form = LocalForm::new(url, anon_key);
    if !form.can_connect() {
        return Err(CliError::Config(
            "--url and --anon-key must not be empty".to_string(),
        ));
    }

    let (panel, _) = ctx.open_panel(app_id).await?;
    panel.handle_local_connect(&form).await;
    finish(&panel)
}

pub async fn run_login<T: TokenPersistence>(
    ctx: &CliContext<T>,
    app_id: AppId,
) -> Result<(), CliError> {
    let (panel, _) = ctx.open_panel(app_id).await?;
    let test_mode = panel.backend().settings().current().is_test_mode;

    panel.handle_oauth_connect().await;
    finish(&panel)?;

    if test_mode {
        println!("Test mode: linked app {app_id} to the fake Supabase project");
    } else {
        println!(
            "Opened {} in your browser. Finish signing in there.",
            ctx.config.oauth_login_url
        );
    }
    Ok(())
}
