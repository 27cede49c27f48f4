use supalink_core::auth::TokenPersistence;
use supalink_core::models::SettingsPatch;
use supalink_core::services::SettingsStore;

use crate::cli::Toggle;
use crate::commands::common::CliContext;
use crate::error::CliError;

pub async fn run_test_mode<T: TokenPersistence>(
    ctx: &CliContext<T>,
    state: Toggle,
) -> Result<(), CliError> {
    let db = ctx.open_database().await?;
    let settings = ctx.open_settings(&db).await?;
    settings
        .update(SettingsPatch {
            is_test_mode: Some(state.enabled()),
            ..SettingsPatch::default()
        })
        .await?;

    println!(
        "Test mode {}",
        if state.enabled() { "enabled" } else { "disabled" }
    );
    Ok(())
}
