use serde::Serialize;
use supalink_core::auth::TokenPersistence;
use supalink_core::db::{AppRepository, LibSqlAppRepository};
use supalink_core::util::normalize_text_option;
use supalink_core::{App, AppId};

use crate::commands::common::{database_label, require_app, CliContext};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct AppListItem {
    pub id: i64,
    pub name: String,
    pub supabase_project_id: Option<String>,
    pub supabase_project_name: Option<String>,
    pub updated_at: i64,
}

impl From<&App> for AppListItem {
    fn from(app: &App) -> Self {
        Self {
            id: app.id.0,
            name: app.name.clone(),
            supabase_project_id: app.supabase_project_id.clone(),
            supabase_project_name: app.supabase_project_name.clone(),
            updated_at: app.updated_at,
        }
    }
}

pub async fn list_apps<T: TokenPersistence>(ctx: &CliContext<T>) -> Result<Vec<App>, CliError> {
    let db = ctx.open_database().await?;
    Ok(LibSqlAppRepository::new(db.connection()).list().await?)
}

pub async fn run_apps_list<T: TokenPersistence>(
    ctx: &CliContext<T>,
    as_json: bool,
) -> Result<(), CliError> {
    let apps = list_apps(ctx).await?;

    if as_json {
        let items = apps.iter().map(AppListItem::from).collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if apps.is_empty() {
        println!("No apps in {}", database_label(&ctx.db_path));
        return Ok(());
    }
    for line in format_app_lines(&apps) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_apps_add<T: TokenPersistence>(
    ctx: &CliContext<T>,
    name: &str,
) -> Result<App, CliError> {
    let name = normalize_text_option(Some(name.to_string())).ok_or(CliError::EmptyAppName)?;
    let db = ctx.open_database().await?;
    let app = LibSqlAppRepository::new(db.connection())
        .create(&name)
        .await?;
    println!("{}", app.id);
    Ok(app)
}

pub async fn run_apps_remove<T: TokenPersistence>(
    ctx: &CliContext<T>,
    app_id: AppId,
) -> Result<(), CliError> {
    let db = ctx.open_database().await?;
    let app = require_app(&db, app_id).await?;
    LibSqlAppRepository::new(db.connection())
        .delete(app.id)
        .await?;
    println!("Removed app {} ({})", app.id, app.name);
    Ok(())
}

pub fn format_app_lines(apps: &[App]) -> Vec<String> {
    apps.iter()
        .map(|app| {
            let link = match (&app.supabase_project_id, &app.supabase_project_name) {
                (Some(_), Some(name)) => format!("  [{name}]"),
                (Some(id), None) => format!("  [{id}]"),
                _ => String::new(),
            };
            format!("{:>4}  {}{}", app.id, app.name, link)
        })
        .collect()
}
