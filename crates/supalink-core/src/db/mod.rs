//! Database layer for Supalink

mod app_repository;
mod connection;
mod migrations;
mod settings_repository;

pub use app_repository::{AppRepository, LibSqlAppRepository};
pub use connection::{default_db_path, Database};
pub use settings_repository::{LibSqlSettingsRepository, SettingsRepository};
