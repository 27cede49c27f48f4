//! Data models for Supalink

mod app;
mod project;
mod settings;

pub use app::{App, AppId};
pub use project::Project;
pub use settings::{Settings, SettingsPatch, SupabaseSettings, ThemeMode};
