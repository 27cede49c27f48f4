//! Stores and collaborators the connection panel talks to.
//!
//! Each store owns its state and publishes every change on a
//! `tokio::sync::watch` channel; views subscribe instead of polling.

mod app_source;
mod host;
mod projects;
mod settings_store;

pub use app_source::{AppLoader, AppSource};
pub use host::{
    fake_supabase_connect, FakeConnectRequest, HostBridge, SystemHost, FAKE_PROJECT_ID,
    FAKE_PROJECT_NAME,
};
pub use projects::{ProjectDirectory, ProjectListState, SupabaseProjects};
pub use settings_store::{SettingsService, SettingsStore};
