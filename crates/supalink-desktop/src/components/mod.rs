//! UI Components
//!
//! Reusable UI components for the desktop application.

mod app_list;
mod button;
mod input;
mod supabase_connector;
mod toasts;

pub use app_list::AppList;
pub use supabase_connector::SupabaseConnector;
pub use toasts::ToastStack;
