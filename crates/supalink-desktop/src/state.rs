//! Application state management
//!
//! Global state accessible via Dioxus context providers.

use dioxus::prelude::*;

use supalink_core::models::{App, AppId, Settings};

use crate::services::{DesktopNotifier, DesktopServices, ToastEntry};
use crate::theme::ResolvedTheme;

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    /// App records, most recently updated first
    pub apps: Signal<Vec<App>>,
    pub selected_app: Signal<Option<AppId>>,
    /// Mirror of the settings store, for theming
    pub settings: Signal<Settings>,
    pub theme: Signal<ResolvedTheme>,
    /// Set once the database and stores are open
    pub services: Signal<Option<DesktopServices>>,
    pub toasts: Signal<Vec<ToastEntry>>,
    pub next_toast_id: Signal<u64>,
    pub startup_error: Signal<Option<String>>,
}

impl AppState {
    #[must_use]
    pub fn selected(&self) -> Option<App> {
        let selected = (self.selected_app)()?;
        (self.apps)().into_iter().find(|app| app.id == selected)
    }

    pub const fn notifier(&self) -> DesktopNotifier {
        DesktopNotifier {
            toasts: self.toasts,
            next_id: self.next_toast_id,
        }
    }
}
