//! Main application component

use dioxus::desktop::window;
use dioxus::prelude::*;

use supalink_core::deep_link::DeepLinkInbox;
use supalink_core::models::{AppId, Settings, ThemeMode};
use supalink_core::services::SettingsStore;

use crate::bootstrap_config::load_bootstrap_config;
use crate::components::ToastStack;
use crate::services::{dispatch_deep_link, DesktopServices, INBOX_POLL_INTERVAL};
use crate::state::AppState;
use crate::theme::resolve_theme;
use crate::views::Home;

/// Root application component
#[component]
pub fn App() -> Element {
    let mut apps = use_signal(Vec::new);
    let mut selected_app = use_signal(|| None::<AppId>);
    let mut settings = use_signal(Settings::default);
    let mut theme = use_signal(|| resolve_theme(ThemeMode::System));
    let mut services = use_signal(|| None::<DesktopServices>);
    let toasts = use_signal(Vec::new);
    let next_toast_id = use_signal(|| 0_u64);
    let mut startup_error = use_signal(|| None::<String>);

    // Open the database and stores, then mirror settings into signals
    use_future(move || async move {
        let opened = match DesktopServices::open(load_bootstrap_config()).await {
            Ok(opened) => opened,
            Err(error) => {
                tracing::error!("Failed to initialize Supalink: {}", error);
                startup_error.set(Some(error.to_string()));
                return;
            }
        };

        match opened.list_apps().await {
            Ok(loaded) => {
                tracing::info!("Loaded {} apps from database", loaded.len());
                selected_app.set(loaded.first().map(|app| app.id));
                apps.set(loaded);
            }
            Err(error) => tracing::error!("Failed to list apps: {}", error),
        }

        let mut rx = opened.settings.subscribe();
        let current = rx.borrow_and_update().clone();
        theme.set(resolve_theme(current.theme));
        settings.set(current);
        services.set(Some(opened));

        while rx.changed().await.is_ok() {
            let current = rx.borrow_and_update().clone();
            theme.set(resolve_theme(current.theme));
            settings.set(current);
        }
    });

    // Deep links handed over by the OS or a second instance
    use_future(move || async move {
        let inbox = DeepLinkInbox::default_location();
        loop {
            tokio::time::sleep(INBOX_POLL_INTERVAL).await;
            let Some(current) = services.peek().as_ref().cloned() else {
                continue;
            };

            let pending = match inbox.take() {
                Ok(pending) => pending,
                Err(error) => {
                    tracing::warn!("Failed to read deep link inbox: {}", error);
                    continue;
                }
            };
            for url in pending {
                tracing::info!("Received deep link");
                window().set_focus();
                dispatch_deep_link(&current, &url).await;
            }
        }
    });

    use_context_provider(|| AppState {
        apps,
        selected_app,
        settings,
        theme,
        services,
        toasts,
        next_toast_id,
        startup_error,
    });

    let current_theme = theme();
    let colors = current_theme.palette();
    let theme_attr = current_theme.attr();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("/assets/main.css") }

        div {
            class: "app-container",
            "data-theme": "{theme_attr}",
            style: "
                min-height: 100vh;
                font-family: system-ui, -apple-system, sans-serif;
                font-size: 14px;
                background: {colors.bg_primary};
                color: {colors.text_primary};
            ",

            if let Some(error) = startup_error() {
                div {
                    class: "startup-error",
                    style: "padding: 24px; color: {colors.error};",
                    "Supalink could not start: {error}"
                }
            } else {
                Home {}
            }

            ToastStack {}
        }
    }
}
