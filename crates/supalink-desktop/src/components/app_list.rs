//! Sidebar with the app records

use dioxus::prelude::*;

use super::button::{Button, ButtonVariant};
use super::input::Input;
use crate::state::AppState;

#[component]
pub fn AppList() -> Element {
    let mut state = use_context::<AppState>();
    let colors = (state.theme)().palette();
    let mut new_name = use_signal(String::new);
    let mut add_error = use_signal(|| None::<String>);

    let add_app = move |_: MouseEvent| {
        let name = new_name().trim().to_string();
        if name.is_empty() {
            return;
        }
        let Some(services) = state.services.read().clone() else {
            return;
        };

        spawn(async move {
            match services.create_app(&name).await {
                Ok(app) => {
                    tracing::info!("Created app {} ({})", app.name, app.id);
                    state.selected_app.set(Some(app.id));
                    state.apps.write().insert(0, app);
                    new_name.set(String::new());
                    add_error.set(None);
                }
                Err(error) => {
                    tracing::error!("Failed to create app: {}", error);
                    add_error.set(Some(error.to_string()));
                }
            }
        });
    };

    let apps = (state.apps)();
    let selected = (state.selected_app)();

    rsx! {
        aside {
            class: "sidebar",
            style: "
                width: 220px;
                background: {colors.bg_secondary};
                border-right: 1px solid {colors.border};
                padding: 16px;
                overflow-y: auto;
                display: flex;
                flex-direction: column;
                gap: 12px;
            ",

            h2 {
                style: "
                    font-size: 14px;
                    font-weight: 600;
                    margin: 0;
                    color: {colors.text_secondary};
                ",
                "Apps"
            }

            div {
                for app in apps {
                    AppItem {
                        key: "{app.id}",
                        label: app.name.clone(),
                        linked: app.has_cloud_project(),
                        is_active: selected == Some(app.id),
                        onclick: move |_| state.selected_app.set(Some(app.id)),
                    }
                }
            }

            div {
                style: "display: flex; flex-direction: column; gap: 6px; margin-top: auto;",
                Input {
                    value: new_name(),
                    placeholder: "New app name",
                    oninput: move |event: FormEvent| new_name.set(event.value()),
                }
                Button {
                    variant: ButtonVariant::Secondary,
                    disabled: new_name().trim().is_empty(),
                    onclick: add_app,
                    "Add app"
                }
                if let Some(error) = add_error() {
                    div {
                        style: "color: {colors.error}; font-size: 12px;",
                        "{error}"
                    }
                }
            }
        }
    }
}

#[component]
fn AppItem(
    label: String,
    linked: bool,
    is_active: bool,
    onclick: EventHandler<MouseEvent>,
) -> Element {
    let state = use_context::<AppState>();
    let colors = (state.theme)().palette();

    let (background, text_color) = if is_active {
        (colors.accent, colors.accent_text)
    } else {
        ("transparent", colors.text_primary)
    };

    rsx! {
        div {
            style: "
                padding: 8px 10px;
                border-radius: 6px;
                cursor: pointer;
                margin-bottom: 4px;
                background: {background};
                color: {text_color};
                display: flex;
                justify-content: space-between;
                align-items: center;
            ",
            onclick,
            span { "{label}" }
            if linked {
                span {
                    title: "Linked to a Supabase project",
                    style: "width: 8px; height: 8px; border-radius: 50%; background: {colors.brand};",
                }
            }
        }
    }
}

