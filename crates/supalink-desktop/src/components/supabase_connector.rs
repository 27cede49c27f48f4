//! Supabase connection panel for one app

use std::rc::Rc;

use dioxus::prelude::*;

use supalink_core::deep_link::DeepLinkSubscription;
use supalink_core::models::{AppId, Project};
use supalink_core::panel::{
    ConnectionPanel, LocalForm, PanelBackend, PanelView, PickerBody, ServiceBackend,
    NO_PROJECTS_MESSAGE,
};
use supalink_core::services::{AppSource, ProjectDirectory, SettingsStore};

use super::button::{Button, ButtonVariant};
use super::input::Input;
use crate::services::{DesktopNotifier, KeyringTokenStore};
use crate::state::AppState;
use crate::theme::ColorPalette;

type DesktopPanel = ConnectionPanel<ServiceBackend<KeyringTokenStore, DesktopNotifier>>;

enum PanelAction {
    Retry,
    SelectProject(String),
    Disconnect,
    ConnectLocal(LocalForm),
    ConnectOAuth,
    OpenDashboard,
}

#[component]
pub fn SupabaseConnector(app_id: AppId) -> Element {
    let state = use_context::<AppState>();
    let theme = (state.theme)();
    let colors = theme.palette();

    let mut panel = use_signal(|| None::<Rc<DesktopPanel>>);
    let revision = use_signal(|| 0_u64);
    let mut init_error = use_signal(|| None::<String>);
    let mut local_url = use_signal(String::new);
    let mut local_anon_key = use_signal(String::new);

    use_future(move || async move {
        let Some(services) = state.services.peek().as_ref().cloned() else {
            return;
        };

        let backend = match ServiceBackend::new(
            services.db.clone(),
            services.settings.clone(),
            app_id,
            services.config.clone(),
            state.notifier(),
        )
        .await
        {
            Ok(backend) => backend,
            Err(error) => {
                tracing::error!("Failed to set up Supabase panel for app {}: {}", app_id, error);
                init_error.set(Some(error.to_string()));
                return;
            }
        };

        let built = Rc::new(ConnectionPanel::new(backend));
        let seed = LocalForm::from_settings(&services.settings.current());
        local_url.set(seed.url);
        local_anon_key.set(seed.anon_key);
        panel.set(Some(built.clone()));

        built.activate().await;
        watch_stores(built, services.deep_links.subscribe(), revision).await;
    });

    let dispatch = move |action: PanelAction| {
        let Some(panel) = panel() else {
            return;
        };
        spawn(async move {
            match action {
                PanelAction::Retry => panel.retry().await,
                PanelAction::SelectProject(project_id) => {
                    panel.handle_project_select(&project_id).await;
                }
                PanelAction::Disconnect => panel.handle_unset_project().await,
                PanelAction::ConnectLocal(form) => panel.handle_local_connect(&form).await,
                PanelAction::ConnectOAuth => panel.handle_oauth_connect().await,
                PanelAction::OpenDashboard => panel.open_dashboard().await,
            }
        });
    };

    // Re-render on every store change
    let _ = revision();
    let view = panel().map(|panel| panel.view());
    let connected = matches!(view, Some(PanelView::ConnectedProject { .. }));

    let body = match view {
        None => {
            let message = init_error().unwrap_or_else(|| "Loading...".to_string());
            rsx! {
                div { style: "color: {colors.text_muted};", "{message}" }
            }
        }
        Some(PanelView::ConnectedProject {
            project_id,
            project_name,
            ..
        }) => rsx! {
            div {
                style: "display: flex; align-items: center; justify-content: space-between;",
                div { style: "font-weight: 600;", "Supabase Project" }
                button {
                    class: "supabase-logo-button",
                    title: "Open in Supabase Dashboard",
                    style: "border: 1px solid {colors.border}; background: {colors.bg_primary};",
                    onclick: move |_| dispatch(PanelAction::OpenDashboard),
                    SupabaseLogo { colors: *colors }
                    span { style: "color: {colors.text_muted};", "\u{2197}" }
                }
            }
            p {
                style: "margin: 0; color: {colors.text_secondary};",
                "This app is connected to project: "
                strong { style: "color: {colors.text_primary};", "{project_name}" }
            }
            div {
                style: "font-size: 12px; color: {colors.text_muted};",
                "Project ID: {project_id}"
            }
            div {
                Button {
                    variant: ButtonVariant::Destructive,
                    onclick: move |_| dispatch(PanelAction::Disconnect),
                    "Disconnect Project"
                }
            }
        },
        Some(PanelView::ProjectPicker(picker)) => {
            let notice = picker.current_project_notice();
            let picker_body = match picker {
                PickerBody::Loading => rsx! {
                    div {
                        class: "project-picker-skeleton",
                        style: "background: {colors.bg_tertiary};",
                    }
                },
                PickerBody::Failed { message } => rsx! {
                    div {
                        style: "color: {colors.error};",
                        "Error loading projects: {message}"
                    }
                    Button {
                        variant: ButtonVariant::Secondary,
                        onclick: move |_| dispatch(PanelAction::Retry),
                        "Retry"
                    }
                },
                PickerBody::Empty => rsx! {
                    div { style: "color: {colors.text_secondary};", "{NO_PROJECTS_MESSAGE}" }
                },
                PickerBody::Ready {
                    projects,
                    current_project_id,
                    ..
                } => rsx! {
                    ProjectSelect {
                        projects,
                        current_project_id,
                        colors: *colors,
                        on_select: move |project_id: String| dispatch(PanelAction::SelectProject(project_id)),
                    }
                },
            };
            rsx! {
                div { style: "font-weight: 500;", "Supabase Projects" }
                div {
                    style: "font-size: 12px; color: {colors.text_secondary};",
                    "Select a Supabase project to connect to this app"
                }
                {picker_body}
                if let Some(notice) = notice {
                    div { style: "font-size: 12px; color: {colors.text_secondary};", "{notice}" }
                }
            }
        }
        Some(PanelView::LocalConnected { url }) => rsx! {
            p {
                style: "margin: 0; color: {colors.text_secondary};",
                "Connected to local Supabase at "
                code { "{url}" }
            }
            div {
                Button {
                    variant: ButtonVariant::Destructive,
                    onclick: move |_| dispatch(PanelAction::Disconnect),
                    "Disconnect"
                }
            }
        },
        Some(PanelView::SetupForm(_)) => {
            let form = LocalForm::new(local_url(), local_anon_key());
            let can_connect = form.can_connect();
            rsx! {
                div { style: "font-weight: 500;", "Local Supabase" }
                Input {
                    value: local_url(),
                    placeholder: "http://localhost:54321",
                    oninput: move |event: FormEvent| local_url.set(event.value()),
                }
                Input {
                    value: local_anon_key(),
                    placeholder: "Anon key",
                    secret: true,
                    oninput: move |event: FormEvent| local_anon_key.set(event.value()),
                }
                div {
                    Button {
                        disabled: !can_connect,
                        onclick: move |_| dispatch(PanelAction::ConnectLocal(form.clone())),
                        "Connect Local Supabase"
                    }
                }
                div {
                    style: "border-top: 1px solid {colors.border}; margin: 4px 0;",
                }
                div { style: "font-weight: 500;", "Supabase Cloud" }
                div {
                    style: "font-size: 12px; color: {colors.text_secondary};",
                    "Sign in to pick one of your Supabase projects."
                }
                button {
                    class: "supabase-logo-button connect-supabase-button",
                    title: "Connect to Supabase",
                    style: "
                        border: 1px solid {colors.border};
                        background: {colors.bg_primary};
                        color: {colors.text_primary};
                    ",
                    onclick: move |_| dispatch(PanelAction::ConnectOAuth),
                    span { "Connect with" }
                    SupabaseLogo { colors: *colors }
                }
            }
        }
    };

    rsx! {
        section {
            class: "supabase-connector",
            style: "
                display: flex;
                flex-direction: column;
                gap: 12px;
                max-width: 520px;
                padding: 16px;
                border: 1px solid {colors.border};
                border-radius: 8px;
                background: {colors.bg_secondary};
            ",
            if !connected {
                SupabaseLogo { colors: *colors }
            }
            {body}
        }
    }
}

#[component]
fn ProjectSelect(
    projects: Vec<Project>,
    current_project_id: Option<String>,
    colors: ColorPalette,
    on_select: EventHandler<String>,
) -> Element {
    let current = current_project_id.unwrap_or_default();

    rsx! {
        select {
            value: "{current}",
            style: "
                width: 100%;
                padding: 8px 10px;
                border-radius: 6px;
                border: 1px solid {colors.border};
                background: {colors.bg_primary};
                color: {colors.text_primary};
            ",
            onchange: move |event: FormEvent| {
                let project_id = event.value();
                if !project_id.is_empty() {
                    on_select.call(project_id);
                }
            },
            option { value: "", disabled: true, selected: current.is_empty(), "Select a project" }
            for project in projects {
                option {
                    key: "{project.id}",
                    value: "{project.id}",
                    selected: project.id == current,
                    "{project.display_name()}"
                }
            }
        }
    }
}

/// Logo mark plus wordmark, colored for the active theme
#[component]
fn SupabaseLogo(colors: ColorPalette) -> Element {
    rsx! {
        div {
            style: "display: flex; align-items: center; gap: 8px;",
            svg {
                width: "22",
                height: "22",
                view_box: "0 0 109 113",
                path {
                    d: "M63.7 110.3c-2.9 3.6-8.7 1.6-8.7-3l-1-67.2h45.2c8.2 0 12.8 9.5 7.7 15.9L63.7 110.3z",
                    fill: "{colors.brand}",
                }
                path {
                    d: "M45.3 2.1c2.9-3.6 8.7-1.6 8.7 3l.4 67.2H9.8c-8.2 0-12.7-9.5-7.7-15.9L45.3 2.1z",
                    fill: "{colors.brand}",
                    opacity: "0.7",
                }
            }
            span {
                style: "font-size: 16px; font-weight: 600; color: {colors.brand_text};",
                "supabase"
            }
        }
    }
}

/// Bump `revision` whenever a store publishes, reload projects when the
/// access token changes and forward deep links to the panel.
async fn watch_stores(
    panel: Rc<DesktopPanel>,
    mut deep_links: DeepLinkSubscription,
    mut revision: Signal<u64>,
) {
    let backend = panel.backend();
    let mut settings_rx = backend.settings().subscribe();
    let mut app_rx = backend.app().subscribe();
    let mut projects_rx = backend.projects().subscribe();
    let mut access_token = settings_rx
        .borrow_and_update()
        .supabase
        .access_token
        .clone();
    revision += 1;

    loop {
        tokio::select! {
            changed = settings_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = settings_rx.borrow_and_update().supabase.access_token.clone();
                revision += 1;
                if next != access_token {
                    access_token = next;
                    panel.activate().await;
                }
            }
            changed = app_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                revision += 1;
            }
            changed = projects_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                revision += 1;
            }
            event = deep_links.next() => {
                let Some(event) = event else {
                    break;
                };
                tracing::debug!("Panel for app {} got deep link #{}", panel.app_id(), event.seq);
                panel.handle_deep_link(&event.link).await;
            }
        }
    }
}
