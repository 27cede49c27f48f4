//! Home view - main application screen

use dioxus::prelude::*;

use crate::components::{AppList, SupabaseConnector};
use crate::state::AppState;

/// App list on the left, Supabase panel for the selected app on the right
#[component]
pub fn Home() -> Element {
    let state = use_context::<AppState>();
    let colors = (state.theme)().palette();
    let ready = state.services.read().is_some();
    let selected = state.selected();
    let test_mode = (state.settings)().is_test_mode;

    rsx! {
        div {
            class: "home-container",
            style: "display: flex; height: 100vh;",

            AppList {}

            main {
                class: "main-content",
                style: "flex: 1; padding: 24px; overflow-y: auto;",

                if !ready {
                    div {
                        style: "color: {colors.text_muted};",
                        "Loading..."
                    }
                } else if let Some(app) = selected {
                    h1 {
                        style: "font-size: 20px; font-weight: 600; margin: 0 0 16px 0;",
                        "{app.name}"
                    }
                    if test_mode {
                        div {
                            style: "font-size: 12px; color: {colors.text_muted}; margin-bottom: 12px;",
                            "Test mode: Supabase sign-in is simulated."
                        }
                    }
                    SupabaseConnector { key: "{app.id}", app_id: app.id }
                } else {
                    div {
                        style: "color: {colors.text_secondary};",
                        "Add an app to connect it to Supabase."
                    }
                }
            }
        }
    }
}
