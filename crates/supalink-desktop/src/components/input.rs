use dioxus::prelude::*;

use crate::state::AppState;

#[component]
pub fn Input(
    value: String,
    #[props(default)] placeholder: String,
    /// Render as a password field
    #[props(default)]
    secret: bool,
    oninput: EventHandler<FormEvent>,
) -> Element {
    let state = use_context::<AppState>();
    let colors = (state.theme)().palette();
    let input_type = if secret { "password" } else { "text" };

    rsx! {
        input {
            r#type: "{input_type}",
            value: "{value}",
            placeholder: "{placeholder}",
            style: "
                width: 100%;
                padding: 8px 10px;
                border-radius: 6px;
                border: 1px solid {colors.border};
                background: {colors.bg_primary};
                color: {colors.text_primary};
                font-size: 13px;
            ",
            oninput: move |event| oninput.call(event),
        }
    }
}
