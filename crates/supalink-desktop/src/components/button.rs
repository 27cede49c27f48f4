use dioxus::prelude::*;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Ghost,
    Destructive,
}

#[component]
pub fn Button(
    #[props(default)] variant: ButtonVariant,
    #[props(default)] disabled: bool,
    onclick: EventHandler<MouseEvent>,
    children: Element,
) -> Element {
    let state = use_context::<AppState>();
    let colors = (state.theme)().palette();

    let (background, color, border) = match variant {
        ButtonVariant::Primary => (colors.accent, colors.accent_text, colors.accent),
        ButtonVariant::Secondary => (colors.bg_tertiary, colors.text_primary, colors.border),
        ButtonVariant::Ghost => ("transparent", colors.text_secondary, "transparent"),
        ButtonVariant::Destructive => ("transparent", colors.error, colors.error),
    };
    let (cursor, opacity) = if disabled {
        ("not-allowed", "0.5")
    } else {
        ("pointer", "1")
    };

    rsx! {
        button {
            r#type: "button",
            disabled,
            style: "
                padding: 8px 14px;
                border-radius: 6px;
                border: 1px solid {border};
                background: {background};
                color: {color};
                font-size: 13px;
                font-weight: 500;
                cursor: {cursor};
                opacity: {opacity};
            ",
            onclick: move |event| {
                if !disabled {
                    onclick.call(event);
                }
            },
            {children}
        }
    }
}
