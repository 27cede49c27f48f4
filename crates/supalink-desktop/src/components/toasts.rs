use dioxus::prelude::*;

use supalink_core::panel::ToastLevel;

use crate::state::AppState;

/// Stacked toasts in the bottom-right corner; click to dismiss
#[component]
pub fn ToastStack() -> Element {
    let state = use_context::<AppState>();
    let colors = (state.theme)().palette();
    let notifier = state.notifier();
    let toasts = (state.toasts)();

    rsx! {
        div {
            class: "toast-stack",
            style: "
                position: fixed;
                right: 16px;
                bottom: 16px;
                display: flex;
                flex-direction: column;
                gap: 8px;
                max-width: 360px;
                z-index: 100;
            ",
            for entry in toasts {
                {
                    let id = entry.id;
                    let accent = match entry.toast.level {
                        ToastLevel::Success => colors.success,
                        ToastLevel::Error => colors.error,
                    };
                    rsx! {
                        div {
                            key: "{id}",
                            role: "status",
                            style: "
                                padding: 10px 14px;
                                border-radius: 8px;
                                border-left: 4px solid {accent};
                                background: {colors.bg_secondary};
                                color: {colors.text_primary};
                                box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15);
                                cursor: pointer;
                            ",
                            onclick: move |_| notifier.dismiss(id),
                            "{entry.toast.message}"
                        }
                    }
                }
            }
        }
    }
}
