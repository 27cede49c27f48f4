//! Supalink Desktop Application
//!
//! Links app records to a Supabase cloud project or a local instance.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod bootstrap_config;
mod components;
mod services;
mod state;
mod theme;
mod views;

use dioxus::desktop::{Config, WindowBuilder};
use single_instance::SingleInstance;
use supalink_core::deep_link::DeepLinkInbox;
use tracing_subscriber::EnvFilter;

use crate::services::handoff_deep_link;

const INSTANCE_ID: &str = "supalink-desktop";

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("supalink=debug")),
        )
        .init();

    let config = bootstrap_config::load_bootstrap_config();
    let scheme_prefix = format!("{}://", config.deep_link_scheme);
    let deep_link_arg = std::env::args()
        .skip(1)
        .find(|arg| arg.to_ascii_lowercase().starts_with(&scheme_prefix));

    // The OS starts a fresh process for every deep link; hand it to the
    // running window when there is one.
    let inbox = DeepLinkInbox::default_location();
    let instance = match SingleInstance::new(INSTANCE_ID) {
        Ok(instance) => Some(instance),
        Err(error) => {
            tracing::warn!("Single-instance check unavailable: {}", error);
            None
        }
    };
    if let Some(url) = deep_link_arg.as_deref() {
        handoff_deep_link(&inbox, url);
    }
    if instance.as_ref().is_some_and(|instance| !instance.is_single()) {
        tracing::info!("Supalink is already running, exiting");
        return;
    }

    tracing::info!("Starting Supalink...");

    let window = WindowBuilder::new().with_title("Supalink");
    dioxus::LaunchBuilder::new()
        .with_cfg(Config::new().with_window(window))
        .launch(app::App);

    drop(instance);
}
