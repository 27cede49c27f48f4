//! Desktop bootstrap configuration: build-time values, then runtime env.

use supalink_core::config::{BootstrapConfig, BootstrapOverrides};

/// Overrides embedded at build time from `OUT_DIR/desktop-bootstrap.json`.
///
/// Only public endpoints live here; never credentials.
pub fn embedded_overrides() -> BootstrapOverrides {
    let raw = include_str!(concat!(env!("OUT_DIR"), "/desktop-bootstrap.json"));
    parse_overrides(raw)
}

fn parse_overrides(raw: &str) -> BootstrapOverrides {
    serde_json::from_str(raw).unwrap_or_else(|error| {
        tracing::warn!("Failed to parse desktop bootstrap config: {}", error);
        BootstrapOverrides::default()
    })
}

/// Embedded values overridden by runtime environment variables.
///
/// Falls back to the built-in defaults if the merged values are invalid.
pub fn load_bootstrap_config() -> BootstrapConfig {
    let overrides = embedded_overrides().merged_with(BootstrapOverrides::from_env());
    BootstrapConfig::resolve(overrides).unwrap_or_else(|error| {
        tracing::warn!("Invalid bootstrap configuration ({}), using defaults", error);
        BootstrapConfig::default()
    })
}

/// `SUPALINK_TEST_MODE=1` forces the fake OAuth flow on at startup.
pub fn test_mode_forced() -> bool {
    std::env::var("SUPALINK_TEST_MODE").is_ok_and(|value| value.trim() == "1")
}
