//! Light/dark palettes for the desktop window

use std::process::Command;
use std::sync::OnceLock;

pub use supalink_core::models::ThemeMode;

static SYSTEM_DARK_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvedTheme {
    #[default]
    Light,
    Dark,
}

impl ResolvedTheme {
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    #[must_use]
    pub const fn palette(self) -> &'static ColorPalette {
        match self {
            Self::Light => &LIGHT_PALETTE,
            Self::Dark => &DARK_PALETTE,
        }
    }

    /// Value for the `data-theme` attribute
    #[must_use]
    pub const fn attr(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[must_use]
pub fn resolve_theme(mode: ThemeMode) -> ResolvedTheme {
    match mode {
        ThemeMode::Light => ResolvedTheme::Light,
        ThemeMode::Dark => ResolvedTheme::Dark,
        ThemeMode::System if is_system_dark_mode() => ResolvedTheme::Dark,
        ThemeMode::System => ResolvedTheme::Light,
    }
}

/// System dark mode preference, detected once (may spawn a subprocess).
#[must_use]
pub fn is_system_dark_mode() -> bool {
    *SYSTEM_DARK_MODE.get_or_init(|| {
        let is_dark = detect_system_dark_mode();
        tracing::debug!(
            "System theme detected: {}",
            if is_dark { "dark" } else { "light" }
        );
        is_dark
    })
}

#[cfg(target_os = "windows")]
fn detect_system_dark_mode() -> bool {
    // AppsUseLightTheme = 0x0 means dark mode
    Command::new("reg")
        .args([
            "query",
            r"HKCU\SOFTWARE\Microsoft\Windows\CurrentVersion\Themes\Personalize",
            "/v",
            "AppsUseLightTheme",
        ])
        .output()
        .map(|output| String::from_utf8_lossy(&output.stdout).contains("0x0"))
        .unwrap_or_else(|error| {
            tracing::warn!("Failed to detect system theme: {}", error);
            false
        })
}

#[cfg(target_os = "macos")]
fn detect_system_dark_mode() -> bool {
    Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .map(|output| {
            String::from_utf8_lossy(&output.stdout)
                .trim()
                .eq_ignore_ascii_case("dark")
        })
        .unwrap_or_else(|error| {
            tracing::warn!("Failed to detect system theme: {}", error);
            false
        })
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn detect_system_dark_mode() -> bool {
    if let Ok(theme) = std::env::var("GTK_THEME") {
        return theme.to_lowercase().contains("dark");
    }
    Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
        .is_ok_and(|output| String::from_utf8_lossy(&output.stdout).contains("dark"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub bg_primary: &'static str,
    pub bg_secondary: &'static str,
    pub bg_tertiary: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub text_muted: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub accent_text: &'static str,
    pub error: &'static str,
    pub success: &'static str,
    /// Supabase logo mark
    pub brand: &'static str,
    /// Supabase wordmark
    pub brand_text: &'static str,
}

pub const LIGHT_PALETTE: ColorPalette = ColorPalette {
    bg_primary: "#ffffff",
    bg_secondary: "#f8f9fa",
    bg_tertiary: "#f1f3f4",
    text_primary: "#1a1a1a",
    text_secondary: "#5f6368",
    text_muted: "#9aa0a6",
    border: "#dadce0",
    accent: "#4f46e5",
    accent_text: "#ffffff",
    error: "#dc2626",
    success: "#16a34a",
    brand: "#3ecf8e",
    brand_text: "#1c1c1c",
};

pub const DARK_PALETTE: ColorPalette = ColorPalette {
    bg_primary: "#1a1a1a",
    bg_secondary: "#242424",
    bg_tertiary: "#2d2d2d",
    text_primary: "#e8eaed",
    text_secondary: "#9aa0a6",
    text_muted: "#5f6368",
    border: "#3c4043",
    accent: "#818cf8",
    accent_text: "#1a1a1a",
    error: "#f87171",
    success: "#4ade80",
    brand: "#3ecf8e",
    brand_text: "#ededed",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_modes_ignore_system_preference() {
        assert_eq!(resolve_theme(ThemeMode::Light), ResolvedTheme::Light);
        assert_eq!(resolve_theme(ThemeMode::Dark), ResolvedTheme::Dark);
        assert!(resolve_theme(ThemeMode::Dark).is_dark());
    }

    #[test]
    fn palettes_differ_by_theme() {
        assert_ne!(
            ResolvedTheme::Light.palette().bg_primary,
            ResolvedTheme::Dark.palette().bg_primary
        );
        assert_eq!(ResolvedTheme::Dark.attr(), "dark");
    }

    #[test]
    fn supabase_wordmark_follows_theme() {
        let light = ResolvedTheme::Light.palette();
        let dark = ResolvedTheme::Dark.palette();
        assert_ne!(light.brand_text, dark.brand_text);
        assert_ne!(light.brand_text, light.bg_primary);
        assert_ne!(dark.brand_text, dark.bg_primary);
    }
}
