//! Application settings model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow system preference
    #[default]
    System,
}

/// Persisted Supabase connection configuration.
///
/// Tokens come from secure storage; the local URL and anon key come from the
/// settings table. A fully populated local pair means "connected to a local
/// instance" unless the app is also linked to a cloud project.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupabaseSettings {
    /// OAuth access token for the Supabase Management API
    #[serde(default)]
    pub access_token: Option<String>,
    /// OAuth refresh token issued alongside the access token
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token expiry (Unix seconds)
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Base URL of a self-hosted / local Supabase instance
    #[serde(default)]
    pub local_url: Option<String>,
    /// Public anon key of the local instance
    #[serde(default)]
    pub local_anon_key: Option<String>,
}

impl SupabaseSettings {
    /// Whether an OAuth access token is present.
    pub fn has_access_token(&self) -> bool {
        self.access_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty())
    }

    /// Returns the local URL when both local fields are populated.
    pub fn local_connection(&self) -> Option<&str> {
        let url = self.local_url.as_deref().filter(|url| !url.trim().is_empty())?;
        self.local_anon_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(|_| url)
    }
}

impl fmt::Debug for SupabaseSettings {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "[REDACTED]");
        formatter
            .debug_struct("SupabaseSettings")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .field("local_url", &self.local_url)
            .field("local_anon_key", &redact(&self.local_anon_key))
            .finish()
    }
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Theme mode
    pub theme: ThemeMode,
    /// When set, the OAuth entry point runs the fake connect flow instead of
    /// opening a browser.
    pub is_test_mode: bool,
    /// Supabase connection configuration
    pub supabase: SupabaseSettings,
}

/// Partial settings update. `None` leaves a section untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub theme: Option<ThemeMode>,
    pub is_test_mode: Option<bool>,
    pub supabase: Option<SupabaseSettings>,
}

impl SettingsPatch {
    /// Replace the whole Supabase section.
    #[must_use]
    pub fn supabase(supabase: SupabaseSettings) -> Self {
        Self {
            supabase: Some(supabase),
            ..Self::default()
        }
    }

    /// Apply the patch on top of `settings`.
    pub fn apply(self, settings: &mut Settings) {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(is_test_mode) = self.is_test_mode {
            settings.is_test_mode = is_test_mode;
        }
        if let Some(supabase) = self.supabase {
            settings.supabase = supabase;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeMode::System);
        assert!(!settings.is_test_mode);
        assert!(!settings.supabase.has_access_token());
    }

    #[test]
    fn local_connection_requires_both_fields() {
        let mut supabase = SupabaseSettings {
            local_url: Some("http://localhost:54321".to_string()),
            ..SupabaseSettings::default()
        };
        assert_eq!(supabase.local_connection(), None);

        supabase.local_anon_key = Some("  ".to_string());
        assert_eq!(supabase.local_connection(), None);

        supabase.local_anon_key = Some("anon".to_string());
        assert_eq!(supabase.local_connection(), Some("http://localhost:54321"));
    }

    #[test]
    fn patch_only_touches_given_sections() {
        let mut settings = Settings {
            theme: ThemeMode::Dark,
            ..Settings::default()
        };
        SettingsPatch {
            is_test_mode: Some(true),
            ..SettingsPatch::default()
        }
        .apply(&mut settings);

        assert_eq!(settings.theme, ThemeMode::Dark);
        assert!(settings.is_test_mode);
    }

    #[test]
    fn supabase_debug_redacts_secrets() {
        let supabase = SupabaseSettings {
            access_token: Some("secret-access".to_string()),
            refresh_token: Some("secret-refresh".to_string()),
            local_anon_key: Some("secret-anon".to_string()),
            local_url: Some("http://localhost:54321".to_string()),
            expires_at: None,
        };
        let rendered = format!("{supabase:?}");
        assert!(!rendered.contains("secret-"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("localhost:54321"));
    }
}
