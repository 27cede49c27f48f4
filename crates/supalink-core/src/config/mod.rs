//! Bootstrap configuration for client apps.
//!
//! Provides the endpoints the desktop app and CLI need to reach the OAuth
//! broker and the Supabase Management API, plus the deep-link scheme the OS
//! routes OAuth returns through.

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option, trim_base_url};

pub const DEFAULT_OAUTH_LOGIN_URL: &str =
    "https://supabase-oauth.dyad.sh/api/connect-supabase/login";
pub const DEFAULT_MANAGEMENT_API_URL: &str = "https://api.supabase.com";
pub const DEFAULT_DASHBOARD_URL: &str = "https://supabase.com/dashboard";
pub const DEFAULT_DEEP_LINK_SCHEME: &str = "supalink";

/// Resolved client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub oauth_login_url: String,
    pub management_api_url: String,
    pub dashboard_url: String,
    pub deep_link_scheme: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            oauth_login_url: DEFAULT_OAUTH_LOGIN_URL.to_string(),
            management_api_url: DEFAULT_MANAGEMENT_API_URL.to_string(),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            deep_link_scheme: DEFAULT_DEEP_LINK_SCHEME.to_string(),
        }
    }
}

/// Optional overrides, e.g. embedded at build time or read from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BootstrapOverrides {
    #[serde(default)]
    pub oauth_login_url: Option<String>,
    #[serde(default)]
    pub management_api_url: Option<String>,
    #[serde(default)]
    pub deep_link_scheme: Option<String>,
}

impl BootstrapOverrides {
    /// Read overrides from `SUPALINK_OAUTH_LOGIN_URL`,
    /// `SUPABASE_MANAGEMENT_API_URL` and `SUPALINK_DEEP_LINK_SCHEME`.
    pub fn from_env() -> Self {
        Self {
            oauth_login_url: std::env::var("SUPALINK_OAUTH_LOGIN_URL").ok(),
            management_api_url: std::env::var("SUPABASE_MANAGEMENT_API_URL").ok(),
            deep_link_scheme: std::env::var("SUPALINK_DEEP_LINK_SCHEME").ok(),
        }
    }

    /// Layer `other` on top of `self`; values set in `other` win.
    #[must_use]
    pub fn merged_with(self, other: Self) -> Self {
        Self {
            oauth_login_url: normalize_text_option(other.oauth_login_url)
                .or(self.oauth_login_url),
            management_api_url: normalize_text_option(other.management_api_url)
                .or(self.management_api_url),
            deep_link_scheme: normalize_text_option(other.deep_link_scheme)
                .or(self.deep_link_scheme),
        }
    }
}

impl BootstrapConfig {
    /// Apply overrides on top of the defaults.
    ///
    /// Empty values fall back to defaults; malformed URLs are rejected.
    pub fn resolve(overrides: BootstrapOverrides) -> Result<Self, String> {
        let defaults = Self::default();

        let oauth_login_url = normalize_optional_http_url(
            overrides.oauth_login_url,
            "oauth_login_url",
        )?
        .unwrap_or(defaults.oauth_login_url);
        let management_api_url = normalize_optional_http_url(
            overrides.management_api_url,
            "management_api_url",
        )?
        .unwrap_or(defaults.management_api_url);
        let deep_link_scheme = match normalize_text_option(overrides.deep_link_scheme) {
            Some(scheme) => normalize_scheme(&scheme)?,
            None => defaults.deep_link_scheme,
        };

        Ok(Self {
            oauth_login_url,
            management_api_url,
            dashboard_url: defaults.dashboard_url,
            deep_link_scheme,
        })
    }

    /// Resolve from environment variables only.
    pub fn from_env() -> Result<Self, String> {
        Self::resolve(BootstrapOverrides::from_env())
    }

    /// Dashboard page of a cloud project.
    pub fn project_dashboard_url(&self, project_id: &str) -> String {
        format!("{}/project/{}", trim_base_url(&self.dashboard_url), project_id)
    }
}

fn normalize_optional_http_url(raw: Option<String>, field: &str) -> Result<Option<String>, String> {
    let Some(value) = normalize_text_option(raw) else {
        return Ok(None);
    };
    if is_http_url(&value) {
        Ok(Some(trim_base_url(&value).to_string()))
    } else {
        Err(format!(
            "config field '{field}' must include http:// or https://"
        ))
    }
}

fn normalize_scheme(raw: &str) -> Result<String, String> {
    let scheme = raw.trim().trim_end_matches("://").to_ascii_lowercase();
    let valid = scheme
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if valid {
        Ok(scheme)
    } else {
        Err(format!("invalid deep link scheme '{raw}'"))
    }
}
