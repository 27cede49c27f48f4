//! Settings repository implementation
//!
//! Stores the non-secret part of [`Settings`] as key/value rows. Tokens are
//! handled by [`crate::auth::TokenPersistence`] and never touch this table.

use libsql::Connection;

use crate::error::Result;
use crate::models::{Settings, ThemeMode};

const KEY_THEME: &str = "theme";
const KEY_TEST_MODE: &str = "is_test_mode";
const KEY_LOCAL_URL: &str = "supabase.local_url";
const KEY_LOCAL_ANON_KEY: &str = "supabase.local_anon_key";

/// Trait for settings storage operations (async)
#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    /// Load settings from the database
    async fn load(&self) -> Result<Settings>;

    /// Save settings to the database
    async fn save(&self, settings: &Settings) -> Result<()>;
}

/// libSQL implementation of `SettingsRepository`
pub struct LibSqlSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for LibSqlSettingsRepository<'_> {
    async fn load(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(value) = self.get_setting(KEY_THEME).await? {
            settings.theme = parse_theme(&value);
        }

        if let Some(value) = self.get_setting(KEY_TEST_MODE).await? {
            settings.is_test_mode = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        settings.supabase.local_url = self.get_setting(KEY_LOCAL_URL).await?;
        settings.supabase.local_anon_key = self.get_setting(KEY_LOCAL_ANON_KEY).await?;

        Ok(settings)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        self.set_setting(KEY_THEME, Some(theme_str(settings.theme)))
            .await?;
        self.set_setting(
            KEY_TEST_MODE,
            Some(if settings.is_test_mode { "true" } else { "false" }),
        )
        .await?;
        self.set_setting(KEY_LOCAL_URL, settings.supabase.local_url.as_deref())
            .await?;
        self.set_setting(
            KEY_LOCAL_ANON_KEY,
            settings.supabase.local_anon_key.as_deref(),
        )
        .await?;
        Ok(())
    }
}

impl LibSqlSettingsRepository<'_> {
    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut rows = self
            .conn
            .query("SELECT value FROM settings WHERE key = ?", [key])
            .await?;

        if let Some(row) = rows.next().await? {
            let value: String = row.get(0)?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    async fn set_setting(&self, key: &str, value: Option<&str>) -> Result<()> {
        match value.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => {
                self.conn
                    .execute(
                        "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
                        [key, value],
                    )
                    .await?;
            }
            None => {
                self.conn
                    .execute("DELETE FROM settings WHERE key = ?", [key])
                    .await?;
            }
        }
        Ok(())
    }
}

const fn theme_str(theme: ThemeMode) -> &'static str {
    match theme {
        ThemeMode::Light => "light",
        ThemeMode::Dark => "dark",
        ThemeMode::System => "system",
    }
}

fn parse_theme(value: &str) -> ThemeMode {
    match value.trim() {
        "light" => ThemeMode::Light,
        "dark" => ThemeMode::Dark,
        _ => ThemeMode::System,
    }
}
