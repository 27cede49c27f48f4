//! App record repository implementation

use libsql::{params, Connection, Row};

use crate::error::{Error, Result};
use crate::models::{App, AppId};
use crate::util::{normalize_text_option, unix_timestamp_millis_now};

const APP_COLUMNS: &str =
    "id, name, supabase_project_id, supabase_project_name, created_at, updated_at";

/// Trait for app record storage operations (async)
#[allow(async_fn_in_trait)]
pub trait AppRepository {
    /// Create a new app record
    async fn create(&self, name: &str) -> Result<App>;

    /// Get an app by ID
    async fn get(&self, id: AppId) -> Result<Option<App>>;

    /// List apps, most recently updated first
    async fn list(&self) -> Result<Vec<App>>;

    /// Link the app to a cloud project
    async fn set_supabase_project(
        &self,
        id: AppId,
        project_id: &str,
        project_name: Option<&str>,
    ) -> Result<App>;

    /// Remove any cloud project link from the app
    async fn clear_supabase_project(&self, id: AppId) -> Result<App>;

    /// Delete an app record
    async fn delete(&self, id: AppId) -> Result<()>;
}

/// libSQL implementation of `AppRepository`
pub struct LibSqlAppRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlAppRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_app(row: &Row) -> Result<App> {
        Ok(App {
            id: AppId(row.get(0)?),
            name: row.get(1)?,
            supabase_project_id: row.get(2)?,
            supabase_project_name: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    async fn require(&self, id: AppId) -> Result<App> {
        self.get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("app {id}")))
    }
}

impl AppRepository for LibSqlAppRepository<'_> {
    async fn create(&self, name: &str) -> Result<App> {
        let name = normalize_text_option(Some(name.to_string()))
            .ok_or_else(|| Error::InvalidInput("App name cannot be empty".into()))?;
        let now = unix_timestamp_millis_now();

        self.conn
            .execute(
                "INSERT INTO apps (name, created_at, updated_at) VALUES (?, ?, ?)",
                params![name.as_str(), now, now],
            )
            .await?;
        let id = AppId(self.conn.last_insert_rowid());
        tracing::debug!("Created app {} ({})", id, name);

        self.require(id).await
    }

    async fn get(&self, id: AppId) -> Result<Option<App>> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {APP_COLUMNS} FROM apps WHERE id = ?"),
                params![id.0],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_app(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<App>> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {APP_COLUMNS} FROM apps ORDER BY updated_at DESC, id DESC"),
                (),
            )
            .await?;

        let mut apps = Vec::new();
        while let Some(row) = rows.next().await? {
            apps.push(Self::parse_app(&row)?);
        }
        Ok(apps)
    }

    async fn set_supabase_project(
        &self,
        id: AppId,
        project_id: &str,
        project_name: Option<&str>,
    ) -> Result<App> {
        let project_id = project_id.trim();
        if project_id.is_empty() {
            return Err(Error::InvalidInput("Project ID cannot be empty".into()));
        }
        let project_name = normalize_text_option(project_name.map(str::to_string));

        let updated = self
            .conn
            .execute(
                "UPDATE apps SET supabase_project_id = ?, supabase_project_name = ?, updated_at = ? WHERE id = ?",
                params![project_id, project_name, unix_timestamp_millis_now(), id.0],
            )
            .await?;
        if updated == 0 {
            return Err(Error::NotFound(format!("app {id}")));
        }

        self.require(id).await
    }

    async fn clear_supabase_project(&self, id: AppId) -> Result<App> {
        let updated = self
            .conn
            .execute(
                "UPDATE apps SET supabase_project_id = NULL, supabase_project_name = NULL, updated_at = ? WHERE id = ?",
                params![unix_timestamp_millis_now(), id.0],
            )
            .await?;
        if updated == 0 {
            return Err(Error::NotFound(format!("app {id}")));
        }

        self.require(id).await
    }

    async fn delete(&self, id: AppId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM apps WHERE id = ?", params![id.0])
            .await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("app {id}")));
        }
        Ok(())
    }
}
