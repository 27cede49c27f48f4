use std::sync::Arc;

use tokio::sync::watch;

use crate::db::{AppRepository, Database, LibSqlAppRepository};
use crate::error::Result;
use crate::models::{App, AppId};

/// Observable view of a single app record.
#[allow(async_fn_in_trait)]
pub trait AppSource {
    fn app_id(&self) -> AppId;

    /// Last loaded record; `None` if the app does not exist.
    fn current(&self) -> Option<App>;

    fn subscribe(&self) -> watch::Receiver<Option<App>>;

    /// Reload the record and publish it.
    async fn refresh(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct AppLoader {
    app_id: AppId,
    db: Database,
    tx: Arc<watch::Sender<Option<App>>>,
}

impl AppLoader {
    pub async fn load(db: Database, app_id: AppId) -> Result<Self> {
        let app = LibSqlAppRepository::new(db.connection()).get(app_id).await?;
        if app.is_none() {
            tracing::warn!("App {} not found", app_id);
        }
        let (tx, _) = watch::channel(app);
        Ok(Self {
            app_id,
            db,
            tx: Arc::new(tx),
        })
    }
}

impl AppSource for AppLoader {
    fn app_id(&self) -> AppId {
        self.app_id
    }

    fn current(&self) -> Option<App> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<App>> {
        self.tx.subscribe()
    }

    async fn refresh(&self) -> Result<()> {
        let app = LibSqlAppRepository::new(self.db.connection())
            .get(self.app_id)
            .await?;
        self.tx.send_replace(app);
        Ok(())
    }
}
