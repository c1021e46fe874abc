//! Project snapshot persistence.
//!
//! [`ProjectStore`] is the load/save boundary the pipeline talks to. Three
//! backends implement it: Postgres ([`PgProjectStore`]), one JSON file per
//! project ([`FileProjectStore`]), and an in-process map
//! ([`MemoryProjectStore`]). [`connect_store`] picks Postgres when it is
//! reachable and falls back to files otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use rankplan_core::{AppConfig, Project};
use thiserror::Error;
use uuid::Uuid;

pub mod file;
pub mod memory;
pub mod postgres;

pub use file::FileProjectStore;
pub use memory::MemoryProjectStore;
pub use postgres::{connect_pool, run_migrations, PgProjectStore, PoolConfig};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt project snapshot {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("failed to encode project {id}: {source}")]
    Encode {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Load/save boundary for project snapshots. Last write wins.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert or replace the snapshot with `project.id`.
    async fn save(&self, project: &Project) -> Result<(), StoreError>;

    /// `Ok(None)` when no project has this id.
    async fn load(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Projects owned by `owner_id`, most recently updated first.
    async fn list(&self, owner_id: &str) -> Result<Vec<Project>, StoreError>;

    /// `Ok(true)` if a project was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Short backend name for logs and the CLI.
    fn backend(&self) -> &'static str;
}

#[async_trait]
impl<S> ProjectStore for Arc<S>
where
    S: ProjectStore + ?Sized,
{
    async fn save(&self, project: &Project) -> Result<(), StoreError> {
        (**self).save(project).await
    }

    async fn load(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        (**self).load(id).await
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Project>, StoreError> {
        (**self).list(owner_id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}

#[async_trait]
impl<S> ProjectStore for Box<S>
where
    S: ProjectStore + ?Sized,
{
    async fn save(&self, project: &Project) -> Result<(), StoreError> {
        (**self).save(project).await
    }

    async fn load(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        (**self).load(id).await
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Project>, StoreError> {
        (**self).list(owner_id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}

/// Open the configured store.
///
/// With `DATABASE_URL` set, connects, probes with `SELECT 1` and runs
/// migrations; any failure there is logged and the file store under
/// `data_dir` is used instead. Without it, the file store is used directly.
pub async fn connect_store(config: &AppConfig) -> Box<dyn ProjectStore> {
    if let Some(url) = config.database_url.as_deref() {
        match PgProjectStore::connect(url, PoolConfig::from_app_config(config)).await {
            Ok(store) => {
                tracing::info!(backend = "postgres", "project store ready");
                return Box::new(store);
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    data_dir = %config.data_dir.display(),
                    "database unavailable, falling back to file store"
                );
            }
        }
    }

    tracing::info!(backend = "file", data_dir = %config.data_dir.display(), "project store ready");
    Box::new(FileProjectStore::new(&config.data_dir))
}

/// Sort newest first; shared by the non-SQL backends.
pub(crate) fn sort_recent_first(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
}
