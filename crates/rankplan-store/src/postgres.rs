//! Postgres backend: one `projects` row per project with a JSONB snapshot.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rankplan_core::{AllData, AppConfig, Project, ProjectStatus, RunState};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{ProjectStore, StoreError};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

// Path relative to crates/rankplan-store/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Run all pending migrations against the pool.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// A row from the `projects` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    owner_id: String,
    name: String,
    status: String,
    run_state: serde_json::Value,
    data: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_project(self) -> Result<Project, StoreError> {
        let corrupt = |reason: String| StoreError::Corrupt {
            id: self.id.to_string(),
            reason,
        };
        let status: ProjectStatus = self.status.parse().map_err(corrupt)?;
        let run_state: RunState = serde_json::from_value(self.run_state)
            .map_err(|e| corrupt(format!("run_state: {e}")))?;
        let data: AllData = serde_json::from_value(self.data)
            .map_err(|e| corrupt(format!("data: {e}")))?;

        Ok(Project {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
            status,
            run_state,
            data,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, owner_id, name, status, run_state, data, created_at, updated_at FROM projects";

#[derive(Debug, Clone)]
pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    /// Wrap an existing pool. Migrations are assumed to have run.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, verify with `SELECT 1`, and apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlx`] if the connection or probe fails, or
    /// [`StoreError::Migration`] if a migration fails.
    pub async fn connect(database_url: &str, config: PoolConfig) -> Result<Self, StoreError> {
        let pool = connect_pool(database_url, config).await?;
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&pool)
            .await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn save(&self, project: &Project) -> Result<(), StoreError> {
        let encode = |source| StoreError::Encode {
            id: project.id,
            source,
        };
        let run_state = serde_json::to_value(&project.run_state).map_err(encode)?;
        let data = serde_json::to_value(&project.data).map_err(encode)?;

        sqlx::query(
            "INSERT INTO projects \
                 (id, owner_id, name, status, run_state, data, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO UPDATE SET \
                 owner_id = EXCLUDED.owner_id, \
                 name = EXCLUDED.name, \
                 status = EXCLUDED.status, \
                 run_state = EXCLUDED.run_state, \
                 data = EXCLUDED.data, \
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(project.id)
        .bind(&project.owner_id)
        .bind(&project.name)
        .bind(project.status.as_str())
        .bind(run_state)
        .bind(data)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(project_id = %project.id, backend = "postgres", "project saved");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ProjectRow::into_project).transpose()
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "{SELECT_COLUMNS} WHERE owner_id = $1 ORDER BY updated_at DESC, id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ProjectRow::into_project).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankplan_core::{BusinessProfile, FailureKind, Stage};

    #[test]
    fn pool_config_has_sane_defaults() {
        let config = PoolConfig::default();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert_eq!(config.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS);
    }

    fn row_for(project: &Project) -> ProjectRow {
        ProjectRow {
            id: project.id,
            owner_id: project.owner_id.clone(),
            name: project.name.clone(),
            status: project.status.as_str().to_string(),
            run_state: serde_json::to_value(&project.run_state).unwrap(),
            data: serde_json::to_value(&project.data).unwrap(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }

    #[test]
    fn row_converts_to_project() {
        let mut project = Project::new(
            "local",
            "HealthPlus",
            BusinessProfile::new("HealthPlus Clinic", "Healthcare"),
            Utc::now(),
        );
        project.run_state = RunState::Failed {
            stage: Stage::Keywords,
            kind: FailureKind::Transport,
            message: "timed out".to_string(),
        };

        let back = row_for(&project).into_project().unwrap();
        assert_eq!(back, project);
    }

    #[test]
    fn unknown_status_is_corrupt() {
        let project = Project::new(
            "local",
            "HealthPlus",
            BusinessProfile::new("HealthPlus Clinic", "Healthcare"),
            Utc::now(),
        );
        let mut row = row_for(&project);
        row.status = "deleted".to_string();

        let err = row.into_project().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");
    }
}
