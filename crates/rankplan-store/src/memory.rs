//! In-process backend for tests and dry runs.

use std::collections::HashMap;

use async_trait::async_trait;
use rankplan_core::Project;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{sort_recent_first, ProjectStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: RwLock<HashMap<Uuid, Project>>,
}

impl MemoryProjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn save(&self, project: &Project) -> Result<(), StoreError> {
        self.projects
            .write()
            .await
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Project>, StoreError> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .await
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        sort_recent_first(&mut projects);
        Ok(projects)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.projects.write().await.remove(&id).is_some())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
