//! Local JSON-file backend: `<data_dir>/<project id>.json`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rankplan_core::Project;
use uuid::Uuid;

use crate::{sort_recent_first, ProjectStore, StoreError};

#[derive(Debug, Clone)]
pub struct FileProjectStore {
    dir: PathBuf,
}

impl FileProjectStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    async fn read_project(path: &Path) -> Result<Option<Project>, StoreError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                id: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl ProjectStore for FileProjectStore {
    async fn save(&self, project: &Project) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;

        let body = serde_json::to_vec_pretty(project).map_err(|source| StoreError::Encode {
            id: project.id,
            source,
        })?;

        // Write beside the target and rename so readers never see a partial file.
        let path = self.path_for(project.id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        tracing::debug!(project_id = %project.id, path = %path.display(), "project saved");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Self::read_project(&self.path_for(id)).await
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Project>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut projects = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_project(&path).await {
                Ok(Some(project)) if project.owner_id == owner_id => projects.push(project),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable project file");
                }
            }
        }

        sort_recent_first(&mut projects);
        Ok(projects)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let path = self.path_for(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rankplan_core::BusinessProfile;

    #[tokio::test]
    async fn corrupt_file_is_reported_on_load_and_skipped_on_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProjectStore::new(dir.path());

        let good = Project::new(
            "local",
            "Good",
            BusinessProfile::new("HealthPlus Clinic", "Healthcare"),
            Utc::now(),
        );
        store.save(&good).await.unwrap();

        let bad_id = Uuid::new_v4();
        std::fs::write(dir.path().join(format!("{bad_id}.json")), b"{ not json").unwrap();

        let err = store.load(bad_id).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");

        let listed = store.list("local").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, good.id);
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProjectStore::new(dir.path().join("nested"));
        let project = Project::new(
            "local",
            "P",
            BusinessProfile::new("HealthPlus Clinic", "Healthcare"),
            Utc::now(),
        );

        store.save(&project).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{}.json", project.id)]);
    }

    #[tokio::test]
    async fn list_on_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProjectStore::new(dir.path().join("never-created"));
        assert!(store.list("local").await.unwrap().is_empty());
        assert!(!store.delete(Uuid::new_v4()).await.unwrap());
    }
}
