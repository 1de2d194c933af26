use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::announcements::domain::{seed_collection, timestamp, Announcement};
use crate::announcements::repository::AnnouncementRepository;
use crate::errors::ServiceError;

/// The announcement collection persisted as one pretty-printed JSON array.
///
/// Every `load` re-reads the file. Every `save` writes a sibling temp file
/// and renames it over the target, so readers see either the old or the new
/// collection, never a truncated one.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Wrap a path without touching the filesystem.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    /// Open the store, creating the parent directory and writing the seed
    /// collection if the file does not exist yet.
    pub async fn init_with_seed<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = Self::new(path);
        if let Some(parent) = store.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::storage(format!("create {}", parent.display()), e))?;
        }

        let exists = fs::try_exists(&store.file_path)
            .await
            .map_err(|e| ServiceError::storage(format!("stat {}", store.file_path.display()), e))?;
        if !exists {
            store.save(&seed_collection(timestamp::now())).await?;
            info!(path = %store.file_path.display(), "initialized announcements file with seed record");
        }
        Ok(Arc::new(store))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "announcements.json".into());
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}

#[async_trait]
impl AnnouncementRepository for JsonFileStore {
    async fn load(&self) -> Result<Vec<Announcement>, ServiceError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|e| ServiceError::storage(format!("read {}", self.file_path.display()), e))?;
        let items: Vec<Announcement> = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::storage(format!("parse {}", self.file_path.display()), e))?;
        debug!(count = items.len(), "loaded announcements");
        Ok(items)
    }

    async fn save(&self, items: &[Announcement]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items).map_err(|e| ServiceError::storage("serialize announcements", e))?;
        let tmp = self.temp_path();
        fs::write(&tmp, data)
            .await
            .map_err(|e| ServiceError::storage(format!("write {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.file_path)
            .await
            .map_err(|e| ServiceError::storage(format!("replace {}", self.file_path.display()), e))?;
        debug!(count = items.len(), "saved announcements");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcements::domain::{AnnouncementInput, SEED_TITLE};
    use crate::announcements::AnnouncementService;

    fn tmp_file() -> PathBuf {
        std::env::temp_dir()
            .join(format!("announcements_{}", uuid::Uuid::new_v4()))
            .join("announcements.json")
    }

    #[tokio::test]
    async fn init_writes_seed_once() -> Result<(), anyhow::Error> {
        let path = tmp_file();
        let store = JsonFileStore::init_with_seed(&path).await?;
        let items = store.load().await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
        assert_eq!(items[0].title, SEED_TITLE);
        assert!(items[0].active);

        // an existing file is left alone
        store.save(&[]).await?;
        let reopened = JsonFileStore::init_with_seed(&path).await?;
        assert!(reopened.load().await?.is_empty());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_is_pretty_json_array_in_order() -> Result<(), anyhow::Error> {
        let path = tmp_file();
        let store = JsonFileStore::init_with_seed(&path).await?;
        let now = timestamp::now();
        let items = vec![
            AnnouncementInput::default().into_announcement(5, now),
            AnnouncementInput::default().into_announcement(2, now),
        ];
        store.save(&items).await?;

        let raw = tokio::fs::read_to_string(&path).await?;
        assert!(raw.starts_with("[\n  {"));
        let parsed: serde_json::Value = serde_json::from_str(&raw)?;
        assert_eq!(parsed[0]["id"], 5);
        assert_eq!(parsed[1]["id"], 2);
        assert!(!store.temp_path().exists());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn created_record_survives_reload() -> Result<(), anyhow::Error> {
        let path = tmp_file();
        let store = JsonFileStore::init_with_seed(&path).await?;
        let svc = AnnouncementService::new(store);
        let created = svc
            .create(AnnouncementInput { title: Some("Hi".into()), content: Some("Body".into()), active: None })
            .await?;
        assert_eq!(created.id, 2);

        let reloaded = JsonFileStore::new(&path).load().await?;
        assert_eq!(reloaded.last(), Some(&created));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_save_leaves_previous_document_intact() -> Result<(), anyhow::Error> {
        let path = tmp_file();
        let store = JsonFileStore::init_with_seed(&path).await?;
        let before = tokio::fs::read(&path).await?;

        // a directory squatting on the temp path makes the write fail
        tokio::fs::create_dir(store.temp_path()).await?;
        let svc = AnnouncementService::new(store.clone());
        let err = svc.create(AnnouncementInput::default()).await;
        assert!(matches!(err, Err(ServiceError::Storage(_))));

        assert_eq!(tokio::fs::read(&path).await?, before);
        let items = store.load().await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, SEED_TITLE);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_or_corrupt_file_is_storage_error() -> Result<(), anyhow::Error> {
        let path = tmp_file();
        let missing = JsonFileStore::new(&path);
        assert!(matches!(missing.load().await, Err(ServiceError::Storage(_))));

        let store = JsonFileStore::init_with_seed(&path).await?;
        tokio::fs::write(&path, b"{\"not\": \"an array\"}").await?;
        assert!(matches!(store.load().await, Err(ServiceError::Storage(_))));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}
