use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::domain::{next_id, parse_id, timestamp, Announcement, AnnouncementInput};
use super::repository::AnnouncementRepository;
use crate::errors::ServiceError;

/// Announcement CRUD independent of the web framework.
///
/// Every operation is one read-modify-write cycle over the whole collection.
/// Mutations run one at a time behind `write_lock`, so two concurrent writes
/// can no longer both load the same snapshot and drop each other's change.
pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
    write_lock: Mutex<()>,
}

impl AnnouncementService {
    pub fn new(repo: Arc<dyn AnnouncementRepository>) -> Self {
        Self { repo, write_lock: Mutex::new(()) }
    }

    /// Active announcements only, in stored order.
    #[instrument(skip(self))]
    pub async fn list_public(&self) -> Result<Vec<Announcement>, ServiceError> {
        let items = self.repo.load().await?;
        Ok(items.into_iter().filter(|a| a.active).collect())
    }

    /// Every announcement, in stored order.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Announcement>, ServiceError> {
        self.repo.load().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, raw_id: &str) -> Result<Announcement, ServiceError> {
        let id = parse_id(raw_id)?;
        self.repo
            .load()
            .await?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or(ServiceError::NotFound)
    }

    /// Append a new record with the next free id.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::announcements::{AnnouncementService, AnnouncementInput};
    /// use service::announcements::repository::mock::InMemoryRepository;
    /// let svc = AnnouncementService::new(Arc::new(InMemoryRepository::default()));
    /// let input = AnnouncementInput { title: Some("Hi".into()), content: Some("Body".into()), active: None };
    /// let created = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(created.id, 1);
    /// assert!(created.active);
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: AnnouncementInput) -> Result<Announcement, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.repo.load().await?;
        let created = input.into_announcement(next_id(&items)?, timestamp::now());
        items.push(created.clone());
        self.repo.save(&items).await?;
        info!(id = created.id, "announcement_created");
        Ok(created)
    }

    /// Overwrite the supplied fields of one record in place and stamp `updated_at`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::announcements::{AnnouncementService, AnnouncementInput};
    /// use service::announcements::repository::mock::InMemoryRepository;
    /// let svc = AnnouncementService::new(Arc::new(InMemoryRepository::default()));
    /// let _ = tokio_test::block_on(svc.create(AnnouncementInput::default())).unwrap();
    /// let input = AnnouncementInput { active: Some(false), ..Default::default() };
    /// let updated = tokio_test::block_on(svc.update("1", input)).unwrap();
    /// assert_eq!(updated.title, "Untitled");
    /// assert!(!updated.active);
    /// assert!(updated.updated_at.is_some());
    /// ```
    #[instrument(skip(self, input))]
    pub async fn update(&self, raw_id: &str, input: AnnouncementInput) -> Result<Announcement, ServiceError> {
        let id = parse_id(raw_id)?;
        let _guard = self.write_lock.lock().await;
        let mut items = self.repo.load().await?;
        let existing = items
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ServiceError::NotFound)?;
        input.apply_to(existing, timestamp::now());
        let updated = existing.clone();
        self.repo.save(&items).await?;
        info!(id, "announcement_updated");
        Ok(updated)
    }

    /// Remove one record; the returned value is the record as it was stored.
    #[instrument(skip(self))]
    pub async fn delete(&self, raw_id: &str) -> Result<Announcement, ServiceError> {
        let id = parse_id(raw_id)?;
        let _guard = self.write_lock.lock().await;
        let mut items = self.repo.load().await?;
        let index = items
            .iter()
            .position(|a| a.id == id)
            .ok_or(ServiceError::NotFound)?;
        let removed = items.remove(index);
        self.repo.save(&items).await?;
        info!(id, remaining = items.len(), "announcement_deleted");
        debug!(title = %removed.title, "deleted record");
        Ok(removed)
    }
}
