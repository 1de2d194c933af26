use async_trait::async_trait;

use super::domain::Announcement;
use crate::errors::ServiceError;

/// Whole-collection persistence for announcements.
///
/// `load` always returns the collection in stored order; `save` replaces the
/// stored collection with exactly the given sequence. Implementations keep no
/// cache between calls.
#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn load(&self) -> Result<Vec<Announcement>, ServiceError>;
    async fn save(&self, items: &[Announcement]) -> Result<(), ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryRepository {
        items: Mutex<Vec<Announcement>>,
    }

    impl InMemoryRepository {
        pub fn with_items(items: Vec<Announcement>) -> Self {
            Self { items: Mutex::new(items) }
        }
    }

    #[async_trait]
    impl AnnouncementRepository for InMemoryRepository {
        async fn load(&self) -> Result<Vec<Announcement>, ServiceError> {
            let items = self.items.lock().map_err(|e| ServiceError::storage("in-memory load", e))?;
            Ok(items.clone())
        }

        async fn save(&self, items: &[Announcement]) -> Result<(), ServiceError> {
            let mut stored = self.items.lock().map_err(|e| ServiceError::storage("in-memory save", e))?;
            *stored = items.to_vec();
            Ok(())
        }
    }
}
