use std::sync::Arc;

use service::announcements::{AnnouncementRepository, AnnouncementService};

/// Shared handler state; cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub announcements: Arc<AnnouncementService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn AnnouncementRepository>) -> Self {
        Self { announcements: Arc::new(AnnouncementService::new(repo)) }
    }
}
