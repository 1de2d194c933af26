//! Announcement records: domain types, persistence contract and the CRUD service.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{Announcement, AnnouncementId, AnnouncementInput};
pub use repository::AnnouncementRepository;
pub use service::AnnouncementService;
