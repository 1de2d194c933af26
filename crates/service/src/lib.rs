//! Service layer for the announcements board.
//! - `announcements`: domain types, the persistence contract and the CRUD service.
//! - `storage`: the JSON file backend.
//! - No knowledge of HTTP lives here.

pub mod errors;
pub mod announcements;
pub mod storage;
pub mod runtime;
