use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("announcement not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn storage(context: impl Display, err: impl Display) -> Self {
        Self::Storage(format!("{context}: {err}"))
    }
}
