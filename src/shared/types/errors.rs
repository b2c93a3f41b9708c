use std::time::Duration;

use thiserror::Error;

/// Failures raised by a record store.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::StoreUnavailable(format!("Database error: {}", e))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures surfaced by the directory listing use case.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Store(#[from] DomainError),

    #[error("Store did not answer within {0:?}")]
    StoreTimeout(Duration),

    #[error("Failed to project record: {0}")]
    Projection(#[from] serde_json::Error),
}

impl DirectoryError {
    /// Whether the failure came from the store being slow or unreachable,
    /// as opposed to a defect in the service itself.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, DirectoryError::Store(_) | DirectoryError::StoreTimeout(_))
    }
}
