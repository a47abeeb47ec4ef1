use thiserror::Error;
use uuid::Uuid;

use trellis_core::validate::ValidationError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The form does not exist, or exists but is soft-deleted.
    #[error("assessment form not found: {0}")]
    NotFound(Uuid),

    /// One or more rule violations; always carries the complete list.
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The persistence layer could not be reached or timed out. Distinct
    /// from [`StoreError::NotFound`]: callers must not treat storage
    /// failure as "record absent".
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
