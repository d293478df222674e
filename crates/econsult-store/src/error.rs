use econsult_core::{CommentId, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("comment not found: {0}")]
    NotFound(CommentId),

    #[error("duplicate comment id: {0}")]
    DuplicateId(CommentId),

    #[error("comment {id} has confidence {confidence} outside [0, 1]")]
    InvalidConfidence { id: CommentId, confidence: f64 },

    #[error("no comments selected for export")]
    NothingToExport,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
