use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown sentiment: {0}")]
    UnknownSentiment(String),

    #[error("unknown stakeholder type: {0}")]
    UnknownStakeholderType(String),

    #[error("unknown flag filter: {0}")]
    UnknownFlagFilter(String),

    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("unknown sort order: {0}")]
    UnknownSortOrder(String),

    #[error("page size must be at least 1")]
    ZeroPageSize,
}
