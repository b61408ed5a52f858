use thiserror::Error;

use super::models::HeadingId;

/// Errors raised while validating or editing a heading list
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutlineError {
    #[error("Duplicate heading id: {0}")]
    DuplicateId(HeadingId),

    #[error("Heading {id} has invalid level {level}")]
    InvalidLevel { id: HeadingId, level: u32 },

    #[error("Heading {0} names itself as its parent")]
    SelfParent(HeadingId),

    #[error("Heading not found: {0}")]
    NotFound(HeadingId),
}

pub type OutlineResult<T> = Result<T, OutlineError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search query must not be empty")]
    InvalidQuery,
}
