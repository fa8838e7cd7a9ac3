//! Pagination error types

use thiserror::Error;

/// Errors raised while building a page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// Page size must be at least 1
    #[error("Invalid limit: {0} (page size must be at least 1)")]
    InvalidLimit(i64),
}

/// Result type alias for pagination
pub type PaginationResult<T> = Result<T, PaginationError>;
