//! Date range error types
//!
//! Both variants are request rejections: they are reported back to the
//! caller verbatim and never retried.

use thiserror::Error;

/// Errors raised while resolving a requested date range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// A bound is unparsable, in the future, or `from` is after `to`
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Inclusive span exceeds the domain maximum
    #[error("Range too large: {span} days requested, at most {max} allowed")]
    RangeTooLarge { span: i64, max: u32 },
}

/// Result type alias for range resolution
pub type RangeResult<T> = Result<T, RangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RangeError::InvalidRange("from '2024-13-01' is not a valid date".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid range: from '2024-13-01' is not a valid date"
        );

        let err = RangeError::RangeTooLarge { span: 8, max: 7 };
        assert_eq!(
            err.to_string(),
            "Range too large: 8 days requested, at most 7 allowed"
        );
    }
}
