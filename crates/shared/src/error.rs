//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// This is the outward-facing taxonomy a presentation layer maps to responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint or state conflict (e.g., duplicate code).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Not enough stock to satisfy a request.
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    /// Not enough funds in a treasury.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Access denied. The message is always generic.
    #[error("Access denied")]
    Forbidden,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InsufficientStock(_) | Self::InsufficientFunds(_) => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            Self::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            Self::Forbidden => "FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may retry with different input.
    ///
    /// Nothing in this taxonomy is retried automatically.
    #[must_use]
    pub const fn is_caller_correctable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Conflict(_)
                | Self::InsufficientStock(_)
                | Self::InsufficientFunds(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::Conflict(String::new()), 409, "CONFLICT")]
    #[case(AppError::InsufficientStock(String::new()), 422, "INSUFFICIENT_STOCK")]
    #[case(AppError::InsufficientFunds(String::new()), 422, "INSUFFICIENT_FUNDS")]
    #[case(AppError::Forbidden, 403, "FORBIDDEN")]
    #[case(AppError::Database(String::new()), 500, "DATABASE_ERROR")]
    #[case(AppError::Internal(String::new()), 500, "INTERNAL_ERROR")]
    fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::Conflict("msg".into()).to_string(),
            "Conflict: msg"
        );
        assert_eq!(
            AppError::InsufficientStock("msg".into()).to_string(),
            "Insufficient stock: msg"
        );
    }

    #[test]
    fn test_forbidden_is_generic() {
        assert_eq!(AppError::Forbidden.to_string(), "Access denied");
    }

    #[test]
    fn test_caller_correctable() {
        assert!(AppError::Conflict(String::new()).is_caller_correctable());
        assert!(AppError::InsufficientFunds(String::new()).is_caller_correctable());
        assert!(!AppError::Forbidden.is_caller_correctable());
        assert!(!AppError::Database(String::new()).is_caller_correctable());
    }
}
