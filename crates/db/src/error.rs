//! Error type returned by every repository.

use mizan_core::DomainError;
use mizan_shared::AppError;
use sea_orm::{DbErr, SqlErr};

/// Result alias for repository operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Repository error: a business-rule rejection or a database failure.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Business-rule rejection.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Database failure not attributable to input.
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl ServiceError {
    /// The domain error, if this is one.
    #[must_use]
    pub const fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Database(_) => None,
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                Self::Domain(DomainError::Conflict(detail))
            }
            _ => Self::Database(err),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_passes_through() {
        let err = ServiceError::from(DomainError::Forbidden);
        assert_eq!(err.to_string(), "Access denied");
        assert_eq!(AppError::from(err).status_code(), 403);
    }

    #[test]
    fn test_plain_db_error_stays_database() {
        let err = ServiceError::from(DbErr::Custom("boom".into()));
        assert!(err.domain().is_none());
        assert_eq!(AppError::from(err).status_code(), 500);
    }
}
