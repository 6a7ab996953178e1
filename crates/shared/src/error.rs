//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wallet balance cannot cover the requested debit.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// No rate provider could supply a usable price.
    #[error("Rate unavailable: {0}")]
    RateUnavailable(String),

    /// An account with this identity already exists.
    #[error("Duplicate account: {0}")]
    DuplicateAccount(String),

    /// Concurrent-write race detected by an atomic commit.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::InsufficientFunds(_) => 422,
            Self::RateUnavailable(_) => 502,
            Self::DuplicateAccount(_) | Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            Self::RateUnavailable(_) => "RATE_UNAVAILABLE",
            Self::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::InsufficientFunds(String::new()).status_code(), 422);
        assert_eq!(AppError::RateUnavailable(String::new()).status_code(), 502);
        assert_eq!(AppError::DuplicateAccount(String::new()).status_code(), 409);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::InsufficientFunds(String::new()).error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            AppError::RateUnavailable(String::new()).error_code(),
            "RATE_UNAVAILABLE"
        );
        assert_eq!(
            AppError::DuplicateAccount(String::new()).error_code(),
            "DUPLICATE_ACCOUNT"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::InsufficientFunds("balance 10 < 12".into()).to_string(),
            "Insufficient funds: balance 10 < 12"
        );
        assert_eq!(
            AppError::RateUnavailable("BTC".into()).to_string(),
            "Rate unavailable: BTC"
        );
        assert_eq!(
            AppError::DuplicateAccount("user@example.com".into()).to_string(),
            "Duplicate account: user@example.com"
        );
    }
}
