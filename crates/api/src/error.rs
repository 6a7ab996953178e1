//! Error-to-response mapping for API handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use valex_core::auth::PasswordError;
use valex_core::exchange::QuoteError;
use valex_db::repositories::account::AccountError;
use valex_db::repositories::exchange::ExchangeError;
use valex_db::repositories::wallet::WalletError;
use valex_rates::RateError;
use valex_shared::AppError;

/// Wrapper turning `AppError` (and everything convertible into it) into an
/// HTTP response with a stable `{error, message}` JSON body.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal details go to the log, not the client.
        let message = if status.is_server_error() {
            error!(error = %self.0, "request failed");
            "An internal error occurred".to_string()
        } else {
            self.0.to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self(AppError::Database(e.to_string()))
    }
}

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::InsufficientFunds(_) => Self(AppError::InsufficientFunds(e.to_string())),
            WalletError::NotFound(_) => Self(AppError::NotFound(e.to_string())),
            WalletError::Database(_) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<ExchangeError> for ApiError {
    fn from(e: ExchangeError) -> Self {
        match e {
            ExchangeError::InsufficientFunds { .. } => {
                Self(AppError::InsufficientFunds(e.to_string()))
            }
            ExchangeError::Wallet(inner) => inner.into(),
            ExchangeError::Database(_) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::DuplicateAccount(_) => Self(AppError::DuplicateAccount(e.to_string())),
            AccountError::Wallet(inner) => inner.into(),
            AccountError::Database(_) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<RateError> for ApiError {
    fn from(e: RateError) -> Self {
        Self(AppError::RateUnavailable(e.to_string()))
    }
}

impl From<QuoteError> for ApiError {
    fn from(e: QuoteError) -> Self {
        Self(AppError::Validation(e.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        Self(AppError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_maps_to_422() {
        let api: ApiError = WalletError::InsufficientFunds(uuid::Uuid::new_v4()).into();
        assert_eq!(api.0.status_code(), 422);
        assert_eq!(api.0.error_code(), "INSUFFICIENT_FUNDS");
    }

    #[test]
    fn test_duplicate_account_maps_to_409() {
        let api: ApiError = AccountError::DuplicateAccount("x@y.z".into()).into();
        assert_eq!(api.0.status_code(), 409);
        assert_eq!(api.0.error_code(), "DUPLICATE_ACCOUNT");
    }

    #[test]
    fn test_rate_error_maps_to_502() {
        let api: ApiError = RateError::Unavailable(valex_shared::Currency::Btc).into();
        assert_eq!(api.0.status_code(), 502);
        assert_eq!(api.0.error_code(), "RATE_UNAVAILABLE");
    }

    #[test]
    fn test_quote_error_maps_to_validation() {
        let api: ApiError = QuoteError::SameCurrency.into();
        assert_eq!(api.0.status_code(), 400);
        assert_eq!(api.0.error_code(), "VALIDATION_ERROR");
    }
}
