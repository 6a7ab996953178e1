//! Authentication routes for registration and login.

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use tracing::info;
use validator::Validate;

use crate::{ApiError, AppState};
use valex_core::auth::{hash_password, verify_password};
use valex_db::repositories::account::{AccountRepository, ProvisionInput};
use valex_db::repositories::user::UserRepository;
use valex_shared::AppError;
use valex_shared::auth::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserInfo,
};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// POST /auth/register - Provision a new account.
///
/// Opens the default wallets and, when a valid promo code is supplied,
/// credits the one-time bonus. An invalid code is not a registration error.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let password_hash = hash_password(&payload.password)?;

    let repo = AccountRepository::new((*state.db).clone());
    let outcome = repo
        .provision(ProvisionInput {
            name: payload.name,
            email: payload.email,
            password_hash,
            phone: payload.phone,
            promo_code: payload.promo_code,
            default_currencies: state.exchange.default_wallet_currencies.clone(),
        })
        .await?;

    info!(user_id = %outcome.user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: outcome.user.id,
            promo_applied: outcome.promo_applied,
        }),
    ))
}

/// POST /auth/login - Authenticate and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invalid_credentials = || AppError::Unauthorized("Invalid email or password".to_string());

    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Unauthorized("This account has been disabled".to_string()).into());
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "failed login attempt");
        return Err(invalid_credentials().into());
    }

    let access_token = state
        .jwt_service
        .generate_access_token(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            name: user.full_name,
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}
