//! Currency exchange route.

use std::str::FromStr;

use axum::{
    Json, Router, extract::State, response::IntoResponse, routing::post,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::routes::transactions::TransactionResponse;
use crate::{ApiError, AppState, middleware::AuthUser};
use valex_core::exchange::ExchangeQuote;
use valex_db::repositories::exchange::ExchangeRepository;
use valex_shared::{AppError, Currency};

/// Creates the exchange routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/exchange", post(exchange))
}

/// Request body for an exchange.
#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    /// Currency to sell.
    pub from_currency: String,
    /// Currency to buy.
    pub to_currency: String,
    /// Amount to sell, in `from_currency`.
    pub amount: Decimal,
}

/// POST `/exchange` - Convert between two of the user's wallets.
///
/// The rate is resolved and the quote fixed before the atomic commit; a
/// provider failure or insufficient balance leaves both wallets untouched
/// and writes no transaction record.
async fn exchange(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ExchangeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let from = Currency::from_str(&payload.from_currency).map_err(AppError::Validation)?;
    let to = Currency::from_str(&payload.to_currency).map_err(AppError::Validation)?;

    // External I/O happens here, outside any ledger lock.
    let rate = state.rates.resolve(from, to).await?;

    let quote = ExchangeQuote::compute(from, to, payload.amount, rate, state.exchange.fee_rate)?;

    let repo = ExchangeRepository::new((*state.db).clone());
    let record = repo.commit(auth.user_id(), &quote).await?;

    info!(
        user_id = %auth.user_id(),
        from = %from,
        to = %to,
        amount = %quote.amount,
        "exchange request completed"
    );

    Ok(Json(json!({
        "success": true,
        "transaction": TransactionResponse::from(record),
    })))
}
