//! Currency listing routes.

use axum::{Json, Router, response::IntoResponse, routing::get};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

use crate::{AppState, middleware::AuthUser};
use valex_shared::Currency;

/// Creates the currency routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/currencies", get(list_currencies))
}

/// Response for a currency.
#[derive(Debug, Serialize)]
pub struct CurrencyResponse {
    /// Ticker code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Number of decimal places.
    pub decimals: u32,
    /// Minimum accepted deposit.
    pub min_deposit: Decimal,
    /// Settlement network label.
    pub network: &'static str,
    /// Whether the currency is USD-pegged.
    pub is_stable: bool,
}

/// GET `/currencies` - List the supported currency registry.
async fn list_currencies(_auth: AuthUser) -> impl IntoResponse {
    let response: Vec<CurrencyResponse> = Currency::ALL
        .into_iter()
        .map(|c| CurrencyResponse {
            code: c.code(),
            name: c.display_name(),
            decimals: c.decimals(),
            min_deposit: c.min_deposit(),
            network: c.network(),
            is_stable: c.is_stable(),
        })
        .collect();

    Json(json!({ "currencies": response }))
}
