//! Wallet routes: listing, USD valuation, deposit addresses.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::{ApiError, AppState, middleware::AuthUser};
use valex_core::deposit::deposit_address;
use valex_core::exchange::convert_amount;
use valex_db::entities::wallets;
use valex_db::repositories::wallet::WalletRepository;
use valex_shared::{AppError, Currency};

/// Creates the wallet routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets", get(list_wallets))
        .route("/wallets/total-balance", get(total_balance))
        .route("/wallets/address/{currency}", get(get_deposit_address))
}

/// Response for a single wallet.
#[derive(Debug, Serialize)]
pub struct WalletResponse {
    /// Currency code.
    pub currency: String,
    /// Current balance.
    pub balance: Decimal,
    /// Opaque wallet address.
    pub address: String,
}

impl From<wallets::Model> for WalletResponse {
    fn from(w: wallets::Model) -> Self {
        Self {
            currency: w.currency,
            balance: w.balance,
            address: w.address,
        }
    }
}

/// GET `/wallets` - List the authenticated user's wallets.
async fn list_wallets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let repo = WalletRepository::new((*state.db).clone());
    let wallets = repo.list(auth.user_id()).await?;

    let response: Vec<WalletResponse> = wallets.into_iter().map(WalletResponse::from).collect();
    Ok(Json(response))
}

/// One wallet's contribution to the USD valuation.
#[derive(Debug, Serialize)]
pub struct ValuedWallet {
    /// Currency code.
    pub currency: String,
    /// Current balance.
    pub balance: Decimal,
    /// Balance valued in USD, `null` when no rate could be resolved.
    pub usd_value: Option<Decimal>,
    /// Rate used for the valuation, `null` when unavailable.
    pub usd_rate: Option<Decimal>,
}

/// Response for the USD valuation of all wallets.
#[derive(Debug, Serialize)]
pub struct TotalBalanceResponse {
    /// Sum of all resolvable `usd_value`s.
    pub total_balance: Decimal,
    /// Per-wallet breakdown.
    pub wallets: Vec<ValuedWallet>,
}

/// GET `/wallets/total-balance` - Value every wallet in USD.
///
/// A failed rate lookup for one currency never fails the others: that entry
/// reports `usd_value: null` and is left out of the total.
async fn total_balance(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let repo = WalletRepository::new((*state.db).clone());
    let wallets = repo.list(auth.user_id()).await?;

    let valuations = join_all(wallets.into_iter().map(|wallet| {
        let rates = state.rates.clone();
        async move {
            let rate = match Currency::from_str(&wallet.currency) {
                Ok(currency) => rates.resolve(currency, Currency::Usd).await.ok(),
                Err(_) => {
                    warn!(currency = %wallet.currency, "wallet holds unsupported currency");
                    None
                }
            };

            ValuedWallet {
                usd_value: rate
                    .map(|r| convert_amount(wallet.balance, r, Currency::Usd.decimals())),
                usd_rate: rate,
                currency: wallet.currency,
                balance: wallet.balance,
            }
        }
    }))
    .await;

    let total_balance = valuations
        .iter()
        .filter_map(|v| v.usd_value)
        .sum::<Decimal>();

    Ok(Json(TotalBalanceResponse {
        total_balance,
        wallets: valuations,
    }))
}

/// Response for a deposit address lookup.
#[derive(Debug, Serialize)]
pub struct DepositAddressResponse {
    /// Currency code.
    pub currency: String,
    /// Deposit destination address.
    pub address: String,
    /// Settlement network label.
    pub network: String,
}

/// GET `/wallets/address/{currency}` - Deposit address for one currency.
async fn get_deposit_address(
    Path(currency): Path<String>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let currency = Currency::from_str(&currency).map_err(AppError::Validation)?;

    let deposit = deposit_address(currency).ok_or_else(|| {
        AppError::NotFound(format!("No deposit address available for {currency}"))
    })?;

    Ok(Json(DepositAddressResponse {
        currency: currency.code().to_string(),
        address: deposit.address.to_string(),
        network: deposit.network.to_string(),
    }))
}
