//! Transaction history routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiError, AppState, middleware::AuthUser};
use valex_db::entities::{
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions,
};
use valex_db::repositories::transaction::TransactionRepository;

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/transactions", get(list_transactions))
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of records (default 10, max 100).
    pub limit: Option<u64>,
}

/// Response for a single transaction record.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Record ID.
    pub id: Uuid,
    /// Event kind.
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    /// Event amount.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: String,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Fee charged, if any.
    pub fee: Option<Decimal>,
    /// Source wallet address, if any.
    pub from_address: Option<String>,
    /// Destination wallet address, if any.
    pub to_address: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(t: transactions::Model) -> Self {
        Self {
            id: t.id,
            tx_type: t.tx_type,
            amount: t.amount,
            currency: t.currency,
            status: t.status,
            fee: t.fee,
            from_address: t.from_address,
            to_address: t.to_address,
            created_at: t.created_at,
        }
    }
}

/// GET `/transactions` - List the user's most recent transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let repo = TransactionRepository::new((*state.db).clone());
    let records = repo.list_recent(auth.user_id(), limit).await?;

    let response: Vec<TransactionResponse> =
        records.into_iter().map(TransactionResponse::from).collect();
    Ok(Json(response))
}
