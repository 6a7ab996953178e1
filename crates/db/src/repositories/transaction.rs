//! Transaction log repository.
//!
//! The log is append-only: records are inserted inside the committing
//! ledger transaction and no update path is exposed.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use valex_shared::Currency;

use crate::entities::{
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions,
};

/// Input for appending a transaction record.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Wallet this event is recorded against (the debited wallet for trades).
    pub wallet_id: Uuid,
    /// Event kind.
    pub tx_type: TransactionType,
    /// Event amount, in `currency`.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: Currency,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Optional fee charged alongside `amount`.
    pub fee: Option<Decimal>,
    /// Source wallet address, when applicable.
    pub from_address: Option<String>,
    /// Destination wallet address, when applicable.
    pub to_address: Option<String>,
}

/// Transaction log repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one transaction record.
    ///
    /// Runs on any connection so the commit site can include it in the same
    /// database transaction as the balance deltas it records.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert(
        conn: &impl ConnectionTrait,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, DbErr> {
        let record = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            wallet_id: Set(input.wallet_id),
            tx_type: Set(input.tx_type),
            amount: Set(input.amount),
            currency: Set(input.currency.code().to_string()),
            status: Set(input.status),
            fee: Set(input.fee),
            from_address: Set(input.from_address),
            to_address: Set(input.to_address),
            created_at: Set(chrono::Utc::now().into()),
        };

        record.insert(conn).await
    }

    /// Lists a user's most recent transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_recent(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }
}
