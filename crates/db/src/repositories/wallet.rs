//! Wallet repository: per-user, per-currency balance records.
//!
//! Two properties carry the whole ledger and are enforced here, not in
//! callers:
//!
//! - `get_or_create` is race-free: concurrent calls for the same
//!   `(user_id, currency)` converge on one row via the unique index and an
//!   insert-ignore.
//! - `adjust_balance` is a single conditional UPDATE, so two concurrent
//!   debits can never drive a balance below zero.

use rand::Rng;
use rand::distr::Alphanumeric;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, ExprTrait, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use valex_shared::Currency;

use crate::entities::wallets;

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Wallet not found.
    #[error("Wallet not found: {0}")]
    NotFound(Uuid),

    /// The conditional balance update matched no row.
    #[error("Insufficient funds in wallet {0}")]
    InsufficientFunds(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Wallet repository for balance records.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all wallets of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<wallets::Model>, WalletError> {
        let rows = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .order_by_asc(wallets::Column::Currency)
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Finds a user's wallet for one currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        user_id: Uuid,
        currency: Currency,
    ) -> Result<Option<wallets::Model>, WalletError> {
        let row = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(wallets::Column::Currency.eq(currency.code()))
            .one(&self.db)
            .await?;

        Ok(row)
    }

    /// Returns the user's wallet for `currency`, creating it with a zero
    /// balance and a fresh opaque address if it does not exist.
    ///
    /// Creation is insert-ignore against the `(user_id, currency)` unique
    /// index: under a race, one inserter wins and everyone re-reads the
    /// same row. Runs on any connection, including an open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_or_create(
        conn: &impl ConnectionTrait,
        user_id: Uuid,
        currency: Currency,
    ) -> Result<wallets::Model, WalletError> {
        let now = chrono::Utc::now().into();
        let fresh = wallets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            currency: Set(currency.code().to_string()),
            balance: Set(Decimal::ZERO),
            address: Set(generate_address(currency)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        wallets::Entity::insert(fresh)
            .on_conflict(
                OnConflict::columns([wallets::Column::UserId, wallets::Column::Currency])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(wallets::Column::Currency.eq(currency.code()))
            .one(conn)
            .await?
            .ok_or(WalletError::NotFound(user_id))
    }

    /// Applies `delta` to a wallet balance, but only if the resulting
    /// balance stays at or above `min_after`.
    ///
    /// This is one conditional UPDATE
    /// (`SET balance = balance + delta WHERE balance + delta >= min_after`),
    /// so concurrent adjustments on the same wallet serialize on the row and
    /// an overdraw loses the race instead of going negative.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::InsufficientFunds` when the condition rejects
    /// the update, or a database error.
    pub async fn adjust_balance(
        conn: &impl ConnectionTrait,
        wallet_id: Uuid,
        delta: Decimal,
        min_after: Decimal,
    ) -> Result<(), WalletError> {
        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).add(delta),
            )
            .filter(wallets::Column::Id.eq(wallet_id))
            .filter(Expr::col(wallets::Column::Balance).add(delta).gte(min_after))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(WalletError::InsufficientFunds(wallet_id));
        }

        Ok(())
    }
}

/// Generates an opaque deposit address for a new wallet.
fn generate_address(currency: Currency) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(13)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();

    format!("{}-{suffix}", currency.code().to_lowercase())
}

// ============================================================================
// Pure balance-adjustment logic for property testing
// ============================================================================

/// Simulates the conditional balance adjustment (pure function for testing).
///
/// Returns the new balance when the adjustment is allowed, `None` when it
/// would land below `min_after`.
#[must_use]
pub fn simulate_adjust(balance: Decimal, delta: Decimal, min_after: Decimal) -> Option<Decimal> {
    let new_balance = balance + delta;
    (new_balance >= min_after).then_some(new_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_generated_address_shape() {
        let address = generate_address(Currency::Usdt);
        assert!(address.starts_with("usdt-"));
        assert_eq!(address.len(), "usdt-".len() + 13);
    }

    #[test]
    fn test_generated_addresses_differ() {
        assert_ne!(
            generate_address(Currency::Btc),
            generate_address(Currency::Btc)
        );
    }

    #[test]
    fn test_simulate_adjust_rejects_overdraw() {
        // Balance 100, debit 100.5: rejected, balance untouched
        assert_eq!(
            simulate_adjust(dec!(100), dec!(-100.5), Decimal::ZERO),
            None
        );
        // Debit 50.25 passes and leaves 49.75
        assert_eq!(
            simulate_adjust(dec!(100), dec!(-50.25), Decimal::ZERO),
            Some(dec!(49.75))
        );
    }

    proptest! {
        /// An accepted adjustment never lands below the floor, and a
        /// rejected one is exactly one that would have.
        #[test]
        fn prop_adjust_never_breaks_floor(
            balance_minor in 0i64..1_000_000_000i64,
            delta_minor in -1_000_000_000i64..1_000_000_000i64,
        ) {
            let balance = Decimal::new(balance_minor, 6);
            let delta = Decimal::new(delta_minor, 6);

            match simulate_adjust(balance, delta, Decimal::ZERO) {
                Some(new_balance) => {
                    prop_assert!(new_balance >= Decimal::ZERO);
                    prop_assert_eq!(new_balance, balance + delta);
                }
                None => prop_assert!(balance + delta < Decimal::ZERO),
            }
        }
    }
}
