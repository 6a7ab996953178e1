//! Exchange commit: the atomic heart of the ledger.
//!
//! The rate is resolved and the quote fully computed before `commit` is
//! called; nothing inside the database transaction performs external I/O.
//! Either every effect of an exchange lands (debit, credit, log record) or
//! none does.

use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use valex_core::exchange::ExchangeQuote;
use valex_shared::Currency;

use crate::entities::{
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions,
};
use crate::repositories::transaction::{CreateTransactionInput, TransactionRepository};
use crate::repositories::wallet::{WalletError, WalletRepository};

/// Error types for the exchange commit.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// Source balance cannot cover amount plus fee.
    #[error("insufficient funds: {debit_total} {currency} required")]
    InsufficientFunds {
        /// Total the source wallet would have been debited.
        debit_total: Decimal,
        /// Source currency.
        currency: Currency,
    },

    /// Wallet-level failure other than insufficient funds.
    #[error("Wallet error: {0}")]
    Wallet(WalletError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Commits exchange quotes against the ledger.
#[derive(Debug, Clone)]
pub struct ExchangeRepository {
    db: DatabaseConnection,
}

impl ExchangeRepository {
    /// Creates a new exchange repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Atomically applies a computed quote for `user_id`.
    ///
    /// Inside one database transaction: loads or creates both wallets,
    /// conditionally debits `amount + fee` from the source, credits the
    /// converted amount to the destination, and appends one COMPLETED
    /// TRADE record. A failed funds check rolls everything back and leaves
    /// no transaction record.
    ///
    /// # Errors
    ///
    /// Returns `ExchangeError::InsufficientFunds` when the source balance
    /// cannot cover the debit, or a wallet/database error.
    pub async fn commit(
        &self,
        user_id: Uuid,
        quote: &ExchangeQuote,
    ) -> Result<transactions::Model, ExchangeError> {
        let txn = self.db.begin().await?;

        let source = WalletRepository::get_or_create(&txn, user_id, quote.from)
            .await
            .map_err(ExchangeError::Wallet)?;
        let dest = WalletRepository::get_or_create(&txn, user_id, quote.to)
            .await
            .map_err(ExchangeError::Wallet)?;

        // Dropping `txn` on any early return rolls the whole commit back.
        match WalletRepository::adjust_balance(&txn, source.id, -quote.debit_total, Decimal::ZERO)
            .await
        {
            Ok(()) => {}
            Err(WalletError::InsufficientFunds(_)) => {
                return Err(ExchangeError::InsufficientFunds {
                    debit_total: quote.debit_total,
                    currency: quote.from,
                });
            }
            Err(e) => return Err(ExchangeError::Wallet(e)),
        }

        WalletRepository::adjust_balance(&txn, dest.id, quote.converted, Decimal::ZERO)
            .await
            .map_err(ExchangeError::Wallet)?;

        let record = TransactionRepository::insert(
            &txn,
            CreateTransactionInput {
                user_id,
                wallet_id: source.id,
                tx_type: TransactionType::Trade,
                amount: quote.amount,
                currency: quote.from,
                status: TransactionStatus::Completed,
                fee: Some(quote.fee),
                from_address: Some(source.address),
                to_address: Some(dest.address),
            },
        )
        .await?;

        txn.commit().await?;

        info!(
            %user_id,
            from = %quote.from,
            to = %quote.to,
            amount = %quote.amount,
            converted = %quote.converted,
            "exchange committed"
        );

        Ok(record)
    }
}
