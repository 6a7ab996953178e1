//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of balance-affecting event a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Internal ledger exchange between two of a user's wallets.
    #[sea_orm(string_value = "TRADE")]
    Trade,
    /// Promotional bonus credit.
    #[sea_orm(string_value = "BONUS")]
    Bonus,
    /// External deposit credit.
    #[sea_orm(string_value = "DEPOSIT")]
    Deposit,
}

/// Settlement status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// Awaiting settlement (external deposits only).
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Settled. In-ledger trades and bonuses commit in this state.
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    /// Terminally failed.
    #[sea_orm(string_value = "FAILED")]
    Failed,
}
