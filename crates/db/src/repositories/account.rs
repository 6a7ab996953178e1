//! Account provisioning: user creation, default wallets, promo bonus.
//!
//! The whole provisioning runs in one database transaction. Promo
//! redemption additionally runs inside a savepoint so an inapplicable code
//! (unknown, expired, exhausted, already used) unwinds its own writes while
//! wallet creation still commits. A bad code is never a registration error.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use valex_shared::Currency;

use crate::entities::{
    promo_codes, promo_usages,
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    users, wallets,
};
use crate::repositories::transaction::{CreateTransactionInput, TransactionRepository};
use crate::repositories::wallet::{WalletError, WalletRepository};

/// Error types for account provisioning.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// An account already exists for this email.
    #[error("Account already exists for {0}")]
    DuplicateAccount(String),

    /// Wallet error.
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for provisioning a new account.
#[derive(Debug, Clone)]
pub struct ProvisionInput {
    /// User display name.
    pub name: String,
    /// Unique email.
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional promo code to redeem.
    pub promo_code: Option<String>,
    /// Wallets opened for the new account.
    pub default_currencies: Vec<Currency>,
}

/// Result of provisioning an account.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    /// The created user.
    pub user: users::Model,
    /// Wallets opened (or found) for the account.
    pub wallets: Vec<wallets::Model>,
    /// Whether a promo bonus was credited.
    pub promo_applied: bool,
}

/// Account provisioning repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Provisions a new account: user row, default wallets, optional promo
    /// bonus, all in one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::DuplicateAccount` if the email is taken
    /// (detected via the unique constraint, so concurrent registrations
    /// cannot slip through), or a wallet/database error.
    pub async fn provision(&self, input: ProvisionInput) -> Result<ProvisionOutcome, AccountError> {
        let txn = self.db.begin().await?;

        let now = Utc::now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email.clone()),
            password_hash: Set(input.password_hash),
            full_name: Set(input.name),
            phone: Set(input.phone),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let user = match user.insert(&txn).await {
            Ok(user) => user,
            Err(e) => {
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    return Err(AccountError::DuplicateAccount(input.email));
                }
                return Err(e.into());
            }
        };

        let mut created = Vec::with_capacity(input.default_currencies.len());
        for currency in &input.default_currencies {
            created.push(WalletRepository::get_or_create(&txn, user.id, *currency).await?);
        }

        let promo_applied = match input.promo_code.as_deref() {
            Some(code) => Self::apply_promo(&txn, &user, code).await?,
            None => false,
        };

        txn.commit().await?;

        info!(
            user_id = %user.id,
            wallets = created.len(),
            promo_applied,
            "account provisioned"
        );

        Ok(ProvisionOutcome {
            user,
            wallets: created,
            promo_applied,
        })
    }

    /// Attempts to redeem `code` for `user` inside a savepoint.
    ///
    /// Returns `Ok(false)` for any inapplicable code; only storage failures
    /// bubble up as errors.
    async fn apply_promo(
        txn: &DatabaseTransaction,
        user: &users::Model,
        code: &str,
    ) -> Result<bool, AccountError> {
        let Some(promo) = promo_codes::Entity::find()
            .filter(promo_codes::Column::Code.eq(code))
            .one(txn)
            .await?
        else {
            info!(user_id = %user.id, code, "unknown promo code, skipping bonus");
            return Ok(false);
        };

        let Ok(bonus_currency) = promo.bonus_currency.parse::<Currency>() else {
            warn!(
                promo_id = %promo.id,
                currency = %promo.bonus_currency,
                "promo code references unsupported currency, skipping bonus"
            );
            return Ok(false);
        };

        let savepoint = txn.begin().await?;

        // Expiry and the usage limit are folded into one conditional
        // increment, so concurrent redemptions serialize on the row and
        // cannot overshoot `usage_limit`.
        let claimed = promo_codes::Entity::update_many()
            .col_expr(
                promo_codes::Column::UsageCount,
                Expr::col(promo_codes::Column::UsageCount).add(1),
            )
            .filter(promo_codes::Column::Id.eq(promo.id))
            .filter(
                Expr::col(promo_codes::Column::UsageCount)
                    .lt(Expr::col(promo_codes::Column::UsageLimit)),
            )
            .filter(promo_codes::Column::ValidUntil.gte(Utc::now()))
            .exec(&savepoint)
            .await?;

        if claimed.rows_affected == 0 {
            info!(user_id = %user.id, code, "promo code expired or exhausted, skipping bonus");
            savepoint.rollback().await?;
            return Ok(false);
        }

        // Single-use per account: the unique index on
        // (user_id, promo_code_id) turns a repeat redemption into a no-op
        // insert, which unwinds the increment above via the savepoint.
        let usage = promo_usages::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            promo_code_id: Set(promo.id),
            amount_applied: Set(promo.bonus_amount),
            currency: Set(promo.bonus_currency.clone()),
            created_at: Set(Utc::now().into()),
        };
        let inserted = promo_usages::Entity::insert(usage)
            .on_conflict(
                OnConflict::columns([
                    promo_usages::Column::UserId,
                    promo_usages::Column::PromoCodeId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&savepoint)
            .await?;

        if inserted == 0 {
            info!(user_id = %user.id, code, "promo code already used by this account");
            savepoint.rollback().await?;
            return Ok(false);
        }

        let wallet =
            WalletRepository::get_or_create(&savepoint, user.id, bonus_currency).await?;
        WalletRepository::adjust_balance(
            &savepoint,
            wallet.id,
            promo.bonus_amount,
            rust_decimal::Decimal::ZERO,
        )
        .await?;

        TransactionRepository::insert(
            &savepoint,
            CreateTransactionInput {
                user_id: user.id,
                wallet_id: wallet.id,
                tx_type: TransactionType::Bonus,
                amount: promo.bonus_amount,
                currency: bonus_currency,
                status: TransactionStatus::Completed,
                fee: None,
                from_address: None,
                to_address: Some(wallet.address),
            },
        )
        .await?;

        savepoint.commit().await?;

        info!(
            user_id = %user.id,
            code,
            amount = %promo.bonus_amount,
            currency = %bonus_currency,
            "promo bonus credited"
        );

        Ok(true)
    }
}

// ============================================================================
// Pure promo validation for unit testing
// ============================================================================

/// Whether a promo code is still redeemable at `now` (pure function for
/// testing; the repository enforces the same rule inside the conditional
/// increment).
#[must_use]
pub fn promo_redeemable(
    now: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    usage_count: i32,
    usage_limit: i32,
) -> bool {
    valid_until >= now && usage_count < usage_limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_redeemable_within_validity_and_limit() {
        assert!(promo_redeemable(at(2026, 6, 1), at(2026, 12, 31), 0, 100));
        assert!(promo_redeemable(at(2026, 6, 1), at(2026, 12, 31), 99, 100));
    }

    #[test]
    fn test_expired_code_not_redeemable() {
        assert!(!promo_redeemable(at(2027, 1, 1), at(2026, 12, 31), 0, 100));
    }

    #[test]
    fn test_exhausted_code_not_redeemable() {
        assert!(!promo_redeemable(at(2026, 6, 1), at(2026, 12, 31), 100, 100));
    }
}
