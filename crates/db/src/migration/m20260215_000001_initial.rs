//! Initial database migration.
//!
//! Creates the ledger schema: enums, users, wallets, transactions,
//! promo codes and usages, triggers, and seed data.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: IDENTITY
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: LEDGER
        // ============================================================
        db.execute_unprepared(WALLETS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: PROMOTIONS
        // ============================================================
        db.execute_unprepared(PROMO_CODES_SQL).await?;
        db.execute_unprepared(PROMO_USAGES_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 6: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_PROMO_CODES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Balance-affecting event kinds
CREATE TYPE transaction_type AS ENUM ('TRADE', 'BONUS', 'DEPOSIT');

-- Settlement status
CREATE TYPE transaction_status AS ENUM ('PENDING', 'COMPLETED', 'FAILED');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    phone VARCHAR(32),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email);
";

const WALLETS_SQL: &str = r"
CREATE TABLE wallets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    currency VARCHAR(8) NOT NULL,
    balance NUMERIC(30, 18) NOT NULL DEFAULT 0,
    address VARCHAR(128) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- One wallet per user and currency; concurrent get-or-create
    -- converges on this index instead of creating duplicates.
    CONSTRAINT uq_wallets_user_currency UNIQUE (user_id, currency),

    -- Every mutator already guards the balance; the CHECK is the
    -- last line of defense against a missed conditional update.
    CONSTRAINT ck_wallets_balance_non_negative CHECK (balance >= 0)
);

CREATE INDEX idx_wallets_user ON wallets(user_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE CASCADE,
    tx_type transaction_type NOT NULL,
    amount NUMERIC(30, 18) NOT NULL,
    currency VARCHAR(8) NOT NULL,
    status transaction_status NOT NULL,
    fee NUMERIC(30, 18),
    from_address VARCHAR(128),
    to_address VARCHAR(128),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT ck_transactions_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_transactions_user_created ON transactions(user_id, created_at DESC);
CREATE INDEX idx_transactions_wallet ON transactions(wallet_id);
";

const PROMO_CODES_SQL: &str = r"
CREATE TABLE promo_codes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(64) NOT NULL UNIQUE,
    bonus_amount NUMERIC(30, 18) NOT NULL,
    bonus_currency VARCHAR(8) NOT NULL,
    valid_until TIMESTAMPTZ NOT NULL,
    usage_limit INTEGER NOT NULL,
    usage_count INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT ck_promo_codes_bonus_positive CHECK (bonus_amount > 0),
    CONSTRAINT ck_promo_codes_usage_within_limit
        CHECK (usage_count >= 0 AND usage_count <= usage_limit)
);
";

const PROMO_USAGES_SQL: &str = r"
CREATE TABLE promo_usages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    promo_code_id UUID NOT NULL REFERENCES promo_codes(id) ON DELETE CASCADE,
    amount_applied NUMERIC(30, 18) NOT NULL,
    currency VARCHAR(8) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- A bonus is single-use per account.
    CONSTRAINT uq_promo_usages_user_code UNIQUE (user_id, promo_code_id)
);
";

const TRIGGERS_SQL: &str = r"
-- Keep updated_at current on row updates
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_wallets_updated_at
    BEFORE UPDATE ON wallets
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const SEED_PROMO_CODES_SQL: &str = r"
INSERT INTO promo_codes (code, bonus_amount, bonus_currency, valid_until, usage_limit)
VALUES ('WELCOME250', 250, 'USDT', '2026-12-31T23:59:59Z', 999999)
ON CONFLICT (code) DO NOTHING;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS promo_usages CASCADE;
DROP TABLE IF EXISTS promo_codes CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS wallets CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS transaction_status CASCADE;
DROP TYPE IF EXISTS transaction_type CASCADE;
";
