//! Database seeder for Valex development and testing.
//!
//! Seeds the welcome promo code and a funded demo user for local
//! development.
//!
//! Usage: cargo run --bin seeder

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use valex_db::WalletRepository;
use valex_db::entities::{promo_codes, users};
use valex_shared::Currency;

/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = valex_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding welcome promo code...");
    seed_welcome_promo(&db).await;

    println!("Seeding demo user...");
    seed_demo_user(&db).await;

    println!("Seeding demo wallets...");
    seed_demo_wallets(&db).await;

    println!("Seeding complete!");
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

/// Seeds the WELCOME250 promo code if it is missing.
async fn seed_welcome_promo(db: &DatabaseConnection) {
    let existing = promo_codes::Entity::find()
        .filter(promo_codes::Column::Code.eq("WELCOME250"))
        .one(db)
        .await
        .ok()
        .flatten();

    if existing.is_some() {
        println!("  WELCOME250 already exists, skipping...");
        return;
    }

    let promo = promo_codes::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set("WELCOME250".to_string()),
        bonus_amount: Set(dec!(250)),
        bonus_currency: Set("USDT".to_string()),
        valid_until: Set(Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap().into()),
        usage_limit: Set(999_999),
        usage_count: Set(0),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = promo.insert(db).await {
        eprintln!("Failed to insert promo code: {e}");
    } else {
        println!("  Created promo code: WELCOME250 (250 USDT)");
    }
}

/// Seeds a demo user for development.
async fn seed_demo_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(demo_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo user already exists, skipping...");
        return;
    }

    let user = users::ActiveModel {
        id: Set(demo_user_id()),
        email: Set("demo@valex.dev".to_string()),
        // argon2id hash of "demo-password"
        password_hash: Set(
            "$argon2id$v=19$m=65536,t=3,p=4$ZGVtb3NhbHRkZW1vc2FsdA$3ht6cbiQbVYRBEqvQPr6jJbJtHlRnGGHnJqNyWP5HVE"
                .to_string(),
        ),
        full_name: Set("Demo User".to_string()),
        phone: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert demo user: {e}");
    } else {
        println!("  Created demo user: demo@valex.dev");
    }
}

/// Opens and funds the demo user's wallets.
async fn seed_demo_wallets(db: &DatabaseConnection) {
    let funding = [
        (Currency::Usdt, dec!(1000)),
        (Currency::Btc, dec!(0.05)),
        (Currency::Eth, dec!(1.5)),
    ];

    for (currency, amount) in funding {
        match WalletRepository::get_or_create(db, demo_user_id(), currency).await {
            Ok(wallet) => {
                if wallet.balance > rust_decimal::Decimal::ZERO {
                    println!("  {currency} wallet already funded, skipping...");
                    continue;
                }
                if let Err(e) =
                    WalletRepository::adjust_balance(db, wallet.id, amount, rust_decimal::Decimal::ZERO)
                        .await
                {
                    eprintln!("Failed to fund {currency} wallet: {e}");
                } else {
                    println!("  Funded {currency} wallet with {amount}");
                }
            }
            Err(e) => eprintln!("Failed to create {currency} wallet: {e}"),
        }
    }
}
