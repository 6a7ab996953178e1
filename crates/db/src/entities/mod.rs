//! `SeaORM` entity definitions.

pub mod promo_codes;
pub mod promo_usages;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;
pub mod wallets;
