//! `SeaORM` Entity for the promo_codes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "promo_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub bonus_amount: Decimal,
    pub bonus_currency: String,
    pub valid_until: DateTimeWithTimeZone,
    pub usage_limit: i32,
    pub usage_count: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::promo_usages::Entity")]
    PromoUsages,
}

impl Related<super::promo_usages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PromoUsages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
