//! `SeaORM` Entity for transaction_logs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    #[sea_orm(unique)]
    pub id: Uuid,
    pub amount_before_pkr: Decimal,
    pub amount_before_usd: Decimal,
    pub amount_after_pkr: Decimal,
    pub amount_after_usd: Decimal,
    pub timestamp: DateTimeWithTimeZone,
    pub amount: Decimal,
    pub currency: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub details: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
