//! `SeaORM` Entity for amount_terms table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "amount_terms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    pub beneficiary_id: Uuid,
    pub term_number: i32,
    pub reason: String,
    pub amount_change: Decimal,
    pub date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
