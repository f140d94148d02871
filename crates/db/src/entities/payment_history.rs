//! `SeaORM` Entity for payment_history table.
//!
//! `(beneficiary_id, term_number, period_key)` is unique: a term is paid at
//! most once per billing period.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    pub beneficiary_id: Uuid,
    pub term_number: i32,
    pub period_key: String,
    pub amount: Decimal,
    pub date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
