//! `SeaORM` Entity for expense_details table.
//!
//! Month totals are the sum of a month's rows; rows are read back in `seq`
//! order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    pub year: i32,
    pub month: i16,
    pub amount: Decimal,
    #[sea_orm(column_type = "Text")]
    pub details: String,
    pub date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
