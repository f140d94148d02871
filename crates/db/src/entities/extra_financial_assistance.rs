//! `SeaORM` Entity for extra_financial_assistance table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "extra_financial_assistance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    pub beneficiary_id: Uuid,
    pub reason: String,
    pub amount: Decimal,
    pub date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "JsonBinary")]
    pub proof: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::beneficiaries::Entity",
        from = "Column::BeneficiaryId",
        to = "super::beneficiaries::Column::Id"
    )]
    Beneficiaries,
}

impl Related<super::beneficiaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Beneficiaries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
