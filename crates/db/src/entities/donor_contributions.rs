//! `SeaORM` Entity for donor_contributions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "donor_contributions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    pub donor_id: Uuid,
    pub date: Date,
    pub amount: Decimal,
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::donors::Entity",
        from = "Column::DonorId",
        to = "super::donors::Column::Id"
    )]
    Donors,
}

impl Related<super::donors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
