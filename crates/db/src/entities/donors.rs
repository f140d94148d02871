//! `SeaORM` Entity for donors table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "donors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub city: String,
    pub contact_number: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::donor_contributions::Entity")]
    DonorContributions,
}

impl Related<super::donor_contributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonorContributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
