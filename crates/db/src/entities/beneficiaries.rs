//! `SeaORM` Entity for beneficiaries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "beneficiaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub cnic: Option<String>,
    pub name: String,
    pub gender: String,
    pub contact_number: String,
    pub city: String,
    pub area: String,
    pub profession: String,
    pub sons: i32,
    pub daughters: i32,
    pub adopted: i32,
    pub mode_of_payment: String,
    pub bank: String,
    pub account_number: String,
    pub is_alive: bool,
    pub death_date: Option<Date>,
    pub current_term: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::terms::Entity")]
    Terms,
    #[sea_orm(has_many = "super::extra_financial_assistance::Entity")]
    ExtraFinancialAssistance,
}

impl Related<super::terms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Terms.def()
    }
}

impl Related<super::extra_financial_assistance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExtraFinancialAssistance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
