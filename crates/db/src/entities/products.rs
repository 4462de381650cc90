//! `SeaORM` Entity for products table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub sku: String,
    pub group_id: Option<i64>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_groups::Entity",
        from = "Column::GroupId",
        to = "super::product_groups::Column::Id"
    )]
    ProductGroups,
}

impl Related<super::product_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
