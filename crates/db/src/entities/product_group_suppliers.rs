//! `SeaORM` Entity for product_group_suppliers join table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_group_suppliers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: i64,
    pub supplier_id: i64,
    pub is_primary: bool,
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
