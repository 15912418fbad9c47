use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "features")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_features::Entity")]
    ProductFeatures,
}

impl Related<super::product_features::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductFeatures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
