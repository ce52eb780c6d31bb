use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: String,
    pub website: String,
    pub description: String,
    pub price: i32, // 1 (cheap) to 5 (expensive)
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dishes::Entity")]
    Dishes,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::restaurant_categories::Entity")]
    RestaurantCategories,
    #[sea_orm(has_many = "super::liked_restaurants::Entity")]
    LikedRestaurants,
}

impl Related<super::dishes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dishes.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::restaurant_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RestaurantCategories.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        super::restaurant_categories::Relation::Categories.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::restaurant_categories::Relation::Restaurants.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
