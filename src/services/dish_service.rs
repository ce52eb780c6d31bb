use sea_orm::*;
use serde::{Deserialize, Serialize};
use tracing::info;

#[cfg(feature = "server")]
use utoipa::ToSchema;

use crate::database::entities::{categories, dishes, restaurants};
use crate::errors::{DirectoryError, DirectoryResult};
use crate::services::validation::ValidationService;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct DishInput {
    pub name: String,
    pub price: f64,
    pub description: String,
    #[serde(default)]
    pub is_main: bool,
    pub restaurant_id: i32,
    pub category_id: i32,
}

impl DishInput {
    fn validate(&self) -> DirectoryResult<DishInput> {
        Ok(DishInput {
            name: ValidationService::validate_text("name", &self.name)?,
            price: ValidationService::validate_dish_price(self.price)?,
            description: ValidationService::validate_text("description", &self.description)?,
            is_main: self.is_main,
            restaurant_id: ValidationService::validate_id("restaurant_id", self.restaurant_id)?,
            category_id: ValidationService::validate_id("category_id", self.category_id)?,
        })
    }
}

/// A dish together with the names of its restaurant and category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct DishDetail {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub is_main: bool,
    pub restaurant_id: i32,
    pub restaurant_name: String,
    pub category_id: i32,
    pub category_name: String,
}

#[derive(Clone)]
pub struct DishService {
    db: DatabaseConnection,
}

impl DishService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Dishes ordered by restaurant name, then dish name
    pub async fn list(&self) -> DirectoryResult<Vec<DishDetail>> {
        detail_query()
            .order_by_asc(restaurants::Column::Name)
            .order_by_asc(dishes::Column::Name)
            .order_by_asc(dishes::Column::Id)
            .into_model::<DishDetail>()
            .all(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("list dishes", e))
    }

    pub async fn get(&self, id: i32) -> DirectoryResult<DishDetail> {
        detail_query()
            .filter(dishes::Column::Id.eq(id))
            .into_model::<DishDetail>()
            .one(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("get dish", e))?
            .ok_or(DirectoryError::not_found("dish", id))
    }

    pub async fn create(&self, input: DishInput) -> DirectoryResult<DishDetail> {
        let input = input.validate()?;
        self.ensure_parents_exist(&input).await?;

        let dish = dishes::ActiveModel {
            name: Set(input.name),
            price: Set(input.price),
            description: Set(input.description),
            is_main: Set(input.is_main),
            restaurant_id: Set(input.restaurant_id),
            category_id: Set(input.category_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| DirectoryError::from_db("create dish", e))?;

        info!(
            "Created dish {} ({}) for restaurant {}",
            dish.name, dish.id, dish.restaurant_id
        );
        self.get(dish.id).await
    }

    pub async fn update(&self, id: i32, input: DishInput) -> DirectoryResult<DishDetail> {
        let input = input.validate()?;

        let dish = dishes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("find dish", e))?
            .ok_or(DirectoryError::not_found("dish", id))?;

        self.ensure_parents_exist(&input).await?;

        let mut dish: dishes::ActiveModel = dish.into();
        dish.name = Set(input.name);
        dish.price = Set(input.price);
        dish.description = Set(input.description);
        dish.is_main = Set(input.is_main);
        dish.restaurant_id = Set(input.restaurant_id);
        dish.category_id = Set(input.category_id);
        dish.update(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("update dish", e))?;

        info!("Updated dish {}", id);
        self.get(id).await
    }

    /// Delete a dish; its dish reviews cascade
    pub async fn delete(&self, id: i32) -> DirectoryResult<()> {
        let result = dishes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("delete dish", e))?;

        if result.rows_affected == 0 {
            return Err(DirectoryError::not_found("dish", id));
        }

        info!("Deleted dish {}", id);
        Ok(())
    }

    async fn ensure_parents_exist(&self, input: &DishInput) -> DirectoryResult<()> {
        let restaurant = restaurants::Entity::find_by_id(input.restaurant_id)
            .one(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("find restaurant", e))?;
        if restaurant.is_none() {
            return Err(DirectoryError::not_found("restaurant", input.restaurant_id));
        }

        let category = categories::Entity::find_by_id(input.category_id)
            .one(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("find category", e))?;
        if category.is_none() {
            return Err(DirectoryError::not_found("category", input.category_id));
        }

        Ok(())
    }
}

fn detail_query() -> Select<dishes::Entity> {
    dishes::Entity::find()
        .select_only()
        .columns([
            dishes::Column::Id,
            dishes::Column::Name,
            dishes::Column::Price,
            dishes::Column::Description,
            dishes::Column::IsMain,
            dishes::Column::RestaurantId,
            dishes::Column::CategoryId,
        ])
        .column_as(restaurants::Column::Name, "restaurant_name")
        .column_as(categories::Column::Name, "category_name")
        .join(JoinType::InnerJoin, dishes::Relation::Restaurants.def())
        .join(JoinType::InnerJoin, dishes::Relation::Categories.def())
}
