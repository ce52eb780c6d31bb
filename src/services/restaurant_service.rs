use sea_orm::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[cfg(feature = "server")]
use utoipa::ToSchema;

use crate::common::grouping::group_rows;
use crate::database::entities::{categories, restaurant_categories, restaurants};
use crate::errors::{DirectoryError, DirectoryResult};
use crate::services::validation::ValidationService;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct RestaurantInput {
    pub name: String,
    pub address: String,
    pub website: String,
    pub description: String,
    /// Price level, 1 (cheap) to 5 (expensive)
    pub price: i32,
    /// Category ids; at least one is required
    pub categories: Vec<i32>,
}

impl RestaurantInput {
    fn validate(&self) -> DirectoryResult<RestaurantInput> {
        let categories = ValidationService::validate_id_set("categories", &self.categories)?;
        if categories.is_empty() {
            return Err(DirectoryError::validation(
                "categories",
                "at least one category is required",
            ));
        }

        Ok(RestaurantInput {
            name: ValidationService::validate_text("name", &self.name)?,
            address: ValidationService::validate_text("address", &self.address)?,
            website: ValidationService::validate_url(&self.website)?,
            description: ValidationService::validate_text("description", &self.description)?,
            price: ValidationService::validate_price_level(self.price)?,
            categories,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct RestaurantDetail {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub website: String,
    pub description: String,
    pub price: i32,
    pub categories: Vec<CategoryRef>,
}

#[derive(Debug, FromQueryResult)]
struct RestaurantCategoryRow {
    id: i32,
    name: String,
    address: String,
    website: String,
    description: String,
    price: i32,
    category_id: Option<i32>,
    category_name: Option<String>,
}

/// Service for restaurants and their category links
#[derive(Clone)]
pub struct RestaurantService {
    db: DatabaseConnection,
}

impl RestaurantService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All restaurants ordered by name, each with its categories
    pub async fn list(&self) -> DirectoryResult<Vec<RestaurantDetail>> {
        self.load_details(None).await
    }

    pub async fn get(&self, id: i32) -> DirectoryResult<RestaurantDetail> {
        self.load_details(Some(id))
            .await?
            .into_iter()
            .next()
            .ok_or(DirectoryError::not_found("restaurant", id))
    }

    /// Insert a restaurant and its category links in one transaction
    pub async fn create(&self, input: RestaurantInput) -> DirectoryResult<RestaurantDetail> {
        let input = input.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DirectoryError::from_db("begin restaurant create", e))?;

        ensure_categories_exist(&txn, &input.categories).await?;

        let restaurant = restaurants::ActiveModel {
            name: Set(input.name),
            address: Set(input.address),
            website: Set(input.website),
            description: Set(input.description),
            price: Set(input.price),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| DirectoryError::from_db("create restaurant", e))?;

        link_categories(&txn, restaurant.id, &input.categories).await?;

        txn.commit()
            .await
            .map_err(|e| DirectoryError::from_db("commit restaurant create", e))?;

        info!(
            "Created restaurant {} ({}) with {} categories",
            restaurant.name,
            restaurant.id,
            input.categories.len()
        );

        self.get(restaurant.id).await
    }

    /// Update a restaurant and replace its category links in one transaction
    pub async fn update(&self, id: i32, input: RestaurantInput) -> DirectoryResult<RestaurantDetail> {
        let input = input.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DirectoryError::from_db("begin restaurant update", e))?;

        let restaurant = restaurants::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| DirectoryError::from_db("find restaurant", e))?
            .ok_or(DirectoryError::not_found("restaurant", id))?;

        ensure_categories_exist(&txn, &input.categories).await?;

        let mut restaurant: restaurants::ActiveModel = restaurant.into();
        restaurant.name = Set(input.name);
        restaurant.address = Set(input.address);
        restaurant.website = Set(input.website);
        restaurant.description = Set(input.description);
        restaurant.price = Set(input.price);
        restaurant
            .update(&txn)
            .await
            .map_err(|e| DirectoryError::from_db("update restaurant", e))?;

        restaurant_categories::Entity::delete_many()
            .filter(restaurant_categories::Column::RestaurantId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| DirectoryError::from_db("unlink restaurant categories", e))?;

        link_categories(&txn, id, &input.categories).await?;

        txn.commit()
            .await
            .map_err(|e| DirectoryError::from_db("commit restaurant update", e))?;

        info!("Updated restaurant {}", id);
        self.get(id).await
    }

    /// Delete a restaurant; dishes, reviews and links cascade
    pub async fn delete(&self, id: i32) -> DirectoryResult<()> {
        let result = restaurants::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("delete restaurant", e))?;

        if result.rows_affected == 0 {
            return Err(DirectoryError::not_found("restaurant", id));
        }

        info!("Deleted restaurant {}", id);
        Ok(())
    }

    async fn load_details(&self, id: Option<i32>) -> DirectoryResult<Vec<RestaurantDetail>> {
        let mut query = restaurants::Entity::find()
            .select_only()
            .columns([
                restaurants::Column::Id,
                restaurants::Column::Name,
                restaurants::Column::Address,
                restaurants::Column::Website,
                restaurants::Column::Description,
                restaurants::Column::Price,
            ])
            .column_as(categories::Column::Id, "category_id")
            .column_as(categories::Column::Name, "category_name")
            .join(
                JoinType::LeftJoin,
                restaurants::Relation::RestaurantCategories.def(),
            )
            .join(
                JoinType::LeftJoin,
                restaurant_categories::Relation::Categories.def(),
            );

        if let Some(id) = id {
            query = query.filter(restaurants::Column::Id.eq(id));
        }

        let rows = query
            .order_by_asc(restaurants::Column::Name)
            .order_by_asc(restaurants::Column::Id)
            .order_by_asc(categories::Column::Name)
            .into_model::<RestaurantCategoryRow>()
            .all(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("load restaurants", e))?;

        debug!("Loaded {} restaurant/category rows", rows.len());

        Ok(group_rows(
            rows,
            |row| row.id,
            |row| RestaurantDetail {
                id: row.id,
                name: row.name.clone(),
                address: row.address.clone(),
                website: row.website.clone(),
                description: row.description.clone(),
                price: row.price,
                categories: Vec::new(),
            },
            |row| match (row.category_id, &row.category_name) {
                (Some(id), Some(name)) => Some(CategoryRef {
                    id,
                    name: name.clone(),
                }),
                _ => None,
            },
        )
        .into_iter()
        .map(|(mut detail, categories)| {
            detail.categories = categories;
            detail
        })
        .collect())
    }
}

async fn ensure_categories_exist<C: ConnectionTrait>(conn: &C, ids: &[i32]) -> DirectoryResult<()> {
    let found: Vec<i32> = categories::Entity::find()
        .select_only()
        .column(categories::Column::Id)
        .filter(categories::Column::Id.is_in(ids.to_vec()))
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| DirectoryError::from_db("check categories", e))?;

    match ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(DirectoryError::not_found("category", *missing)),
        None => Ok(()),
    }
}

async fn link_categories<C: ConnectionTrait>(
    conn: &C,
    restaurant_id: i32,
    category_ids: &[i32],
) -> DirectoryResult<()> {
    let links = category_ids
        .iter()
        .map(|category_id| restaurant_categories::ActiveModel {
            restaurant_id: Set(restaurant_id),
            category_id: Set(*category_id),
            ..Default::default()
        })
        .collect::<Vec<_>>();

    restaurant_categories::Entity::insert_many(links)
        .exec(conn)
        .await
        .map_err(|e| DirectoryError::from_db("link restaurant categories", e))?;

    Ok(())
}
