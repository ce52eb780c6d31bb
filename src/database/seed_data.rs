use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use sea_orm::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::entities::categories;
use crate::services::customer_service::CustomerInput;
use crate::services::dish_service::DishInput;
use crate::services::restaurant_service::RestaurantInput;
use crate::services::review_service::{DishRatingInput, ReviewInput};
use crate::services::{
    CategoryService, CustomerService, DishService, RestaurantService, ReviewService,
};

/// Directory fixture. Cross references use names (emails for customers)
/// so the file stays readable; ids are resolved while loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub restaurants: Vec<SeedRestaurant>,
    #[serde(default)]
    pub dishes: Vec<SeedDish>,
    #[serde(default)]
    pub customers: Vec<SeedCustomer>,
    #[serde(default)]
    pub reviews: Vec<SeedReview>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRestaurant {
    pub name: String,
    pub address: String,
    pub website: String,
    pub description: String,
    pub price: i32,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDish {
    pub name: String,
    pub price: f64,
    pub description: String,
    #[serde(default)]
    pub is_main: bool,
    pub restaurant: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCustomer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub likes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedReview {
    pub customer: String,
    pub restaurant: String,
    pub text: String,
    pub score: i32,
    #[serde(default)]
    pub dishes: Vec<SeedDishRating>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDishRating {
    pub dish: String,
    pub score: i32,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub restaurants: usize,
    pub dishes: usize,
    pub customers: usize,
    pub reviews: usize,
}

impl SeedData {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse seed data")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }
}

pub async fn load_seed_file(db: &DatabaseConnection, path: &Path) -> Result<SeedSummary> {
    let data = SeedData::from_file(path)?;
    seed_directory(db, &data).await
}

/// Load a fixture through the CRUD services. Skipped when the directory already has categories.
pub async fn seed_directory(db: &DatabaseConnection, data: &SeedData) -> Result<SeedSummary> {
    let existing = categories::Entity::find().count(db).await?;
    if existing > 0 {
        info!("Directory already contains data, skipping seed data creation");
        return Ok(SeedSummary::default());
    }

    let mut summary = SeedSummary::default();

    info!("Creating {} categories...", data.categories.len());
    let category_service = CategoryService::new(db.clone());
    let mut category_ids = HashMap::new();
    for name in &data.categories {
        let category = category_service.create(name).await?;
        category_ids.insert(category.name.clone(), category.id);
        summary.categories += 1;
    }

    info!("Creating {} restaurants...", data.restaurants.len());
    let restaurant_service = RestaurantService::new(db.clone());
    let mut restaurant_ids = HashMap::new();
    for seed in &data.restaurants {
        let categories = seed
            .categories
            .iter()
            .map(|name| lookup(&category_ids, "category", name))
            .collect::<Result<Vec<_>>>()?;

        let restaurant = restaurant_service
            .create(RestaurantInput {
                name: seed.name.clone(),
                address: seed.address.clone(),
                website: seed.website.clone(),
                description: seed.description.clone(),
                price: seed.price,
                categories,
            })
            .await
            .with_context(|| format!("Failed to seed restaurant {}", seed.name))?;
        restaurant_ids.insert(restaurant.name.clone(), restaurant.id);
        summary.restaurants += 1;
    }

    info!("Creating {} dishes...", data.dishes.len());
    let dish_service = DishService::new(db.clone());
    let mut dish_ids = HashMap::new();
    for seed in &data.dishes {
        let restaurant_id = lookup(&restaurant_ids, "restaurant", &seed.restaurant)?;
        let dish = dish_service
            .create(DishInput {
                name: seed.name.clone(),
                price: seed.price,
                description: seed.description.clone(),
                is_main: seed.is_main,
                restaurant_id,
                category_id: lookup(&category_ids, "category", &seed.category)?,
            })
            .await
            .with_context(|| format!("Failed to seed dish {}", seed.name))?;
        dish_ids.insert((restaurant_id, dish.name.clone()), dish.id);
        summary.dishes += 1;
    }

    info!("Creating {} customers...", data.customers.len());
    let customer_service = CustomerService::new(db.clone());
    let mut customer_ids = HashMap::new();
    for seed in &data.customers {
        let liked_restaurants = seed
            .likes
            .iter()
            .map(|name| lookup(&restaurant_ids, "restaurant", name))
            .collect::<Result<Vec<_>>>()?;

        let customer = customer_service
            .create(CustomerInput {
                name: seed.name.clone(),
                email: seed.email.clone(),
                liked_restaurants,
            })
            .await
            .with_context(|| format!("Failed to seed customer {}", seed.email))?;
        customer_ids.insert(customer.email.clone(), customer.id);
        summary.customers += 1;
    }

    info!("Creating {} reviews...", data.reviews.len());
    let review_service = ReviewService::new(db.clone());
    for seed in &data.reviews {
        let restaurant_id = lookup(&restaurant_ids, "restaurant", &seed.restaurant)?;
        let dishes = seed
            .dishes
            .iter()
            .map(|rating| {
                dish_ids
                    .get(&(restaurant_id, rating.dish.clone()))
                    .map(|id| DishRatingInput {
                        id: *id,
                        score: rating.score,
                        comment: rating.comment.clone(),
                    })
                    .ok_or_else(|| {
                        anyhow!(
                            "Unknown dish '{}' at restaurant '{}'",
                            rating.dish,
                            seed.restaurant
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        review_service
            .create(ReviewInput {
                text: seed.text.clone(),
                score: seed.score,
                restaurant_id,
                customer_id: lookup(&customer_ids, "customer", &seed.customer)?,
                dishes,
            })
            .await
            .with_context(|| {
                format!(
                    "Failed to seed review of {} by {}",
                    seed.restaurant, seed.customer
                )
            })?;
        summary.reviews += 1;
    }

    info!("Successfully seeded directory: {:?}", summary);
    Ok(summary)
}

fn lookup(ids: &HashMap<String, i32>, entity: &str, name: &str) -> Result<i32> {
    ids.get(name)
        .copied()
        .ok_or_else(|| anyhow!("Unknown {} '{}' in seed data", entity, name))
}
