use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[cfg(feature = "server")]
use utoipa::ToSchema;

use crate::common::grouping::group_rows;
use crate::database::entities::{customers, dish_reviews, dishes, restaurants, reviews};
use crate::errors::{DirectoryError, DirectoryResult};
use crate::services::customer_service::RestaurantRef;
use crate::services::validation::ValidationService;

const REVIEW_ROWS_SQL: &str = r#"
SELECT r.id, r.text, r.score, r.created_at,
       r.restaurant_id, res.name AS restaurant_name,
       r.customer_id, c.name AS customer_name,
       d.id AS dish_id, d.name AS dish_name,
       dr.score AS dish_score, dr.comment AS dish_comment
FROM reviews r
JOIN restaurants res ON res.id = r.restaurant_id
JOIN customers c ON c.id = r.customer_id
LEFT JOIN dish_reviews dr ON dr.review_id = r.id
LEFT JOIN dishes d ON d.id = dr.dish_id
"#;

const REVIEW_ROWS_ORDER: &str = "ORDER BY r.created_at DESC, res.name ASC, r.id ASC, dr.id ASC";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct DishRatingInput {
    /// Dish id; must belong to the reviewed restaurant
    pub id: i32,
    pub score: i32,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct ReviewInput {
    pub text: String,
    pub score: i32,
    pub restaurant_id: i32,
    pub customer_id: i32,
    #[serde(default)]
    pub dishes: Vec<DishRatingInput>,
}

impl ReviewInput {
    fn validate(&self) -> DirectoryResult<ReviewInput> {
        let mut seen = HashSet::new();
        let mut dishes = Vec::with_capacity(self.dishes.len());

        for dish in &self.dishes {
            let id = ValidationService::validate_id("dishes.id", dish.id)?;
            if !seen.insert(id) {
                return Err(DirectoryError::validation(
                    "dishes",
                    format!("dish {} is rated more than once", id),
                ));
            }
            dishes.push(DishRatingInput {
                id,
                score: ValidationService::validate_rating("dishes.score", dish.score)?,
                comment: ValidationService::validate_comment(&dish.comment)?,
            });
        }

        Ok(ReviewInput {
            text: ValidationService::validate_text("text", &self.text)?,
            score: ValidationService::validate_rating("score", self.score)?,
            restaurant_id: ValidationService::validate_id("restaurant_id", self.restaurant_id)?,
            customer_id: ValidationService::validate_id("customer_id", self.customer_id)?,
            dishes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CustomerRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct DishRating {
    pub dish_id: i32,
    pub name: String,
    pub score: i32,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct ReviewDetail {
    pub id: i32,
    pub text: String,
    pub score: i32,
    pub created_at: DateTime<Utc>,
    pub restaurant: RestaurantRef,
    pub customer: CustomerRef,
    pub dishes: Vec<DishRating>,
}

#[derive(Debug, FromQueryResult)]
struct ReviewRow {
    id: i32,
    text: String,
    score: i32,
    created_at: DateTime<Utc>,
    restaurant_id: i32,
    restaurant_name: String,
    customer_id: i32,
    customer_name: String,
    dish_id: Option<i32>,
    dish_name: Option<String>,
    dish_score: Option<i32>,
    dish_comment: Option<String>,
}

#[derive(Clone)]
pub struct ReviewService {
    db: DatabaseConnection,
}

impl ReviewService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reviews newest first, each with its rated dishes
    pub async fn list(&self) -> DirectoryResult<Vec<ReviewDetail>> {
        let sql = format!("{} {}", REVIEW_ROWS_SQL, REVIEW_ROWS_ORDER);
        let stmt = Statement::from_string(self.db.get_database_backend(), sql);
        self.load(stmt).await
    }

    pub async fn get(&self, id: i32) -> DirectoryResult<ReviewDetail> {
        let sql = format!("{} WHERE r.id = ? {}", REVIEW_ROWS_SQL, REVIEW_ROWS_ORDER);
        let stmt =
            Statement::from_sql_and_values(self.db.get_database_backend(), &sql, [id.into()]);

        self.load(stmt)
            .await?
            .into_iter()
            .next()
            .ok_or(DirectoryError::not_found("review", id))
    }

    /// Insert a review and its dish ratings in one transaction
    pub async fn create(&self, input: ReviewInput) -> DirectoryResult<ReviewDetail> {
        let input = input.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DirectoryError::from_db("begin review create", e))?;

        ensure_parents_exist(&txn, input.restaurant_id, input.customer_id).await?;

        let review = reviews::ActiveModel {
            text: Set(input.text),
            score: Set(input.score),
            created_at: Set(Utc::now()),
            restaurant_id: Set(input.restaurant_id),
            customer_id: Set(input.customer_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| DirectoryError::from_db("create review", e))?;

        attach_dish_ratings(&txn, review.id, input.restaurant_id, &input.dishes).await?;

        txn.commit()
            .await
            .map_err(|e| DirectoryError::from_db("commit review create", e))?;

        info!(
            "Created review {} for restaurant {} with {} dish ratings",
            review.id,
            review.restaurant_id,
            input.dishes.len()
        );
        self.get(review.id).await
    }

    /// Update a review and replace its dish ratings in one transaction
    pub async fn update(&self, id: i32, input: ReviewInput) -> DirectoryResult<ReviewDetail> {
        let input = input.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DirectoryError::from_db("begin review update", e))?;

        let review = reviews::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| DirectoryError::from_db("find review", e))?
            .ok_or(DirectoryError::not_found("review", id))?;

        ensure_parents_exist(&txn, input.restaurant_id, input.customer_id).await?;

        let mut review: reviews::ActiveModel = review.into();
        review.text = Set(input.text);
        review.score = Set(input.score);
        review.restaurant_id = Set(input.restaurant_id);
        review.customer_id = Set(input.customer_id);
        review
            .update(&txn)
            .await
            .map_err(|e| DirectoryError::from_db("update review", e))?;

        dish_reviews::Entity::delete_many()
            .filter(dish_reviews::Column::ReviewId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| DirectoryError::from_db("clear dish ratings", e))?;

        attach_dish_ratings(&txn, id, input.restaurant_id, &input.dishes).await?;

        txn.commit()
            .await
            .map_err(|e| DirectoryError::from_db("commit review update", e))?;

        info!("Updated review {}", id);
        self.get(id).await
    }

    /// Delete a review; its dish ratings cascade
    pub async fn delete(&self, id: i32) -> DirectoryResult<()> {
        let result = reviews::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("delete review", e))?;

        if result.rows_affected == 0 {
            return Err(DirectoryError::not_found("review", id));
        }

        info!("Deleted review {}", id);
        Ok(())
    }

    async fn load(&self, stmt: Statement) -> DirectoryResult<Vec<ReviewDetail>> {
        let rows = ReviewRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("load reviews", e))?;

        debug!("Loaded {} review rows", rows.len());

        Ok(group_rows(
            rows,
            |row| row.id,
            |row| ReviewDetail {
                id: row.id,
                text: row.text.clone(),
                score: row.score,
                created_at: row.created_at,
                restaurant: RestaurantRef {
                    id: row.restaurant_id,
                    name: row.restaurant_name.clone(),
                },
                customer: CustomerRef {
                    id: row.customer_id,
                    name: row.customer_name.clone(),
                },
                dishes: Vec::new(),
            },
            |row| match (row.dish_id, &row.dish_name, row.dish_score, &row.dish_comment) {
                (Some(dish_id), Some(name), Some(score), Some(comment)) => Some(DishRating {
                    dish_id,
                    name: name.clone(),
                    score,
                    comment: comment.clone(),
                }),
                _ => None,
            },
        )
        .into_iter()
        .map(|(mut review, dishes)| {
            review.dishes = dishes;
            review
        })
        .collect())
    }
}

async fn ensure_parents_exist<C: ConnectionTrait>(
    conn: &C,
    restaurant_id: i32,
    customer_id: i32,
) -> DirectoryResult<()> {
    restaurants::Entity::find_by_id(restaurant_id)
        .one(conn)
        .await
        .map_err(|e| DirectoryError::from_db("find restaurant", e))?
        .ok_or(DirectoryError::not_found("restaurant", restaurant_id))?;

    customers::Entity::find_by_id(customer_id)
        .one(conn)
        .await
        .map_err(|e| DirectoryError::from_db("find customer", e))?
        .ok_or(DirectoryError::not_found("customer", customer_id))?;

    Ok(())
}

/// Write dish ratings for a review. Every dish must exist and belong to the restaurant.
async fn attach_dish_ratings<C: ConnectionTrait>(
    conn: &C,
    review_id: i32,
    restaurant_id: i32,
    ratings: &[DishRatingInput],
) -> DirectoryResult<()> {
    if ratings.is_empty() {
        return Ok(());
    }

    let ids = ratings.iter().map(|r| r.id).collect::<Vec<_>>();
    let found = dishes::Entity::find()
        .filter(dishes::Column::Id.is_in(ids))
        .all(conn)
        .await
        .map_err(|e| DirectoryError::from_db("check dishes", e))?;

    for rating in ratings {
        match found.iter().find(|d| d.id == rating.id) {
            None => return Err(DirectoryError::not_found("dish", rating.id)),
            Some(dish) if dish.restaurant_id != restaurant_id => {
                warn!(
                    "Dish {} belongs to restaurant {}, not {}",
                    dish.id, dish.restaurant_id, restaurant_id
                );
                return Err(DirectoryError::validation(
                    "dishes",
                    format!(
                        "dish {} does not belong to restaurant {}",
                        dish.id, restaurant_id
                    ),
                ));
            }
            Some(_) => {}
        }
    }

    let rows = ratings
        .iter()
        .map(|rating| dish_reviews::ActiveModel {
            review_id: Set(review_id),
            dish_id: Set(rating.id),
            score: Set(rating.score),
            comment: Set(rating.comment.clone()),
            ..Default::default()
        })
        .collect::<Vec<_>>();

    dish_reviews::Entity::insert_many(rows)
        .exec(conn)
        .await
        .map_err(|e| DirectoryError::from_db("write dish ratings", e))?;

    Ok(())
}
