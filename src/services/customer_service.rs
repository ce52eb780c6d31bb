use sea_orm::*;
use serde::{Deserialize, Serialize};
use tracing::info;

#[cfg(feature = "server")]
use utoipa::ToSchema;

use crate::database::entities::{customers, liked_restaurants, restaurants};
use crate::errors::{DirectoryError, DirectoryResult};
use crate::services::validation::ValidationService;

/// Password stored for customers created through the directory
pub const DEFAULT_PASSWORD: &str = "1234";

const LIST_CUSTOMERS_SQL: &str = r#"
SELECT c.id, c.name, c.email,
       (SELECT COUNT(*) FROM reviews r WHERE r.customer_id = c.id) AS review_count,
       (SELECT COUNT(*) FROM liked_restaurants lr WHERE lr.customer_id = c.id) AS favorite_count
FROM customers c
ORDER BY c.name ASC, c.id ASC
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    /// Restaurant ids the customer likes
    #[serde(default)]
    pub liked_restaurants: Vec<i32>,
}

impl CustomerInput {
    fn validate(&self) -> DirectoryResult<CustomerInput> {
        Ok(CustomerInput {
            name: ValidationService::validate_text("name", &self.name)?,
            email: ValidationService::validate_email(&self.email)?,
            liked_restaurants: ValidationService::validate_id_set(
                "liked_restaurants",
                &self.liked_restaurants,
            )?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CustomerSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub review_count: i64,
    pub favorite_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct RestaurantRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CustomerDetail {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub liked_restaurants: Vec<RestaurantRef>,
}

#[derive(Clone)]
pub struct CustomerService {
    db: DatabaseConnection,
}

impl CustomerService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Customers ordered by name with review and favorite counts
    pub async fn list(&self) -> DirectoryResult<Vec<CustomerSummary>> {
        let stmt = Statement::from_string(
            self.db.get_database_backend(),
            LIST_CUSTOMERS_SQL.to_string(),
        );

        CustomerSummary::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("list customers", e))
    }

    pub async fn get(&self, id: i32) -> DirectoryResult<CustomerDetail> {
        let customer = customers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("get customer", e))?
            .ok_or(DirectoryError::not_found("customer", id))?;

        let liked = customer
            .find_related(restaurants::Entity)
            .order_by_asc(restaurants::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("load liked restaurants", e))?;

        Ok(CustomerDetail {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            liked_restaurants: liked
                .into_iter()
                .map(|r| RestaurantRef {
                    id: r.id,
                    name: r.name,
                })
                .collect(),
        })
    }

    /// Insert a customer with the default password and their liked restaurants
    pub async fn create(&self, input: CustomerInput) -> DirectoryResult<CustomerDetail> {
        let input = input.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DirectoryError::from_db("begin customer create", e))?;

        ensure_restaurants_exist(&txn, &input.liked_restaurants).await?;

        let customer = customers::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            password: Set(DEFAULT_PASSWORD.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| DirectoryError::from_db("create customer", e))?;

        link_liked_restaurants(&txn, customer.id, &input.liked_restaurants).await?;

        txn.commit()
            .await
            .map_err(|e| DirectoryError::from_db("commit customer create", e))?;

        info!("Created customer {} ({})", customer.email, customer.id);
        self.get(customer.id).await
    }

    /// Update name/email and replace liked restaurants in one transaction
    pub async fn update(&self, id: i32, input: CustomerInput) -> DirectoryResult<CustomerDetail> {
        let input = input.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DirectoryError::from_db("begin customer update", e))?;

        let customer = customers::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| DirectoryError::from_db("find customer", e))?
            .ok_or(DirectoryError::not_found("customer", id))?;

        ensure_restaurants_exist(&txn, &input.liked_restaurants).await?;

        let mut customer: customers::ActiveModel = customer.into();
        customer.name = Set(input.name);
        customer.email = Set(input.email);
        customer
            .update(&txn)
            .await
            .map_err(|e| DirectoryError::from_db("update customer", e))?;

        liked_restaurants::Entity::delete_many()
            .filter(liked_restaurants::Column::CustomerId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| DirectoryError::from_db("unlink liked restaurants", e))?;

        link_liked_restaurants(&txn, id, &input.liked_restaurants).await?;

        txn.commit()
            .await
            .map_err(|e| DirectoryError::from_db("commit customer update", e))?;

        info!("Updated customer {}", id);
        self.get(id).await
    }

    /// Delete a customer; reviews and likes cascade
    pub async fn delete(&self, id: i32) -> DirectoryResult<()> {
        let result = customers::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("delete customer", e))?;

        if result.rows_affected == 0 {
            return Err(DirectoryError::not_found("customer", id));
        }

        info!("Deleted customer {}", id);
        Ok(())
    }
}

async fn ensure_restaurants_exist<C: ConnectionTrait>(conn: &C, ids: &[i32]) -> DirectoryResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let found: Vec<i32> = restaurants::Entity::find()
        .select_only()
        .column(restaurants::Column::Id)
        .filter(restaurants::Column::Id.is_in(ids.to_vec()))
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| DirectoryError::from_db("check restaurants", e))?;

    match ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(DirectoryError::not_found("restaurant", *missing)),
        None => Ok(()),
    }
}

async fn link_liked_restaurants<C: ConnectionTrait>(
    conn: &C,
    customer_id: i32,
    restaurant_ids: &[i32],
) -> DirectoryResult<()> {
    if restaurant_ids.is_empty() {
        return Ok(());
    }

    let likes = restaurant_ids
        .iter()
        .map(|restaurant_id| liked_restaurants::ActiveModel {
            customer_id: Set(customer_id),
            restaurant_id: Set(*restaurant_id),
            ..Default::default()
        })
        .collect::<Vec<_>>();

    liked_restaurants::Entity::insert_many(likes)
        .exec(conn)
        .await
        .map_err(|e| DirectoryError::from_db("link liked restaurants", e))?;

    Ok(())
}
