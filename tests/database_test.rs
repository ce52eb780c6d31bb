//! Database functionality tests
//!
//! Tests for migrations, entity relations and referential integrity

use anyhow::Result;
use chrono::Utc;
use dishboard::database::entities::*;
use dishboard::database::migrations::Migrator;
use dishboard::database::setup_database;
use dishboard::errors::DirectoryError;
use dishboard::services::customer_service::CustomerInput;
use dishboard::services::restaurant_service::RestaurantInput;
use dishboard::services::{CategoryService, CustomerService, RestaurantService};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use tempfile::NamedTempFile;

/// Create a test database connection with migrations
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

async fn insert_restaurant(db: &DatabaseConnection, name: &str) -> Result<restaurants::Model> {
    Ok(restaurants::ActiveModel {
        name: Set(name.to_string()),
        address: Set("1 Main St".to_string()),
        website: Set("https://example.com".to_string()),
        description: Set("Test".to_string()),
        price: Set(2),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    // Verify all tables exist by attempting to query them
    assert!(restaurants::Entity::find().all(&db).await?.is_empty());
    assert!(categories::Entity::find().all(&db).await?.is_empty());
    assert!(dishes::Entity::find().all(&db).await?.is_empty());
    assert!(customers::Entity::find().all(&db).await?.is_empty());
    assert!(reviews::Entity::find().all(&db).await?.is_empty());
    assert!(dish_reviews::Entity::find().all(&db).await?.is_empty());
    assert!(restaurant_categories::Entity::find().all(&db).await?.is_empty());
    assert!(liked_restaurants::Entity::find().all(&db).await?.is_empty());

    // Running again is a no-op
    setup_database(&db).await?;

    Ok(())
}

#[tokio::test]
async fn test_migrations_roll_back() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    Migrator::down(&db, None).await?;
    assert!(categories::Entity::find().all(&db).await.is_err());

    Migrator::up(&db, None).await?;
    assert!(categories::Entity::find().all(&db).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_restaurant_category_pairs_are_unique() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let restaurant = insert_restaurant(&db, "Luigi").await?;
    let category = categories::ActiveModel {
        name: Set("Pizza".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let link = restaurant_categories::ActiveModel {
        restaurant_id: Set(restaurant.id),
        category_id: Set(category.id),
        ..Default::default()
    };
    link.clone().insert(&db).await?;
    assert!(link.insert(&db).await.is_err());

    // Many-to-many through the join table
    let related = restaurant.find_related(categories::Entity).all(&db).await?;
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].name, "Pizza");

    Ok(())
}

#[tokio::test]
async fn test_review_cascade_removes_dish_reviews() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let restaurant = insert_restaurant(&db, "Luigi").await?;
    let category = CategoryService::new(db.clone()).create("Pizza").await?;
    let dish = dishes::ActiveModel {
        name: Set("Margherita".to_string()),
        price: Set(9.0),
        description: Set("Classic".to_string()),
        is_main: Set(true),
        restaurant_id: Set(restaurant.id),
        category_id: Set(category.id),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let customer = customers::ActiveModel {
        name: Set("Ann".to_string()),
        email: Set("ann@example.com".to_string()),
        password: Set("1234".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let review = reviews::ActiveModel {
        text: Set("Good".to_string()),
        score: Set(4),
        created_at: Set(Utc::now()),
        restaurant_id: Set(restaurant.id),
        customer_id: Set(customer.id),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    dish_reviews::ActiveModel {
        review_id: Set(review.id),
        dish_id: Set(dish.id),
        score: Set(5),
        comment: Set("Crispy".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    reviews::Entity::delete_by_id(review.id).exec(&db).await?;

    let remaining = dish_reviews::Entity::find()
        .filter(dish_reviews::Column::DishId.eq(dish.id))
        .all(&db)
        .await?;
    assert!(remaining.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_restaurant_service_transactions() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let categories = CategoryService::new(db.clone());
    let restaurants = RestaurantService::new(db.clone());

    let pizza = categories.create("Pizza").await?;
    let pasta = categories.create("Pasta").await?;

    let input = RestaurantInput {
        name: "Luigi".to_string(),
        address: "1 Main St".to_string(),
        website: "https://luigi.example".to_string(),
        description: "Trattoria".to_string(),
        price: 2,
        categories: vec![pizza.id, pasta.id],
    };
    let created = restaurants.create(input.clone()).await?;

    // Replacing categories repeatedly never leaves duplicates
    for _ in 0..3 {
        restaurants
            .update(
                created.id,
                RestaurantInput {
                    categories: vec![pasta.id, pasta.id, pizza.id],
                    ..input.clone()
                },
            )
            .await?;
    }
    let links = restaurant_categories::Entity::find()
        .filter(restaurant_categories::Column::RestaurantId.eq(created.id))
        .all(&db)
        .await?;
    assert_eq!(links.len(), 2);

    // A failing create leaves no restaurant behind
    let err = restaurants
        .create(RestaurantInput {
            name: "Ghost".to_string(),
            categories: vec![pizza.id, 999],
            ..input.clone()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound { entity: "category", id: 999 }));
    let ghosts = restaurants::Entity::find()
        .filter(restaurants::Column::Name.eq("Ghost"))
        .all(&db)
        .await?;
    assert!(ghosts.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_customer_likes_and_unique_email() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let customers = CustomerService::new(db.clone());

    let luigi = insert_restaurant(&db, "Luigi").await?;
    let mario = insert_restaurant(&db, "Mario").await?;

    let ann = customers
        .create(CustomerInput {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            liked_restaurants: vec![mario.id, luigi.id],
        })
        .await?;
    let names = ann
        .liked_restaurants
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Luigi", "Mario"]);

    let stored = customers::Entity::find_by_id(ann.id).one(&db).await?.unwrap();
    assert_eq!(stored.password, "1234");

    let updated = customers
        .update(
            ann.id,
            CustomerInput {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                liked_restaurants: vec![],
            },
        )
        .await?;
    assert!(updated.liked_restaurants.is_empty());

    let err = customers
        .create(CustomerInput {
            name: "Other Ann".to_string(),
            email: "ann@example.com".to_string(),
            liked_restaurants: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Conflict(_)));

    Ok(())
}
