//! API integration tests
//!
//! Tests for REST endpoints, the error body contract and GraphQL queries

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use dishboard::database::connection::setup_database;
use dishboard::server::app::create_app;
use sea_orm::Database;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

/// Create a test server backed by a temp-file database
async fn setup_test_server() -> Result<(TestServer, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    let app = create_app(db, None).await?;
    let server = TestServer::new(app)?;

    Ok((server, temp_file))
}

async fn create_category(server: &TestServer, name: &str) -> i64 {
    let response = server
        .post("/api/v1/categories")
        .json(&json!({ "name": name }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["id"].as_i64().unwrap()
}

async fn create_restaurant(server: &TestServer, name: &str, categories: &[i64]) -> i64 {
    let response = server
        .post("/api/v1/restaurants")
        .json(&json!({
            "name": name,
            "address": "1 Main St",
            "website": "https://example.com",
            "description": "Test restaurant",
            "price": 2,
            "categories": categories
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["id"].as_i64().unwrap()
}

async fn create_dish(server: &TestServer, name: &str, restaurant: i64, category: i64) -> i64 {
    let response = server
        .post("/api/v1/dishes")
        .json(&json!({
            "name": name,
            "price": 9.5,
            "description": "Test dish",
            "is_main": true,
            "restaurant_id": restaurant,
            "category_id": category
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["id"].as_i64().unwrap()
}

async fn create_customer(server: &TestServer, name: &str, email: &str, likes: &[i64]) -> i64 {
    let response = server
        .post("/api/v1/customers")
        .json(&json!({
            "name": name,
            "email": email,
            "liked_restaurants": likes
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "dishboard");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_health_reports_closed_database() -> Result<()> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());
    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    let server = TestServer::new(create_app(db.clone(), None).await?)?;
    db.close().await?;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], "unavailable");

    Ok(())
}

#[tokio::test]
async fn test_categories_crud_api() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let id = create_category(&server, "  Pizza ").await;

    let response = server.get(&format!("/api/v1/categories/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let category: Value = response.json();
    assert_eq!(category["name"], "Pizza");

    // Duplicate names conflict
    let response = server
        .post("/api/v1/categories")
        .json(&json!({ "name": "Pizza" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "CONFLICT");

    let response = server
        .put(&format!("/api/v1/categories/{}", id))
        .json(&json!({ "name": "Pizzeria" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["name"], "Pizzeria");

    create_category(&server, "Antipasti").await;
    let response = server.get("/api/v1/categories").await;
    let categories: Vec<Value> = response.json();
    let names = categories
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Antipasti", "Pizzeria"]);

    let response = server.delete(&format!("/api/v1/categories/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server.get(&format!("/api/v1/categories/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("category"));

    Ok(())
}

#[tokio::test]
async fn test_category_in_use_cannot_be_deleted() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let pizza = create_category(&server, "Pizza").await;
    let restaurant = create_restaurant(&server, "Luigi", &[pizza]).await;
    create_dish(&server, "Margherita", restaurant, pizza).await;

    let response = server.delete(&format!("/api/v1/categories/{}", pizza)).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // Still there
    let response = server.get(&format!("/api/v1/categories/{}", pizza)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_restaurant_api_replaces_categories() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let pizza = create_category(&server, "Pizza").await;
    let pasta = create_category(&server, "Pasta").await;
    let id = create_restaurant(&server, "Luigi", &[pasta, pizza, pasta]).await;

    let response = server.get(&format!("/api/v1/restaurants/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let restaurant: Value = response.json();
    let categories = restaurant["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["name"], "Pasta");
    assert_eq!(categories[1]["name"], "Pizza");

    let response = server
        .put(&format!("/api/v1/restaurants/{}", id))
        .json(&json!({
            "name": "Luigi's",
            "address": "2 Main St",
            "website": "https://luigi.example",
            "description": "Moved",
            "price": 3,
            "categories": [pizza]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let restaurant: Value = response.json();
    assert_eq!(restaurant["name"], "Luigi's");
    assert_eq!(restaurant["categories"].as_array().unwrap().len(), 1);

    // Unknown category is rejected without touching the row
    let response = server
        .put(&format!("/api/v1/restaurants/{}", id))
        .json(&json!({
            "name": "Changed",
            "address": "2 Main St",
            "website": "https://luigi.example",
            "description": "Moved",
            "price": 3,
            "categories": [999]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server.get("/api/v1/restaurants").await;
    let restaurants: Vec<Value> = response.json();
    assert_eq!(restaurants.len(), 1);
    assert_eq!(restaurants[0]["name"], "Luigi's");

    Ok(())
}

#[tokio::test]
async fn test_validation_errors_name_the_field() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;
    let pizza = create_category(&server, "Pizza").await;

    let response = server
        .post("/api/v1/restaurants")
        .json(&json!({
            "name": "Luigi",
            "address": "1 Main St",
            "website": "ftp://luigi.example",
            "description": "Bad site",
            "price": 2,
            "categories": [pizza]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["field"], "website");

    let response = server
        .post("/api/v1/restaurants")
        .json(&json!({
            "name": "Luigi",
            "address": "1 Main St",
            "website": "https://luigi.example",
            "description": "No categories",
            "price": 2,
            "categories": []
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["field"], "categories");

    Ok(())
}

#[tokio::test]
async fn test_customers_hide_password() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let pizza = create_category(&server, "Pizza").await;
    let luigi = create_restaurant(&server, "Luigi", &[pizza]).await;
    let id = create_customer(&server, "Ann", "ann@example.com", &[luigi]).await;

    let response = server.get(&format!("/api/v1/customers/{}", id)).await;
    let customer: Value = response.json();
    assert!(customer.get("password").is_none());
    assert_eq!(customer["liked_restaurants"][0]["name"], "Luigi");

    let response = server.get("/api/v1/customers").await;
    let customers: Vec<Value> = response.json();
    assert_eq!(customers[0]["favorite_count"], 1);
    assert_eq!(customers[0]["review_count"], 0);
    assert!(customers[0].get("password").is_none());

    let response = server
        .post("/api/v1/customers")
        .json(&json!({ "name": "Ann again", "email": "ann@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = server
        .post("/api/v1/customers")
        .json(&json!({ "name": "Nobody", "email": "not-an-email" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["field"], "email");

    Ok(())
}

#[tokio::test]
async fn test_reviews_and_reports_api() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let pizza = create_category(&server, "Pizza").await;
    let luigi = create_restaurant(&server, "Luigi", &[pizza]).await;
    let margherita = create_dish(&server, "Margherita", luigi, pizza).await;
    let ann = create_customer(&server, "Ann", "ann@example.com", &[luigi]).await;

    let response = server
        .post("/api/v1/reviews")
        .json(&json!({
            "text": "Great",
            "score": 5,
            "restaurant_id": luigi,
            "customer_id": ann,
            "dishes": [{ "id": margherita, "score": 4, "comment": "Crispy" }]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let review: Value = response.json();
    assert_eq!(review["restaurant"]["name"], "Luigi");
    assert_eq!(review["customer"]["name"], "Ann");
    assert_eq!(review["dishes"][0]["name"], "Margherita");

    // Same dish twice in one review
    let response = server
        .post("/api/v1/reviews")
        .json(&json!({
            "text": "Again",
            "score": 4,
            "restaurant_id": luigi,
            "customer_id": ann,
            "dishes": [
                { "id": margherita, "score": 4, "comment": "One" },
                { "id": margherita, "score": 5, "comment": "Two" }
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server.get("/api/v1/reviews").await;
    let reviews: Vec<Value> = response.json();
    assert_eq!(reviews.len(), 1);

    let response = server
        .get("/api/v1/reports/first")
        .add_query_param("category", "Pizza")
        .add_query_param("score", 4)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let rows: Vec<Value> = response.json();
    assert_eq!(rows, vec![json!({ "name": "Luigi" })]);

    let response = server
        .get("/api/v1/reports/sixth")
        .add_query_param("category_id", pizza)
        .add_query_param("score", 4)
        .await;
    let rows: Vec<Value> = response.json();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["restaurant"], "Luigi");

    let response = server.get("/api/v1/reports/fifth").await;
    let rows: Vec<Value> = response.json();
    assert_eq!(rows, vec![json!({ "name": "Ann", "email": "ann@example.com" })]);

    let response = server.get("/api/v1/reports/first").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["field"], "category");

    let response = server
        .get("/api/v1/reports/seventh")
        .add_query_param("score", 0)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server.get("/api/v1/reports/ninth").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Unparseable parameters still get the JSON error body
    let response = server
        .get("/api/v1/reports/seventh")
        .add_query_param("score", "abc")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["field"], "query");
    assert!(body["message"].as_str().unwrap().contains("query string"));

    let response = server.get("/api/v1/reports").await;
    let reports: Vec<Value> = response.json();
    assert_eq!(reports.len(), 8);

    Ok(())
}

#[tokio::test]
async fn test_deleting_restaurant_cascades() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let pizza = create_category(&server, "Pizza").await;
    let luigi = create_restaurant(&server, "Luigi", &[pizza]).await;
    let dish = create_dish(&server, "Margherita", luigi, pizza).await;
    let ann = create_customer(&server, "Ann", "ann@example.com", &[luigi]).await;

    let response = server.delete(&format!("/api/v1/restaurants/{}", luigi)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server.get(&format!("/api/v1/dishes/{}", dish)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server.get(&format!("/api/v1/customers/{}", ann)).await;
    let customer: Value = response.json();
    assert!(customer["liked_restaurants"].as_array().unwrap().is_empty());

    let response = server.delete(&format!("/api/v1/restaurants/{}", luigi)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_openapi_document() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let response = server.get("/api-docs/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"]["/api/v1/reports/{name}"].is_object());

    Ok(())
}

#[cfg(feature = "graphql")]
#[tokio::test]
async fn test_graphql_reports() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let pizza = create_category(&server, "Pizza").await;
    create_restaurant(&server, "Luigi", &[pizza]).await;

    let response = server
        .post("/graphql")
        .json(&json!({
            "query": "{ categories { id name } third(restaurant: \"Luigi\") { name } sixth(categoryId: 1, score: 1.0) { name } }"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert!(body.get("errors").is_none());
    assert_eq!(body["data"]["categories"][0]["name"], "Pizza");
    assert_eq!(body["data"]["third"], json!([{ "name": "Luigi" }]));
    assert_eq!(body["data"]["sixth"], json!([]));

    let response = server
        .post("/graphql")
        .json(&json!({ "query": "{ seventh(score: -2.0) { name } }" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["extensions"]["code"], "VALIDATION_FAILED");

    // Same boundary rules as the REST surface
    for (query, field) in [
        ("{ second(category: \"   \") { name } }", "category"),
        ("{ eighth(categoryId: 0, score: 1.0) { name } }", "category_id"),
    ] {
        let response = server.post("/graphql").json(&json!({ "query": query })).await;
        let body: Value = response.json();
        assert_eq!(body["errors"][0]["extensions"]["code"], "VALIDATION_FAILED");
        assert_eq!(body["errors"][0]["extensions"]["field"], field);
    }

    Ok(())
}
