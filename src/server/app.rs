use anyhow::{anyhow, Result};
use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[cfg(feature = "graphql")]
use axum::extract::{Json, State};
#[cfg(feature = "graphql")]
use async_graphql::{Request, Response as GraphQLResponse};
#[cfg(feature = "graphql")]
use crate::graphql::{build_schema, GraphQLContext, GraphQLSchema};

use super::handlers::{categories, customers, dishes, health, reports, restaurants, reviews};
use crate::services::{
    CategoryService, CustomerService, DishService, ReportService, RestaurantService,
    ReviewService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub reports: ReportService,
    pub categories: CategoryService,
    pub restaurants: RestaurantService,
    pub dishes: DishService,
    pub customers: CustomerService,
    pub reviews: ReviewService,
    #[cfg(feature = "graphql")]
    pub graphql_schema: GraphQLSchema,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            reports: ReportService::new(db.clone()),
            categories: CategoryService::new(db.clone()),
            restaurants: RestaurantService::new(db.clone()),
            dishes: DishService::new(db.clone()),
            customers: CustomerService::new(db.clone()),
            reviews: ReviewService::new(db.clone()),
            #[cfg(feature = "graphql")]
            graphql_schema: build_schema(GraphQLContext::new(db.clone())),
            db,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        reports::list_reports,
        reports::run_report,
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        restaurants::list_restaurants,
        restaurants::create_restaurant,
        restaurants::get_restaurant,
        restaurants::update_restaurant,
        restaurants::delete_restaurant,
        dishes::list_dishes,
        dishes::create_dish,
        dishes::get_dish,
        dishes::update_dish,
        dishes::delete_dish,
        customers::list_customers,
        customers::create_customer,
        customers::get_customer,
        customers::update_customer,
        customers::delete_customer,
        reviews::list_reviews,
        reviews::create_review,
        reviews::get_review,
        reviews::update_review,
        reviews::delete_review,
    ),
    components(schemas(
        crate::server::error::ErrorBody,
        reports::ReportInfo,
        crate::services::report_service::RestaurantName,
        crate::services::report_service::CustomerContact,
        crate::services::report_service::CheapestDish,
        crate::services::report_service::RestaurantDish,
        crate::database::entities::categories::Model,
        categories::CategoryRequest,
        crate::services::restaurant_service::RestaurantInput,
        crate::services::restaurant_service::RestaurantDetail,
        crate::services::restaurant_service::CategoryRef,
        crate::services::dish_service::DishInput,
        crate::services::dish_service::DishDetail,
        crate::services::customer_service::CustomerInput,
        crate::services::customer_service::CustomerSummary,
        crate::services::customer_service::CustomerDetail,
        crate::services::customer_service::RestaurantRef,
        crate::services::review_service::ReviewInput,
        crate::services::review_service::DishRatingInput,
        crate::services::review_service::ReviewDetail,
        crate::services::review_service::DishRating,
        crate::services::review_service::CustomerRef,
    )),
    tags(
        (name = "dishboard", description = "Restaurant directory and reports")
    )
)]
pub struct ApiDoc;

pub async fn create_app(db: DatabaseConnection, cors_origin: Option<&str>) -> Result<Router> {
    let state = AppState::new(db);

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let mut app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    #[cfg(feature = "graphql")]
    {
        app = app.route(
            "/graphql",
            get(graphql_playground)
                .post(graphql_handler)
                .options(|| async { axum::http::StatusCode::OK }),
        );
    }

    let app = app
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Report routes
        .route("/reports", get(reports::list_reports))
        .route("/reports/:name", get(reports::run_report))
        // Category routes
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Restaurant routes
        .route(
            "/restaurants",
            get(restaurants::list_restaurants).post(restaurants::create_restaurant),
        )
        .route(
            "/restaurants/:id",
            get(restaurants::get_restaurant)
                .put(restaurants::update_restaurant)
                .delete(restaurants::delete_restaurant),
        )
        // Dish routes
        .route("/dishes", get(dishes::list_dishes).post(dishes::create_dish))
        .route(
            "/dishes/:id",
            get(dishes::get_dish)
                .put(dishes::update_dish)
                .delete(dishes::delete_dish),
        )
        // Customer routes
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        // Review routes
        .route("/reviews", get(reviews::list_reviews).post(reviews::create_review))
        .route(
            "/reviews/:id",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
}

#[cfg(feature = "graphql")]
async fn graphql_handler(
    State(state): State<AppState>,
    Json(req): Json<Request>,
) -> Json<GraphQLResponse> {
    tracing::debug!("GraphQL request received");
    let response = state.graphql_schema.execute(req).await;
    tracing::debug!("GraphQL request completed");
    Json(response)
}

#[cfg(feature = "graphql")]
async fn graphql_playground() -> impl axum::response::IntoResponse {
    axum::response::Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}
