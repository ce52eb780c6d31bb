use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::restaurant_service::{RestaurantInput, RestaurantDetail};

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/restaurants",
    responses(
        (status = 200, description = "Restaurants with their categories", body = [RestaurantDetail])
    )
)]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantDetail>>, ApiError> {
    Ok(Json(state.restaurants.list().await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    post,
    path = "/api/v1/restaurants",
    request_body = RestaurantInput,
    responses(
        (status = 200, description = "Restaurant created", body = RestaurantDetail),
        (status = 400, description = "Invalid input", body = crate::server::error::ErrorBody),
        (status = 404, description = "Unknown category", body = crate::server::error::ErrorBody)
    )
)]
pub async fn create_restaurant(
    State(state): State<AppState>,
    Json(payload): Json<RestaurantInput>,
) -> Result<Json<RestaurantDetail>, ApiError> {
    Ok(Json(state.restaurants.create(payload).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}",
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Restaurant found", body = RestaurantDetail),
        (status = 404, description = "Restaurant not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RestaurantDetail>, ApiError> {
    Ok(Json(state.restaurants.get(id).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    put,
    path = "/api/v1/restaurants/{id}",
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    request_body = RestaurantInput,
    responses(
        (status = 200, description = "Restaurant updated", body = RestaurantDetail),
        (status = 400, description = "Invalid input", body = crate::server::error::ErrorBody),
        (status = 404, description = "Restaurant or a referenced row not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<RestaurantInput>,
) -> Result<Json<RestaurantDetail>, ApiError> {
    Ok(Json(state.restaurants.update(id, payload).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    delete,
    path = "/api/v1/restaurants/{id}",
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 204, description = "Restaurant deleted along with its dishes, reviews and likes"),
        (status = 404, description = "Restaurant not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.restaurants.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
