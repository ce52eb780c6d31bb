use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::dish_service::{DishInput, DishDetail};

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/dishes",
    responses(
        (status = 200, description = "Dishes with restaurant and category names", body = [DishDetail])
    )
)]
pub async fn list_dishes(
    State(state): State<AppState>,
) -> Result<Json<Vec<DishDetail>>, ApiError> {
    Ok(Json(state.dishes.list().await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    post,
    path = "/api/v1/dishes",
    request_body = DishInput,
    responses(
        (status = 200, description = "Dish created", body = DishDetail),
        (status = 400, description = "Invalid input", body = crate::server::error::ErrorBody),
        (status = 404, description = "Unknown restaurant or category", body = crate::server::error::ErrorBody)
    )
)]
pub async fn create_dish(
    State(state): State<AppState>,
    Json(payload): Json<DishInput>,
) -> Result<Json<DishDetail>, ApiError> {
    Ok(Json(state.dishes.create(payload).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/dishes/{id}",
    params(
        ("id" = i32, Path, description = "Dish ID")
    ),
    responses(
        (status = 200, description = "Dish found", body = DishDetail),
        (status = 404, description = "Dish not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn get_dish(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DishDetail>, ApiError> {
    Ok(Json(state.dishes.get(id).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    put,
    path = "/api/v1/dishes/{id}",
    params(
        ("id" = i32, Path, description = "Dish ID")
    ),
    request_body = DishInput,
    responses(
        (status = 200, description = "Dish updated", body = DishDetail),
        (status = 400, description = "Invalid input", body = crate::server::error::ErrorBody),
        (status = 404, description = "Dish or a referenced row not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn update_dish(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<DishInput>,
) -> Result<Json<DishDetail>, ApiError> {
    Ok(Json(state.dishes.update(id, payload).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    delete,
    path = "/api/v1/dishes/{id}",
    params(
        ("id" = i32, Path, description = "Dish ID")
    ),
    responses(
        (status = 204, description = "Dish deleted along with its ratings"),
        (status = 404, description = "Dish not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn delete_dish(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.dishes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
