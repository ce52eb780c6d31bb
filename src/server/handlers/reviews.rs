use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::review_service::{ReviewInput, ReviewDetail};

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    responses(
        (status = 200, description = "Reviews, newest first", body = [ReviewDetail])
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewDetail>>, ApiError> {
    Ok(Json(state.reviews.list().await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = ReviewInput,
    responses(
        (status = 200, description = "Review created", body = ReviewDetail),
        (status = 400, description = "Invalid input", body = crate::server::error::ErrorBody),
        (status = 404, description = "Unknown restaurant, customer or dish", body = crate::server::error::ErrorBody)
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<ReviewInput>,
) -> Result<Json<ReviewDetail>, ApiError> {
    Ok(Json(state.reviews.create(payload).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    params(
        ("id" = i32, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review found", body = ReviewDetail),
        (status = 404, description = "Review not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ReviewDetail>, ApiError> {
    Ok(Json(state.reviews.get(id).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    params(
        ("id" = i32, Path, description = "Review ID")
    ),
    request_body = ReviewInput,
    responses(
        (status = 200, description = "Review updated", body = ReviewDetail),
        (status = 400, description = "Invalid input", body = crate::server::error::ErrorBody),
        (status = 404, description = "Review or a referenced row not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ReviewInput>,
) -> Result<Json<ReviewDetail>, ApiError> {
    Ok(Json(state.reviews.update(id, payload).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(
        ("id" = i32, Path, description = "Review ID")
    ),
    responses(
        (status = 204, description = "Review deleted along with its dish ratings"),
        (status = 404, description = "Review not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.reviews.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
