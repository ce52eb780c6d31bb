use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::customer_service::{CustomerInput, CustomerDetail, CustomerSummary};

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    responses(
        (status = 200, description = "Customers with review and favorite counts", body = [CustomerSummary])
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerSummary>>, ApiError> {
    Ok(Json(state.customers.list().await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CustomerInput,
    responses(
        (status = 200, description = "Customer created", body = CustomerDetail),
        (status = 400, description = "Invalid input", body = crate::server::error::ErrorBody),
        (status = 404, description = "Unknown liked restaurant", body = crate::server::error::ErrorBody),
        (status = 409, description = "Email already registered", body = crate::server::error::ErrorBody)
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CustomerInput>,
) -> Result<Json<CustomerDetail>, ApiError> {
    Ok(Json(state.customers.create(payload).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer found", body = CustomerDetail),
        (status = 404, description = "Customer not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CustomerDetail>, ApiError> {
    Ok(Json(state.customers.get(id).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer ID")
    ),
    request_body = CustomerInput,
    responses(
        (status = 200, description = "Customer updated", body = CustomerDetail),
        (status = 400, description = "Invalid input", body = crate::server::error::ErrorBody),
        (status = 404, description = "Customer or a referenced row not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CustomerInput>,
) -> Result<Json<CustomerDetail>, ApiError> {
    Ok(Json(state.customers.update(id, payload).await?))
}

#[cfg(feature = "server")]
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer ID")
    ),
    responses(
        (status = 204, description = "Customer deleted along with reviews and likes"),
        (status = 404, description = "Customer not found", body = crate::server::error::ErrorBody)
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
