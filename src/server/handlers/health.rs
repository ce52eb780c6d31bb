use axum::{extract::State, http::StatusCode, response::Json};
use sea_orm::{ConnectionTrait, Statement};
use serde_json::{json, Value};
use tracing::error;

use crate::server::app::AppState;

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up"),
        (status = 503, description = "Database did not answer")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let ping = Statement::from_string(state.db.get_database_backend(), "SELECT 1".to_string());

    let (status, database) = match state.db.execute(ping).await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            error!("Health check could not reach the database: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let health = if status.is_success() { "healthy" } else { "unhealthy" };

    (
        status,
        Json(json!({
            "status": health,
            "service": "dishboard",
            "database": database,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
