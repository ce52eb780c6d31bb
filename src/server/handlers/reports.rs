use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
};
use serde::Serialize;

#[cfg(feature = "server")]
use utoipa::ToSchema;

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::report_service::{ReportKind, ReportOutput, ReportParams};

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct ReportInfo {
    pub name: String,
    pub description: String,
}

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    responses(
        (status = 200, description = "Available reports", body = [ReportInfo])
    )
)]
pub async fn list_reports() -> Json<Vec<ReportInfo>> {
    Json(
        ReportKind::ALL
            .iter()
            .map(|kind| ReportInfo {
                name: kind.as_str().to_string(),
                description: kind.description().to_string(),
            })
            .collect(),
    )
}

#[cfg(feature = "server")]
#[utoipa::path(
    get,
    path = "/api/v1/reports/{name}",
    params(
        ("name" = String, Path, description = "Report name: first ... eighth"),
        ReportParams
    ),
    responses(
        (status = 200, description = "Report rows; the row shape depends on the report"),
        (status = 400, description = "Unknown report or invalid parameters", body = crate::server::error::ErrorBody)
    )
)]
pub async fn run_report(
    State(state): State<AppState>,
    Path(name): Path<String>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<ReportOutput>, ApiError> {
    let kind: ReportKind = name.parse()?;
    let Query(params) = params?;
    let request = params.into_request(kind)?;
    let output = state.reports.run(request).await?;
    Ok(Json(output))
}
