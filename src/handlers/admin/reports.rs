use crate::error::{AppError, AppResult};
use crate::handlers::report::ReportResponse;
use crate::middleware::AuthAdmin;
use crate::models::ReportStatus;
use crate::response::{resolve_page, ApiResponse, PaginatedResponse};
use crate::services::report::ReportService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReportListQuery {
    pub status: Option<ReportStatus>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessReportQuery {
    /// APPROVED or REJECTED
    pub status: ReportStatus,
}

#[utoipa::path(
    get,
    path = "/api/admin/reports",
    security(("admin_token" = [])),
    params(
        ("status" = Option<ReportStatus>, Query, description = "Status filter"),
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses((status = 200, description = "Reports, newest first", body = PaginatedResponse<ReportResponse>)),
    tag = "admin"
)]
pub async fn list_reports(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Query(params): Query<ReportListQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = resolve_page(params.page, params.size);
    let (rows, total) = ReportService::new(db)
        .list(params.status, page, size)
        .await?;
    let items = rows.into_iter().map(ReportResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(items, total, page, size)))
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report", body = ReportResponse),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn get_report(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let report = ReportService::new(db).get_by_id(id).await?;
    Ok(ApiResponse::ok(ReportResponse::from(report)))
}

#[utoipa::path(
    put,
    path = "/api/admin/reports/{id}/process",
    security(("admin_token" = [])),
    params(
        ("id" = i32, Path, description = "Report ID"),
        ("status" = ReportStatus, Query, description = "APPROVED or REJECTED"),
    ),
    responses(
        (status = 200, description = "Report processed", body = ReportResponse),
        (status = 400, description = "Invalid target status", body = AppError),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn process_report(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
    Query(params): Query<ProcessReportQuery>,
) -> AppResult<impl IntoResponse> {
    let report = ReportService::new(db)
        .process(
            id,
            params.status,
            auth_admin.admin_id,
            chrono::Utc::now().naive_utc(),
        )
        .await?;
    Ok(ApiResponse::with_message(
        "Report processed",
        ReportResponse::from(report),
    ))
}
