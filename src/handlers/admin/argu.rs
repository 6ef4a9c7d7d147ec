use crate::error::{AppError, AppResult};
use crate::handlers::argu::{to_page, ArguResponse, UpdateArguRequest};
use crate::middleware::AuthAdmin;
use crate::models::ArguStatus;
use crate::response::{resolve_page, ApiResponse, PaginatedResponse};
use crate::services::argu::{ArguFilter, ArguService, ArguSort};
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Unlike the public search, hidden debates are included unless `hidden` is set.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminArguQuery {
    pub keyword: Option<String>,
    pub status: Option<ArguStatus>,
    pub hidden: Option<bool>,
    pub category_id: Option<i32>,
    pub user_id: Option<i32>,
    pub sort: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetArguStatusQuery {
    pub status: ArguStatus,
}

#[utoipa::path(
    get,
    path = "/api/admin/argu",
    security(("admin_token" = [])),
    params(
        ("keyword" = Option<String>, Query, description = "Matches title or content"),
        ("status" = Option<ArguStatus>, Query, description = "Status filter"),
        ("hidden" = Option<bool>, Query, description = "Hidden filter; both when omitted"),
        ("categoryId" = Option<i32>, Query, description = "Category filter"),
        ("userId" = Option<i32>, Query, description = "Owner filter"),
        ("sort" = Option<String>, Query, description = "latest, popular, comments, views"),
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses((status = 200, description = "Debates", body = PaginatedResponse<ArguResponse>)),
    tag = "admin"
)]
pub async fn search_argu(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Query(params): Query<AdminArguQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = resolve_page(params.page, params.size);
    let filter = ArguFilter {
        keyword: params.keyword,
        category_id: params.category_id,
        user_id: params.user_id,
        status: params.status,
        hidden: params.hidden,
    };

    let (rows, total) = ArguService::new(db)
        .list(&filter, ArguSort::parse(params.sort.as_deref()), page, size)
        .await?;

    Ok(ApiResponse::ok(to_page(rows, total, page, size)))
}

#[utoipa::path(
    get,
    path = "/api/admin/argu/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Debate ID")),
    responses(
        (status = 200, description = "Debate details, hidden or not", body = ArguResponse),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn get_argu(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let detail = ArguService::new(db).read_any(id).await?;
    Ok(ApiResponse::ok(ArguResponse::from(detail)))
}

#[utoipa::path(
    put,
    path = "/api/admin/argu/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Debate ID")),
    request_body = UpdateArguRequest,
    responses(
        (status = 200, description = "Debate updated", body = ArguResponse),
        (status = 400, description = "Start not before end", body = AppError),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn update_argu(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateArguRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let updated = ArguService::new(db)
        .admin_update(id, payload.into(), chrono::Utc::now().naive_utc())
        .await?;
    tracing::info!(argu_id = id, admin_id = auth_admin.admin_id, "argu edited by admin");

    Ok(ApiResponse::with_message(
        "Debate updated",
        ArguResponse::from(updated),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/argu/{id}/status",
    security(("admin_token" = [])),
    params(
        ("id" = i32, Path, description = "Debate ID"),
        ("status" = ArguStatus, Query, description = "SCHEDULED, ACTIVE or ENDED"),
    ),
    responses(
        (status = 200, description = "Status overridden", body = ArguResponse),
        (status = 400, description = "Unknown status", body = AppError),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn set_status(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Path(id): Path<i32>,
    Query(params): Query<SetArguStatusQuery>,
) -> AppResult<impl IntoResponse> {
    let updated = ArguService::new(db)
        .set_status(id, params.status, chrono::Utc::now().naive_utc())
        .await?;

    Ok(ApiResponse::ok(ArguResponse::from(updated)))
}

#[utoipa::path(
    put,
    path = "/api/admin/argu/{id}/toggle-hidden",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Debate ID")),
    responses(
        (status = 200, description = "Hidden flag flipped", body = ArguResponse),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn toggle_hidden(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let updated = ArguService::new(db)
        .toggle_hidden(id, chrono::Utc::now().naive_utc())
        .await?;

    Ok(ApiResponse::ok(ArguResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/argu/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Debate ID")),
    responses(
        (status = 200, description = "Debate and its children deleted"),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_argu(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ArguService::new(db);
    service.find(id).await?;
    service.delete_with_children(id).await?;
    tracing::info!(argu_id = id, admin_id = auth_admin.admin_id, "argu deleted by admin");
    Ok(ApiResponse::message("Debate deleted"))
}
