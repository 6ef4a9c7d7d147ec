use crate::error::{AppError, AppResult};
use crate::handlers::auth::UserResponse;
use crate::handlers::user::UserStatsResponse;
use crate::middleware::AuthAdmin;
use crate::models::UserStatus;
use crate::response::{resolve_page, ApiResponse, PaginatedResponse};
use crate::services::user::UserService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AdminUserQuery {
    /// Matches email or nickname
    pub keyword: Option<String>,
    pub status: Option<UserStatus>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUserDetailResponse {
    pub user: UserResponse,
    pub stats: UserStatsResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetUserStatusRequest {
    pub status: UserStatus,
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    security(("admin_token" = [])),
    params(
        ("keyword" = Option<String>, Query, description = "Email or nickname"),
        ("status" = Option<UserStatus>, Query, description = "Status filter"),
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses((status = 200, description = "Users", body = PaginatedResponse<UserResponse>)),
    tag = "admin"
)]
pub async fn search_users(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Query(params): Query<AdminUserQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = resolve_page(params.page, params.size);
    let (rows, total) = UserService::new(db)
        .search(params.keyword.as_deref(), params.status, page, size)
        .await?;
    let items = rows.into_iter().map(UserResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(items, total, page, size)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with activity counts", body = AdminUserDetailResponse),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn get_user(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let (user, stats) = UserService::new(db).get_with_stats(id).await?;
    Ok(ApiResponse::ok(AdminUserDetailResponse {
        user: user.into(),
        stats: stats.into(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/status",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = SetUserStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = UserResponse),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn set_user_status(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<SetUserStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::new(db)
        .set_status(id, payload.status, chrono::Utc::now().naive_utc())
        .await?;
    tracing::info!(
        user_id = id,
        admin_id = auth_admin.admin_id,
        status = ?payload.status,
        "user status changed"
    );
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User marked deleted"),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    UserService::new(db)
        .soft_delete(id, chrono::Utc::now().naive_utc())
        .await?;
    tracing::info!(user_id = id, admin_id = auth_admin.admin_id, "user soft-deleted");
    Ok(ApiResponse::message("User deleted"))
}
