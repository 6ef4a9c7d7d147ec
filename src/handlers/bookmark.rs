use crate::error::{AppError, AppResult};
use crate::handlers::argu::{to_page, ArguResponse};
use crate::middleware::AuthUser;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::argu::ArguService;
use crate::services::bookmark::BookmarkService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct BookmarkToggleResponse {
    pub bookmarked: bool,
}

#[utoipa::path(
    post,
    path = "/api/bookmarks/argu/{argu_id}",
    security(("jwt_token" = [])),
    params(("argu_id" = i32, Path, description = "Debate ID")),
    responses(
        (status = 200, description = "Bookmark toggled", body = BookmarkToggleResponse),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "bookmarks"
)]
pub async fn toggle_bookmark(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(argu_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let bookmarked = BookmarkService::new(db)
        .toggle(auth_user.user_id, argu_id, chrono::Utc::now().naive_utc())
        .await?;
    Ok(ApiResponse::ok(BookmarkToggleResponse { bookmarked }))
}

#[utoipa::path(
    get,
    path = "/api/bookmarks",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses(
        (status = 200, description = "Bookmarked debates, newest bookmark first", body = PaginatedResponse<ArguResponse>),
    ),
    tag = "bookmarks"
)]
pub async fn list_bookmarks(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = params.resolve();
    let (rows, total) = BookmarkService::new(db.clone())
        .list_user_bookmarks(auth_user.user_id, page, size)
        .await?;
    let details = ArguService::new(db).details(rows).await?;
    Ok(ApiResponse::ok(to_page(details, total, page, size)))
}
