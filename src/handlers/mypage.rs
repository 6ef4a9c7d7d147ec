use crate::error::AppResult;
use crate::handlers::argu::{self, ArguResponse};
use crate::handlers::comment::{self, CommentResponse};
use crate::handlers::opinion::OpinionResponse;
use crate::middleware::AuthUser;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::argu::{ArguFilter, ArguService, ArguSort};
use crate::services::comment::CommentService;
use crate::services::like::LikeService;
use crate::services::opinion::OpinionService;
use axum::{extract::Query, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    get,
    path = "/api/my/argu",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses((status = 200, description = "Caller's visible debates", body = PaginatedResponse<ArguResponse>)),
    tag = "my"
)]
pub async fn my_argu(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = params.resolve();
    let filter = ArguFilter {
        user_id: Some(auth_user.user_id),
        ..ArguFilter::visible()
    };
    let (rows, total) = ArguService::new(db)
        .list(&filter, ArguSort::Latest, page, size)
        .await?;
    Ok(ApiResponse::ok(argu::to_page(rows, total, page, size)))
}

#[utoipa::path(
    get,
    path = "/api/my/comments",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses((status = 200, description = "Caller's comments, newest first", body = PaginatedResponse<CommentResponse>)),
    tag = "my"
)]
pub async fn my_comments(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = params.resolve();
    let (rows, total) = CommentService::new(db)
        .list_by_user(auth_user.user_id, page, size)
        .await?;
    Ok(ApiResponse::ok(comment::to_page(rows, total, page, size)))
}

#[utoipa::path(
    get,
    path = "/api/my/opinions",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses((status = 200, description = "Caller's opinions, newest first", body = PaginatedResponse<OpinionResponse>)),
    tag = "my"
)]
pub async fn my_opinions(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = params.resolve();
    let (rows, total) = OpinionService::new(db)
        .list_by_user(auth_user.user_id, page, size)
        .await?;
    let items = rows.into_iter().map(OpinionResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(items, total, page, size)))
}

#[utoipa::path(
    get,
    path = "/api/my/likes",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses((status = 200, description = "Caller's debates that received likes, most liked first", body = PaginatedResponse<ArguResponse>)),
    tag = "my"
)]
pub async fn my_likes(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = params.resolve();
    let (rows, total) = LikeService::new(db.clone())
        .liked_debates_of_author(auth_user.user_id, page, size)
        .await?;
    let details = ArguService::new(db).details(rows).await?;
    Ok(ApiResponse::ok(argu::to_page(details, total, page, size)))
}
