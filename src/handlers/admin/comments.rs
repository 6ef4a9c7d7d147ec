use crate::error::{AppError, AppResult};
use crate::handlers::comment::{to_page, CommentResponse};
use crate::middleware::AuthAdmin;
use crate::response::{resolve_page, ApiResponse, PaginatedResponse};
use crate::services::comment::{CommentFilter, CommentService, CommentView};
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCommentQuery {
    pub keyword: Option<String>,
    pub hidden: Option<bool>,
    pub argu_id: Option<i32>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/admin/comments",
    security(("admin_token" = [])),
    params(
        ("keyword" = Option<String>, Query, description = "Content search"),
        ("hidden" = Option<bool>, Query, description = "Hidden filter"),
        ("arguId" = Option<i32>, Query, description = "Debate filter"),
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses((status = 200, description = "Comments, newest first", body = PaginatedResponse<CommentResponse>)),
    tag = "admin"
)]
pub async fn search_comments(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Query(params): Query<AdminCommentQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = resolve_page(params.page, params.size);
    let filter = CommentFilter {
        keyword: params.keyword,
        hidden: params.hidden,
        argu_id: params.argu_id,
    };
    let (rows, total) = CommentService::new(db)
        .search(&filter, page, size)
        .await?;
    Ok(ApiResponse::ok(to_page(rows, total, page, size)))
}

#[utoipa::path(
    put,
    path = "/api/admin/comments/{id}/toggle-hidden",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Hidden flag flipped", body = CommentResponse),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn toggle_hidden(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let comment = CommentService::new(db)
        .toggle_hidden(id, chrono::Utc::now().naive_utc())
        .await?;
    tracing::info!(
        comment_id = id,
        admin_id = auth_admin.admin_id,
        hidden = comment.is_hidden,
        "comment visibility toggled"
    );

    Ok(ApiResponse::ok(CommentResponse::from(CommentView {
        comment,
        author_nickname: None,
        replies: Vec::new(),
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/comments/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment and its replies deleted"),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_comment(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = CommentService::new(db);
    service.get_by_id(id).await?;
    service.delete_thread(id).await?;
    tracing::info!(comment_id = id, admin_id = auth_admin.admin_id, "comment deleted by admin");
    Ok(ApiResponse::message("Comment deleted"))
}
