use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::comment::{CommentService, CommentView};
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub argu_id: i32,
    /// Reply target; must belong to the same debate
    pub parent_id: Option<i32>,
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub argu_id: i32,
    pub user_id: i32,
    pub author_nickname: Option<String>,
    pub parent_id: Option<i32>,
    pub content: String,
    pub is_hidden: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[schema(no_recursion)]
    pub replies: Vec<CommentResponse>,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        let c = view.comment;
        Self {
            id: c.id,
            argu_id: c.argu_id,
            user_id: c.user_id,
            author_nickname: view.author_nickname,
            parent_id: c.parent_id,
            content: c.content,
            is_hidden: c.is_hidden,
            created_at: c.created_at,
            updated_at: c.updated_at,
            replies: view.replies.into_iter().map(Self::from).collect(),
        }
    }
}

pub(crate) fn to_page(
    rows: Vec<CommentView>,
    total: u64,
    page: u64,
    size: u64,
) -> PaginatedResponse<CommentResponse> {
    PaginatedResponse::new(
        rows.into_iter().map(CommentResponse::from).collect(),
        total,
        page,
        size,
    )
}

#[utoipa::path(
    post,
    path = "/api/comments",
    security(("jwt_token" = [])),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Parent belongs to another debate", body = AppError),
        (status = 404, description = "Debate or parent not found", body = AppError),
    ),
    tag = "comments"
)]
pub async fn create_comment(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let created = CommentService::new(db)
        .create(
            auth_user.user_id,
            payload.argu_id,
            payload.parent_id,
            &payload.content,
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::ok(CommentResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/comments/argu/{argu_id}",
    params(
        ("argu_id" = i32, Path, description = "Debate ID"),
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses(
        (status = 200, description = "Top-level comments with replies", body = PaginatedResponse<CommentResponse>),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "comments"
)]
pub async fn list_comments(
    Extension(db): Extension<DatabaseConnection>,
    Path(argu_id): Path<i32>,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = params.resolve();
    let (rows, total) = CommentService::new(db)
        .list_by_argu(argu_id, page, size)
        .await?;
    Ok(ApiResponse::ok(to_page(rows, total, page, size)))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment and its replies deleted"),
        (status = 401, description = "Not the author", body = AppError),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "comments"
)]
pub async fn delete_comment(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    CommentService::new(db).delete(id, auth_user.user_id).await?;
    Ok(ApiResponse::message("Comment deleted"))
}
