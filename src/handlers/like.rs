use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::services::like::LikeService;
use axum::{extract::Path, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeToggleResponse {
    pub liked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatusResponse {
    /// Always false for anonymous callers
    pub liked: bool,
    pub like_count: u64,
}

#[utoipa::path(
    post,
    path = "/api/likes/argu/{argu_id}",
    security(("jwt_token" = [])),
    params(("argu_id" = i32, Path, description = "Debate ID")),
    responses(
        (status = 200, description = "Like toggled", body = LikeToggleResponse),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "likes"
)]
pub async fn toggle_like(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(argu_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let liked = LikeService::new(db)
        .toggle(auth_user.user_id, argu_id, chrono::Utc::now().naive_utc())
        .await?;
    Ok(ApiResponse::ok(LikeToggleResponse { liked }))
}

#[utoipa::path(
    get,
    path = "/api/likes/argu/{argu_id}",
    params(("argu_id" = i32, Path, description = "Debate ID")),
    responses(
        (status = 200, description = "Like count and caller's like state", body = LikeStatusResponse),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "likes"
)]
pub async fn like_status(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: Option<AuthUser>,
    Path(argu_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = LikeService::new(db);
    let like_count = service.count(argu_id).await?;
    let liked = match auth_user {
        Some(user) => service.is_liked(user.user_id, argu_id).await?,
        None => false,
    };
    Ok(ApiResponse::ok(LikeStatusResponse { liked, like_count }))
}
