use crate::error::{AppError, AppResult};
use crate::handlers::auth::UserResponse;
use crate::middleware::AuthUser;
use crate::models::UserModel;
use crate::response::ApiResponse;
use crate::services::user::{ProfileChanges, UserService, UserStats};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    /// Visible debates authored
    pub argu_count: u64,
    pub comment_count: u64,
    /// Likes received on visible authored debates
    pub like_count: u64,
    /// Debates the user has taken a side on
    pub participated_count: u64,
}

impl From<UserStats> for UserStatsResponse {
    fn from(s: UserStats) -> Self {
        Self {
            argu_count: s.argu_count,
            comment_count: s.comment_count,
            like_count: s.like_count,
            participated_count: s.participated_count,
        }
    }
}

/// Public view of a user; omits email and status.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: i32,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub created_at: NaiveDateTime,
    pub stats: UserStatsResponse,
}

impl UserProfileResponse {
    fn new(u: UserModel, stats: UserStats) -> Self {
        Self {
            id: u.id,
            nickname: u.nickname,
            profile_image: u.profile_image,
            bio: u.bio,
            created_at: u.created_at,
            stats: stats.into(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Blank values are ignored
    #[validate(length(max = 50))]
    pub nickname: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(length(max = 500))]
    pub profile_image: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Public profile with statistics", body = UserProfileResponse),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn get_user_profile(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let (user, stats) = UserService::new(db).get_with_stats(id).await?;
    Ok(ApiResponse::ok(UserProfileResponse::new(user, stats)))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "users"
)]
pub async fn get_current_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user = UserService::new(db).get_by_id(auth_user.user_id).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/me",
    security(("jwt_token" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "users"
)]
pub async fn update_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let user = UserService::new(db)
        .update_profile(
            auth_user.user_id,
            ProfileChanges {
                nickname: payload.nickname,
                bio: payload.bio,
                profile_image: payload.profile_image,
            },
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::with_message(
        "Profile updated",
        UserResponse::from(user),
    ))
}
