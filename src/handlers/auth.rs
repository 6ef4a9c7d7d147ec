use crate::error::{AppError, AppResult};
use crate::models::{UserModel, UserStatus};
use crate::response::ApiResponse;
use crate::services::auth::AuthService;
use crate::utils::jwt::{token_ttl, TokenScope};
use axum::{response::IntoResponse, Extension, Json};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    /// Password (8-100 characters)
    #[validate(length(min = 8, max = 100))]
    pub password: String,
    /// Display name (1-50 characters)
    #[validate(length(min = 1, max = 50))]
    pub nickname: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub status: UserStatus,
    pub email_verified: bool,
    pub created_at: NaiveDateTime,
}

impl From<UserModel> for UserResponse {
    fn from(u: UserModel) -> Self {
        Self {
            id: u.id,
            email: u.email,
            nickname: u.nickname,
            profile_image: u.profile_image,
            bio: u.bio,
            status: u.status,
            email_verified: u.email_verified,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
    pub user: UserResponse,
}

fn auth_response(user: UserModel, token: String) -> AppResult<AuthResponse> {
    Ok(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: token_ttl(TokenScope::User)?,
        user: user.into(),
    })
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered and signed in", body = AuthResponse),
        (status = 400, description = "Invalid fields or email taken", body = AppError),
    ),
    tag = "auth"
)]
pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let (user, token) = AuthService::new(db)
        .register(
            &payload.email,
            &payload.password,
            &payload.nickname,
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::with_message(
        "Registration successful",
        auth_response(user, token)?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError),
        (status = 403, description = "Account suspended or deleted", body = AppError),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let (user, token) = AuthService::new(db)
        .login(&payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::ok(auth_response(user, token)?))
}
