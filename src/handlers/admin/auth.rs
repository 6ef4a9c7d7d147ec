use crate::error::{AppError, AppResult};
use crate::handlers::admin::accounts::AdminResponse;
use crate::middleware::AuthAdmin;
use crate::response::ApiResponse;
use crate::services::admin_account::AdminAccountService;
use crate::utils::jwt::{token_ttl, TokenScope};
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    #[validate(length(min = 1))]
    pub admin_id: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub admin: AdminResponse,
}

#[utoipa::path(
    post,
    path = "/api/admin/auth/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AdminLoginResponse),
        (status = 401, description = "Invalid credentials or inactive account", body = AppError),
    ),
    tag = "admin"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<AdminLoginRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let (admin, token) = AdminAccountService::new(db)
        .login(&payload.admin_id, &payload.password)
        .await?;

    Ok(ApiResponse::ok(AdminLoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: token_ttl(TokenScope::Admin)?,
        admin: admin.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/auth/me",
    security(("admin_token" = [])),
    responses(
        (status = 200, description = "Current admin", body = AdminResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "admin"
)]
pub async fn me(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
) -> AppResult<impl IntoResponse> {
    let admin = AdminAccountService::new(db)
        .get_by_id(auth_admin.admin_id)
        .await?;
    Ok(ApiResponse::ok(AdminResponse::from(admin)))
}
