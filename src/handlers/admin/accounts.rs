use crate::error::{AppError, AppResult};
use crate::middleware::AuthAdmin;
use crate::models::{AdminModel, AdminRole, AdminStatus};
use crate::response::ApiResponse;
use crate::services::admin_account::{AdminAccountService, AdminChanges, NewAdmin};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: i32,
    pub admin_id: String,
    pub name: String,
    pub role: AdminRole,
    pub status: AdminStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AdminModel> for AdminResponse {
    fn from(a: AdminModel) -> Self {
        Self {
            id: a.id,
            admin_id: a.admin_id,
            name: a.name,
            role: a.role,
            status: a.status,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    #[validate(length(min = 3, max = 50))]
    pub admin_id: String,
    #[validate(length(min = 8, max = 100))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    /// Defaults to ADMIN
    pub role: Option<AdminRole>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAdminRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    pub role: Option<AdminRole>,
    pub status: Option<AdminStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 8, max = 100))]
    pub new_password: String,
}

#[utoipa::path(
    get,
    path = "/api/admin/admins",
    security(("admin_token" = [])),
    responses((status = 200, description = "All admin accounts", body = Vec<AdminResponse>)),
    tag = "admin"
)]
pub async fn list_admins(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
) -> AppResult<impl IntoResponse> {
    let admins = AdminAccountService::new(db).list().await?;
    let items: Vec<AdminResponse> = admins.into_iter().map(AdminResponse::from).collect();
    Ok(ApiResponse::ok(items))
}

#[utoipa::path(
    get,
    path = "/api/admin/admins/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin account", body = AdminResponse),
        (status = 404, description = "Admin not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn get_admin(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let admin = AdminAccountService::new(db).get_by_id(id).await?;
    Ok(ApiResponse::ok(AdminResponse::from(admin)))
}

#[utoipa::path(
    post,
    path = "/api/admin/admins",
    security(("admin_token" = [])),
    request_body = CreateAdminRequest,
    responses(
        (status = 200, description = "Admin created", body = AdminResponse),
        (status = 400, description = "Admin id taken", body = AppError),
        (status = 403, description = "Super admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn create_admin(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Json(payload): Json<CreateAdminRequest>,
) -> AppResult<impl IntoResponse> {
    auth_admin.require_super_admin()?;
    payload.validate()?;

    let created = AdminAccountService::new(db)
        .create(
            NewAdmin {
                admin_id: payload.admin_id,
                password: payload.password,
                name: payload.name,
                role: payload.role,
            },
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::with_message(
        "Admin created",
        AdminResponse::from(created),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/admins/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Admin ID")),
    request_body = UpdateAdminRequest,
    responses(
        (status = 200, description = "Admin updated", body = AdminResponse),
        (status = 403, description = "Super admin only", body = AppError),
        (status = 404, description = "Admin not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn update_admin(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAdminRequest>,
) -> AppResult<impl IntoResponse> {
    auth_admin.require_super_admin()?;
    payload.validate()?;

    let updated = AdminAccountService::new(db)
        .update(
            id,
            AdminChanges {
                name: payload.name,
                role: payload.role,
                status: payload.status,
            },
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::with_message(
        "Admin updated",
        AdminResponse::from(updated),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/admins/{id}/password",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Admin ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 403, description = "Super admin only", body = AppError),
        (status = 404, description = "Admin not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn change_password(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<impl IntoResponse> {
    auth_admin.require_super_admin()?;
    payload.validate()?;

    AdminAccountService::new(db)
        .change_password(id, &payload.new_password, chrono::Utc::now().naive_utc())
        .await?;

    Ok(ApiResponse::message("Password changed"))
}

#[utoipa::path(
    delete,
    path = "/api/admin/admins/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin deleted"),
        (status = 400, description = "Cannot delete own account", body = AppError),
        (status = 403, description = "Super admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_admin(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    auth_admin.require_super_admin()?;
    AdminAccountService::new(db)
        .delete(id, auth_admin.admin_id)
        .await?;
    Ok(ApiResponse::message("Admin deleted"))
}
