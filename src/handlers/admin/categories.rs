use crate::error::{AppError, AppResult};
use crate::handlers::category::CategoryResponse;
use crate::middleware::AuthAdmin;
use crate::response::ApiResponse;
use crate::services::category::{CategoryChanges, CategoryService};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Display order, defaults to 0
    pub order_num: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub order_num: Option<i32>,
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    security(("admin_token" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Name taken", body = AppError),
    ),
    tag = "admin"
)]
pub async fn create_category(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let created = CategoryService::new(db)
        .create(
            &payload.name,
            payload.description,
            payload.order_num,
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::with_message(
        "Category created",
        CategoryResponse::new(created, 0),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Name taken", body = AppError),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn update_category(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let service = CategoryService::new(db);
    service
        .update(
            id,
            CategoryChanges {
                name: payload.name,
                description: payload.description,
                order_num: payload.order_num,
            },
            chrono::Utc::now().naive_utc(),
        )
        .await?;
    let (category, count) = service.get_with_count(id).await?;

    Ok(ApiResponse::with_message(
        "Category updated",
        CategoryResponse::new(category, count),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    security(("admin_token" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 400, description = "Category still has debates", body = AppError),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn delete_category(
    Extension(db): Extension<DatabaseConnection>,
    auth_admin: AuthAdmin,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    CategoryService::new(db).delete(id).await?;
    tracing::info!(category_id = id, admin_id = auth_admin.admin_id, "category deleted");
    Ok(ApiResponse::message("Category deleted"))
}
