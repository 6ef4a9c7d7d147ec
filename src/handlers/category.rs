use crate::error::{AppError, AppResult};
use crate::models::CategoryModel;
use crate::response::ApiResponse;
use crate::services::category::CategoryService;
use axum::{extract::Path, response::IntoResponse, Extension};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub order_num: i32,
    /// Visible debates in this category
    pub argu_count: u64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CategoryResponse {
    pub fn new(c: CategoryModel, argu_count: u64) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            order_num: c.order_num,
            argu_count,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories in display order", body = Vec<CategoryResponse>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let rows = CategoryService::new(db).list_with_counts().await?;
    let items: Vec<CategoryResponse> = rows
        .into_iter()
        .map(|(c, count)| CategoryResponse::new(c, count))
        .collect();
    Ok(ApiResponse::ok(items))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = CategoryResponse),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "categories"
)]
pub async fn get_category(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let (category, count) = CategoryService::new(db).get_with_count(id).await?;
    Ok(ApiResponse::ok(CategoryResponse::new(category, count)))
}
