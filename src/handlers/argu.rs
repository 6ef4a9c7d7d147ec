use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::ArguStatus;
use crate::response::{resolve_page, ApiResponse, PaginatedResponse};
use crate::services::argu::{ArguDetail, ArguFilter, ArguService, ArguSort, NewArgu};
use crate::services::category::CategoryService;
use crate::services::lifecycle::ArguChanges;
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
pub struct CreateArguRequest {
    pub category_id: i32,
    /// Debate title (1-200 characters)
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    /// Must be in the future
    pub start_date: NaiveDateTime,
    /// Must be after `startDate`
    pub end_date: NaiveDateTime,
}

/// Partial update; omitted fields keep their current value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArguRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub category_id: Option<i32>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl From<UpdateArguRequest> for ArguChanges {
    fn from(req: UpdateArguRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            category_id: req.category_id,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArguResponse {
    pub id: i32,
    pub user_id: i32,
    pub author_nickname: Option<String>,
    pub category_id: i32,
    pub category_name: Option<String>,
    pub title: String,
    pub content: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub status: ArguStatus,
    pub is_hidden: bool,
    pub view_count: i32,
    pub like_count: i64,
    /// Non-hidden comments only
    pub comment_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ArguDetail> for ArguResponse {
    fn from(d: ArguDetail) -> Self {
        let a = d.argu;
        Self {
            id: a.id,
            user_id: a.user_id,
            author_nickname: d.author_nickname,
            category_id: a.category_id,
            category_name: d.category_name,
            title: a.title,
            content: a.content,
            start_date: a.start_date,
            end_date: a.end_date,
            status: a.status,
            is_hidden: a.is_hidden,
            view_count: a.view_count,
            like_count: d.like_count,
            comment_count: d.comment_count,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

pub(crate) fn to_page(
    rows: Vec<ArguDetail>,
    total: u64,
    page: u64,
    size: u64,
) -> PaginatedResponse<ArguResponse> {
    PaginatedResponse::new(
        rows.into_iter().map(ArguResponse::from).collect(),
        total,
        page,
        size,
    )
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ArguListQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub status: Option<ArguStatus>,
    /// latest (default), popular, comments, views
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArguSearchQuery {
    pub keyword: Option<String>,
    pub category_id: Option<i32>,
    pub status: Option<ArguStatus>,
    pub sort: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[utoipa::path(
    post,
    path = "/api/argu",
    security(("jwt_token" = [])),
    request_body = CreateArguRequest,
    responses(
        (status = 200, description = "Debate created", body = ArguResponse),
        (status = 400, description = "Invalid schedule or fields", body = AppError),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "argu"
)]
pub async fn create_argu(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateArguRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let service = ArguService::new(db);
    let created = service
        .create(
            auth_user.user_id,
            NewArgu {
                category_id: payload.category_id,
                title: payload.title,
                content: payload.content,
                start_date: payload.start_date,
                end_date: payload.end_date,
            },
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::with_message(
        "Debate created",
        ArguResponse::from(created),
    ))
}

#[utoipa::path(
    get,
    path = "/api/argu/{id}",
    params(("id" = i32, Path, description = "Debate ID")),
    responses(
        (status = 200, description = "Debate details; view count incremented", body = ArguResponse),
        (status = 404, description = "Debate not found or hidden", body = AppError),
    ),
    tag = "argu"
)]
pub async fn get_argu(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let detail = ArguService::new(db).read(id).await?;
    Ok(ApiResponse::ok(ArguResponse::from(detail)))
}

#[utoipa::path(
    put,
    path = "/api/argu/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Debate ID")),
    request_body = UpdateArguRequest,
    responses(
        (status = 200, description = "Debate updated", body = ArguResponse),
        (status = 400, description = "Debate already started or invalid schedule", body = AppError),
        (status = 401, description = "Not the owner", body = AppError),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "argu"
)]
pub async fn update_argu(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateArguRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let updated = ArguService::new(db)
        .update(
            id,
            auth_user.user_id,
            payload.into(),
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::with_message(
        "Debate updated",
        ArguResponse::from(updated),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/argu/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Debate ID")),
    responses(
        (status = 200, description = "Debate deleted"),
        (status = 400, description = "Debate already started", body = AppError),
        (status = 401, description = "Not the owner", body = AppError),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "argu"
)]
pub async fn delete_argu(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    ArguService::new(db).delete(id, auth_user.user_id).await?;
    Ok(ApiResponse::message("Debate deleted"))
}

#[utoipa::path(
    get,
    path = "/api/argu",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
        ("status" = Option<ArguStatus>, Query, description = "Filter by status"),
        ("sort" = Option<String>, Query, description = "latest, popular, comments, views"),
    ),
    responses(
        (status = 200, description = "Visible debates", body = PaginatedResponse<ArguResponse>),
    ),
    tag = "argu"
)]
pub async fn list_argu(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<ArguListQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = resolve_page(params.page, params.size);
    let filter = ArguFilter {
        status: params.status,
        ..ArguFilter::visible()
    };

    let (rows, total) = ArguService::new(db)
        .list(&filter, ArguSort::parse(params.sort.as_deref()), page, size)
        .await?;

    Ok(ApiResponse::ok(to_page(rows, total, page, size)))
}

#[utoipa::path(
    get,
    path = "/api/argu/search",
    params(
        ("keyword" = Option<String>, Query, description = "Matches title or content"),
        ("categoryId" = Option<i32>, Query, description = "Category filter"),
        ("status" = Option<ArguStatus>, Query, description = "Status filter"),
        ("sort" = Option<String>, Query, description = "latest, popular, comments, views"),
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses(
        (status = 200, description = "Matching visible debates", body = PaginatedResponse<ArguResponse>),
    ),
    tag = "argu"
)]
pub async fn search_argu(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<ArguSearchQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = resolve_page(params.page, params.size);
    let filter = ArguFilter {
        keyword: params.keyword,
        category_id: params.category_id,
        status: params.status,
        ..ArguFilter::visible()
    };

    let (rows, total) = ArguService::new(db)
        .list(&filter, ArguSort::parse(params.sort.as_deref()), page, size)
        .await?;

    Ok(ApiResponse::ok(to_page(rows, total, page, size)))
}

#[utoipa::path(
    get,
    path = "/api/argu/category/{id}",
    params(
        ("id" = i32, Path, description = "Category ID"),
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
        ("status" = Option<ArguStatus>, Query, description = "Status filter"),
        ("sort" = Option<String>, Query, description = "latest, popular, comments, views"),
    ),
    responses(
        (status = 200, description = "Visible debates in the category", body = PaginatedResponse<ArguResponse>),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "argu"
)]
pub async fn list_argu_by_category(
    Extension(db): Extension<DatabaseConnection>,
    Path(category_id): Path<i32>,
    Query(params): Query<ArguListQuery>,
) -> AppResult<impl IntoResponse> {
    CategoryService::new(db.clone())
        .get_by_id(category_id)
        .await?;

    let (page, size) = resolve_page(params.page, params.size);
    let filter = ArguFilter {
        category_id: Some(category_id),
        status: params.status,
        ..ArguFilter::visible()
    };

    let (rows, total) = ArguService::new(db)
        .list(&filter, ArguSort::parse(params.sort.as_deref()), page, size)
        .await?;

    Ok(ApiResponse::ok(to_page(rows, total, page, size)))
}

