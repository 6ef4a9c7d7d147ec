use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::{resolve_page, ApiResponse, PaginatedResponse};
use crate::services::chat::{ChatEntry, ChatService};
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
pub struct ChatMessageRequest {
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: i32,
    pub argu_id: i32,
    pub user_id: i32,
    pub nickname: Option<String>,
    pub message: String,
    pub created_at: NaiveDateTime,
}

impl From<ChatEntry> for ChatMessageResponse {
    fn from(entry: ChatEntry) -> Self {
        let m = entry.message;
        Self {
            id: m.id,
            argu_id: m.argu_id,
            user_id: m.user_id,
            nickname: entry.nickname,
            message: m.message,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ChatListQuery {
    /// Only messages created after this instant, oldest first
    pub after: Option<NaiveDateTime>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[utoipa::path(
    post,
    path = "/api/chat/argu/{argu_id}",
    security(("jwt_token" = [])),
    params(("argu_id" = i32, Path, description = "Debate ID")),
    request_body = ChatMessageRequest,
    responses(
        (status = 200, description = "Message posted", body = ChatMessageResponse),
        (status = 400, description = "Empty or oversized message", body = AppError),
        (status = 404, description = "Debate not found or hidden", body = AppError),
    ),
    tag = "chat"
)]
pub async fn post_message(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(argu_id): Path<i32>,
    Json(payload): Json<ChatMessageRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let entry = ChatService::new(db)
        .post(
            auth_user.user_id,
            argu_id,
            &payload.message,
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::ok(ChatMessageResponse::from(entry)))
}

#[utoipa::path(
    get,
    path = "/api/chat/argu/{argu_id}",
    params(
        ("argu_id" = i32, Path, description = "Debate ID"),
        ("after" = Option<NaiveDateTime>, Query, description = "Poll for messages after this instant"),
        ("page" = Option<u64>, Query, description = "Zero-based page index"),
        ("size" = Option<u64>, Query, description = "Page size (max 100)"),
    ),
    responses(
        (status = 200, description = "Chat messages", body = PaginatedResponse<ChatMessageResponse>),
        (status = 404, description = "Debate not found or hidden", body = AppError),
    ),
    tag = "chat"
)]
pub async fn list_messages(
    Extension(db): Extension<DatabaseConnection>,
    Path(argu_id): Path<i32>,
    Query(params): Query<ChatListQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, size) = resolve_page(params.page, params.size);
    let service = ChatService::new(db);

    let (entries, total) = match params.after {
        Some(after) => {
            let entries = service.since(argu_id, after, size).await?;
            let total = entries.len() as u64;
            (entries, total)
        }
        None => service.recent(argu_id, page, size).await?,
    };

    let items = entries.into_iter().map(ChatMessageResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(items, total, page, size)))
}
