use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{OpinionModel, OpinionSide};
use crate::response::ApiResponse;
use crate::services::opinion::{OpinionService, SideTally};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpinionRequest {
    pub argu_id: i32,
    pub side: OpinionSide,
    #[validate(length(max = 2000))]
    pub content: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpinionResponse {
    pub id: i32,
    pub argu_id: i32,
    pub user_id: i32,
    pub side: OpinionSide,
    pub content: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<OpinionModel> for OpinionResponse {
    fn from(o: OpinionModel) -> Self {
        Self {
            id: o.id,
            argu_id: o.argu_id,
            user_id: o.user_id,
            side: o.side,
            content: o.content,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpinionTallyResponse {
    pub for_count: u64,
    pub against_count: u64,
    pub neutral_count: u64,
    pub other_count: u64,
    pub total: u64,
}

impl From<SideTally> for OpinionTallyResponse {
    fn from(t: SideTally) -> Self {
        Self {
            total: t.total(),
            for_count: t.for_count,
            against_count: t.against_count,
            neutral_count: t.neutral_count,
            other_count: t.other_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OpinionListResponse {
    pub opinions: Vec<OpinionResponse>,
    pub tally: OpinionTallyResponse,
}

#[utoipa::path(
    post,
    path = "/api/opinions",
    security(("jwt_token" = [])),
    request_body = CreateOpinionRequest,
    responses(
        (status = 200, description = "Opinion recorded", body = OpinionResponse),
        (status = 400, description = "Debate not open or duplicate opinion", body = AppError),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "opinions"
)]
pub async fn create_opinion(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateOpinionRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let created = OpinionService::new(db)
        .create(
            auth_user.user_id,
            payload.argu_id,
            payload.side,
            payload.content,
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::with_message(
        "Opinion recorded",
        OpinionResponse::from(created),
    ))
}

#[utoipa::path(
    get,
    path = "/api/opinions/argu/{argu_id}",
    params(("argu_id" = i32, Path, description = "Debate ID")),
    responses(
        (status = 200, description = "Opinions with per-side tallies", body = OpinionListResponse),
        (status = 404, description = "Debate not found", body = AppError),
    ),
    tag = "opinions"
)]
pub async fn list_opinions(
    Extension(db): Extension<DatabaseConnection>,
    Path(argu_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let (opinions, tally) = OpinionService::new(db).list_by_argu(argu_id).await?;

    Ok(ApiResponse::ok(OpinionListResponse {
        opinions: opinions.into_iter().map(OpinionResponse::from).collect(),
        tally: tally.into(),
    }))
}
