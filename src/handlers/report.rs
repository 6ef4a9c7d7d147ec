use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{ReportModel, ReportStatus, ReportTargetType};
use crate::response::ApiResponse;
use crate::services::report::{NewReport, ReportService};
use axum::{response::IntoResponse, Extension, Json};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub target_type: ReportTargetType,
    pub target_id: i32,
    /// Short reason (1-100 characters)
    #[validate(length(min = 1, max = 100))]
    pub reason: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: i32,
    pub reporter_id: i32,
    pub target_type: ReportTargetType,
    pub target_id: i32,
    pub reason: String,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub processed_by: Option<i32>,
    pub processed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<ReportModel> for ReportResponse {
    fn from(r: ReportModel) -> Self {
        Self {
            id: r.id,
            reporter_id: r.reporter_id,
            target_type: r.target_type,
            target_id: r.target_id,
            reason: r.reason,
            description: r.description,
            status: r.status,
            processed_by: r.processed_by,
            processed_at: r.processed_at,
            created_at: r.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/reports",
    security(("jwt_token" = [])),
    request_body = CreateReportRequest,
    responses(
        (status = 200, description = "Report submitted", body = ReportResponse),
        (status = 400, description = "Already reported", body = AppError),
    ),
    tag = "reports"
)]
pub async fn create_report(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateReportRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let report = ReportService::new(db)
        .create(
            auth_user.user_id,
            NewReport {
                target_type: payload.target_type,
                target_id: payload.target_id,
                reason: payload.reason,
                description: payload.description,
            },
            chrono::Utc::now().naive_utc(),
        )
        .await?;

    Ok(ApiResponse::with_message(
        "Report submitted",
        ReportResponse::from(report),
    ))
}
