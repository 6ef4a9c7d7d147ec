use crate::error::AppResult;
use crate::handlers::argu::ArguResponse;
use crate::handlers::auth::UserResponse;
use crate::handlers::report::ReportResponse;
use crate::middleware::AuthAdmin;
use crate::response::ApiResponse;
use crate::services::argu::ArguService;
use crate::services::dashboard::{
    ArguStatusCounts, DailyCount, DashboardService, DashboardTotals, UserStatusCounts,
};
use axum::{extract::Query, response::IntoResponse, Extension};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotalsResponse {
    pub total_users: u64,
    pub total_argus: u64,
    pub total_comments: u64,
    pub active_argus: u64,
    pub pending_reports: u64,
    pub today_new_users: u64,
    pub today_new_argus: u64,
}

impl From<DashboardTotals> for DashboardTotalsResponse {
    fn from(t: DashboardTotals) -> Self {
        Self {
            total_users: t.total_users,
            total_argus: t.total_argus,
            total_comments: t.total_comments,
            active_argus: t.active_argus,
            pending_reports: t.pending_reports,
            today_new_users: t.today_new_users,
            today_new_argus: t.today_new_argus,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub totals: DashboardTotalsResponse,
    pub recent_users: Vec<UserResponse>,
    pub top_argus: Vec<ArguResponse>,
    pub pending_reports: Vec<ReportResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatusCountsResponse {
    pub total: u64,
    pub active: u64,
    pub suspended: u64,
    pub deleted: u64,
}

impl From<UserStatusCounts> for UserStatusCountsResponse {
    fn from(c: UserStatusCounts) -> Self {
        Self {
            total: c.total,
            active: c.active,
            suspended: c.suspended,
            deleted: c.deleted,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArguStatusCountsResponse {
    pub total: u64,
    pub scheduled: u64,
    pub active: u64,
    pub ended: u64,
    pub hidden: u64,
}

impl From<ArguStatusCounts> for ArguStatusCountsResponse {
    fn from(c: ArguStatusCounts) -> Self {
        Self {
            total: c.total,
            scheduled: c.scheduled,
            active: c.active,
            ended: c.ended,
            hidden: c.hidden,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyCountResponse {
    pub date: NaiveDate,
    pub count: u64,
}

impl From<DailyCount> for DailyCountResponse {
    fn from(d: DailyCount) -> Self {
        Self {
            date: d.date,
            count: d.count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub users: UserStatusCountsResponse,
    pub argus: ArguStatusCountsResponse,
    pub daily_registrations: Vec<DailyCountResponse>,
    pub daily_argu_creations: Vec<DailyCountResponse>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatisticsQuery {
    /// Days of history, default 7, max 90
    pub days: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    security(("admin_token" = [])),
    responses((status = 200, description = "Dashboard summary", body = DashboardResponse)),
    tag = "admin"
)]
pub async fn dashboard(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
) -> AppResult<impl IntoResponse> {
    let summary = DashboardService::new(db.clone())
        .dashboard(chrono::Utc::now().naive_utc())
        .await?;
    let top_argus = ArguService::new(db).details(summary.top_argus).await?;

    Ok(ApiResponse::ok(DashboardResponse {
        totals: summary.totals.into(),
        recent_users: summary.recent_users.into_iter().map(UserResponse::from).collect(),
        top_argus: top_argus.into_iter().map(ArguResponse::from).collect(),
        pending_reports: summary
            .pending_reports
            .into_iter()
            .map(ReportResponse::from)
            .collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/statistics",
    security(("admin_token" = [])),
    params(("days" = Option<u32>, Query, description = "Days of history, default 7, max 90")),
    responses((status = 200, description = "Aggregate statistics", body = StatisticsResponse)),
    tag = "admin"
)]
pub async fn statistics(
    Extension(db): Extension<DatabaseConnection>,
    _auth_admin: AuthAdmin,
    Query(params): Query<StatisticsQuery>,
) -> AppResult<impl IntoResponse> {
    let stats = DashboardService::new(db)
        .statistics(params.days, chrono::Utc::now().naive_utc())
        .await?;

    Ok(ApiResponse::ok(StatisticsResponse {
        users: stats.users.into(),
        argus: stats.argus.into(),
        daily_registrations: stats
            .daily_registrations
            .into_iter()
            .map(DailyCountResponse::from)
            .collect(),
        daily_argu_creations: stats
            .daily_argu_creations
            .into_iter()
            .map(DailyCountResponse::from)
            .collect(),
    }))
}
