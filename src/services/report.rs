use crate::{
    error::{AppError, AppResult},
    models::{report, Report, ReportModel, ReportStatus, ReportTargetType},
};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

#[derive(Debug, Clone)]
pub struct NewReport {
    pub target_type: ReportTargetType,
    pub target_id: i32,
    pub reason: String,
    pub description: Option<String>,
}

pub struct ReportService {
    db: DatabaseConnection,
}

impl ReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// A reporter may report a given target only once.
    pub async fn create(
        &self,
        reporter_id: i32,
        input: NewReport,
        now: NaiveDateTime,
    ) -> AppResult<ReportModel> {
        let duplicate = Report::find()
            .filter(report::Column::ReporterId.eq(reporter_id))
            .filter(report::Column::TargetType.eq(input.target_type))
            .filter(report::Column::TargetId.eq(input.target_id))
            .count(&self.db)
            .await?;
        if duplicate > 0 {
            return Err(AppError::validation("You have already reported this target"));
        }

        let reason = input.reason.trim().to_string();
        if reason.is_empty() {
            return Err(AppError::validation("Reason must not be empty"));
        }

        report::ActiveModel {
            reporter_id: Set(reporter_id),
            target_type: Set(input.target_type),
            target_id: Set(input.target_id),
            reason: Set(reason),
            description: Set(input.description),
            status: Set(ReportStatus::Pending),
            processed_by: Set(None),
            processed_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::on_duplicate(e, "You have already reported this target"))
    }

    pub async fn list(
        &self,
        status: Option<ReportStatus>,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<ReportModel>, u64)> {
        let mut query = Report::find();
        if let Some(status) = status {
            query = query.filter(report::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(report::Column::CreatedAt)
            .order_by_desc(report::Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page).await?;
        Ok((items, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ReportModel> {
        Report::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Report"))
    }

    /// Records the outcome and who made the call. PENDING is not a valid outcome.
    pub async fn process(
        &self,
        id: i32,
        status: ReportStatus,
        admin_id: i32,
        now: NaiveDateTime,
    ) -> AppResult<ReportModel> {
        if status == ReportStatus::Pending {
            return Err(AppError::validation(
                "Report can only be processed as APPROVED or REJECTED",
            ));
        }

        let existing = self.get_by_id(id).await?;
        let mut active: report::ActiveModel = existing.into();
        active.status = Set(status);
        active.processed_by = Set(Some(admin_id));
        active.processed_at = Set(Some(now));
        let updated = active.update(&self.db).await?;

        tracing::info!(report_id = id, admin_id, ?status, "report processed");
        Ok(updated)
    }
}
