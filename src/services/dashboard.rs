use crate::{
    error::AppResult,
    models::{
        argu, report, user, Argu, ArguModel, ArguStatus, Comment, Report, ReportModel,
        ReportStatus, User, UserModel, UserStatus,
    },
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

pub const DEFAULT_STATS_DAYS: u32 = 7;
pub const MAX_STATS_DAYS: u32 = 90;
const DASHBOARD_LIST_LIMIT: u64 = 5;

#[derive(Debug, Clone, Default)]
pub struct DashboardTotals {
    pub total_users: u64,
    pub total_argus: u64,
    pub total_comments: u64,
    pub active_argus: u64,
    pub pending_reports: u64,
    pub today_new_users: u64,
    pub today_new_argus: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub totals: DashboardTotals,
    pub recent_users: Vec<UserModel>,
    pub top_argus: Vec<ArguModel>,
    pub pending_reports: Vec<ReportModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStatusCounts {
    pub total: u64,
    pub active: u64,
    pub suspended: u64,
    pub deleted: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArguStatusCounts {
    pub total: u64,
    pub scheduled: u64,
    pub active: u64,
    pub ended: u64,
    pub hidden: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct Statistics {
    pub users: UserStatusCounts,
    pub argus: ArguStatusCounts,
    pub daily_registrations: Vec<DailyCount>,
    pub daily_argu_creations: Vec<DailyCount>,
}

/// Read-only aggregates for the admin console.
pub struct DashboardService {
    db: DatabaseConnection,
}

impl DashboardService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn dashboard(&self, now: NaiveDateTime) -> AppResult<Dashboard> {
        let (today_start, today_end) = day_bounds(now.date());

        let totals = DashboardTotals {
            total_users: User::find().count(&self.db).await?,
            total_argus: Argu::find().count(&self.db).await?,
            total_comments: Comment::find().count(&self.db).await?,
            active_argus: Argu::find()
                .filter(argu::Column::Status.eq(ArguStatus::Active))
                .count(&self.db)
                .await?,
            pending_reports: Report::find()
                .filter(report::Column::Status.eq(ReportStatus::Pending))
                .count(&self.db)
                .await?,
            today_new_users: User::find()
                .filter(user::Column::CreatedAt.gte(today_start))
                .filter(user::Column::CreatedAt.lt(today_end))
                .count(&self.db)
                .await?,
            today_new_argus: Argu::find()
                .filter(argu::Column::CreatedAt.gte(today_start))
                .filter(argu::Column::CreatedAt.lt(today_end))
                .count(&self.db)
                .await?,
        };

        let recent_users = User::find()
            .order_by_desc(user::Column::CreatedAt)
            .limit(DASHBOARD_LIST_LIMIT)
            .all(&self.db)
            .await?;

        let top_argus = Argu::find()
            .order_by_desc(argu::Column::ViewCount)
            .order_by_desc(argu::Column::CreatedAt)
            .limit(DASHBOARD_LIST_LIMIT)
            .all(&self.db)
            .await?;

        let pending_reports = Report::find()
            .filter(report::Column::Status.eq(ReportStatus::Pending))
            .order_by_asc(report::Column::CreatedAt)
            .limit(DASHBOARD_LIST_LIMIT)
            .all(&self.db)
            .await?;

        Ok(Dashboard {
            totals,
            recent_users,
            top_argus,
            pending_reports,
        })
    }

    /// `days` is clamped to `1..=MAX_STATS_DAYS`; series end today and run oldest first.
    pub async fn statistics(&self, days: Option<u32>, now: NaiveDateTime) -> AppResult<Statistics> {
        let days = clamp_days(days);

        let mut users = UserStatusCounts {
            total: User::find().count(&self.db).await?,
            ..Default::default()
        };
        for status in [UserStatus::Active, UserStatus::Suspended, UserStatus::Deleted] {
            let n = User::find()
                .filter(user::Column::Status.eq(status))
                .count(&self.db)
                .await?;
            match status {
                UserStatus::Active => users.active = n,
                UserStatus::Suspended => users.suspended = n,
                UserStatus::Deleted => users.deleted = n,
            }
        }

        let mut argus = ArguStatusCounts {
            total: Argu::find().count(&self.db).await?,
            hidden: Argu::find()
                .filter(argu::Column::IsHidden.eq(true))
                .count(&self.db)
                .await?,
            ..Default::default()
        };
        for status in [ArguStatus::Scheduled, ArguStatus::Active, ArguStatus::Ended] {
            let n = Argu::find()
                .filter(argu::Column::Status.eq(status))
                .count(&self.db)
                .await?;
            match status {
                ArguStatus::Scheduled => argus.scheduled = n,
                ArguStatus::Active => argus.active = n,
                ArguStatus::Ended => argus.ended = n,
            }
        }

        let mut daily_registrations = Vec::with_capacity(days as usize);
        let mut daily_argu_creations = Vec::with_capacity(days as usize);
        for date in trailing_days(now.date(), days) {
            let (start, end) = day_bounds(date);
            daily_registrations.push(DailyCount {
                date,
                count: User::find()
                    .filter(user::Column::CreatedAt.gte(start))
                    .filter(user::Column::CreatedAt.lt(end))
                    .count(&self.db)
                    .await?,
            });
            daily_argu_creations.push(DailyCount {
                date,
                count: Argu::find()
                    .filter(argu::Column::CreatedAt.gte(start))
                    .filter(argu::Column::CreatedAt.lt(end))
                    .count(&self.db)
                    .await?,
            });
        }

        Ok(Statistics {
            users,
            argus,
            daily_registrations,
            daily_argu_creations,
        })
    }
}

fn clamp_days(days: Option<u32>) -> u32 {
    days.unwrap_or(DEFAULT_STATS_DAYS).clamp(1, MAX_STATS_DAYS)
}

fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(chrono::NaiveTime::MIN);
    (start, start + Duration::days(1))
}

fn trailing_days(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days as i64)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_are_clamped() {
        assert_eq!(clamp_days(None), 7);
        assert_eq!(clamp_days(Some(0)), 1);
        assert_eq!(clamp_days(Some(365)), 90);
    }

    #[test]
    fn trailing_days_end_today_oldest_first() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let days = trailing_days(today, 3);
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                today,
            ]
        );
    }
}
