use crate::{
    error::{AppError, AppResult},
    models::{opinion, Argu, Opinion, OpinionModel, OpinionSide},
    services::lifecycle,
};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

/// Per-side opinion counts for one debate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideTally {
    pub for_count: u64,
    pub against_count: u64,
    pub neutral_count: u64,
    pub other_count: u64,
}

impl SideTally {
    fn add(&mut self, side: OpinionSide) {
        match side {
            OpinionSide::For => self.for_count += 1,
            OpinionSide::Against => self.against_count += 1,
            OpinionSide::Neutral => self.neutral_count += 1,
            OpinionSide::Other => self.other_count += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.for_count + self.against_count + self.neutral_count + self.other_count
    }
}

pub struct OpinionService {
    db: DatabaseConnection,
}

impl OpinionService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// One opinion per (debate, user), only while the debate is ACTIVE and
    /// `now` is inside its window.
    pub async fn create(
        &self,
        user_id: i32,
        argu_id: i32,
        side: OpinionSide,
        content: Option<String>,
        now: NaiveDateTime,
    ) -> AppResult<OpinionModel> {
        let argu = Argu::find_by_id(argu_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Argu"))?;

        lifecycle::ensure_accepting_opinions(&argu, now)?;

        let already = Opinion::find()
            .filter(opinion::Column::ArguId.eq(argu_id))
            .filter(opinion::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        if already > 0 {
            return Err(AppError::validation("Opinion already submitted for this argu"));
        }

        let content = content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        // The unique index still guards against a concurrent duplicate.
        opinion::ActiveModel {
            argu_id: Set(argu_id),
            user_id: Set(user_id),
            side: Set(side),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::on_duplicate(e, "Opinion already submitted for this argu"))
    }

    pub async fn list_by_argu(&self, argu_id: i32) -> AppResult<(Vec<OpinionModel>, SideTally)> {
        Argu::find_by_id(argu_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Argu"))?;

        let opinions = Opinion::find()
            .filter(opinion::Column::ArguId.eq(argu_id))
            .order_by_asc(opinion::Column::CreatedAt)
            .order_by_asc(opinion::Column::Id)
            .all(&self.db)
            .await?;

        let mut tally = SideTally::default();
        for o in &opinions {
            tally.add(o.side);
        }
        Ok((opinions, tally))
    }

    pub async fn list_by_user(
        &self,
        user_id: i32,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<OpinionModel>, u64)> {
        let paginator = Opinion::find()
            .filter(opinion::Column::UserId.eq(user_id))
            .order_by_desc(opinion::Column::CreatedAt)
            .order_by_desc(opinion::Column::Id)
            .paginate(&self.db, size);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page).await?;
        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_each_side() {
        let mut tally = SideTally::default();
        for side in [
            OpinionSide::For,
            OpinionSide::For,
            OpinionSide::Against,
            OpinionSide::Other,
        ] {
            tally.add(side);
        }
        assert_eq!(tally.for_count, 2);
        assert_eq!(tally.against_count, 1);
        assert_eq!(tally.neutral_count, 0);
        assert_eq!(tally.total(), 4);
    }
}
