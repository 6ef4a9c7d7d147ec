use crate::{
    error::{AppError, AppResult},
    models::{argu, bookmark, Argu, ArguModel, Bookmark},
};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;

pub struct BookmarkService {
    db: DatabaseConnection,
}

impl BookmarkService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Toggle bookmark: if exists -> delete, if not -> create.
    /// Returns true if bookmarked, false if un-bookmarked.
    pub async fn toggle(&self, user_id: i32, argu_id: i32, now: NaiveDateTime) -> AppResult<bool> {
        Argu::find_by_id(argu_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Argu"))?;

        let existing = Bookmark::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .filter(bookmark::Column::ArguId.eq(argu_id))
            .one(&self.db)
            .await?;

        if let Some(found) = existing {
            Bookmark::delete_by_id(found.id).exec(&self.db).await?;
            return Ok(false);
        }

        bookmark::ActiveModel {
            user_id: Set(user_id),
            argu_id: Set(argu_id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::on_duplicate(e, "Already bookmarked"))?;
        Ok(true)
    }

    /// List user's bookmarked debates with pagination.
    /// Returns debates in bookmark order (most recently bookmarked first);
    /// hidden debates are skipped.
    pub async fn list_user_bookmarks(
        &self,
        user_id: i32,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<ArguModel>, u64)> {
        let paginator = Bookmark::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .order_by_desc(bookmark::Column::CreatedAt)
            .order_by_desc(bookmark::Column::Id)
            .paginate(&self.db, size);

        let total = paginator.num_items().await?;
        let bookmarks = paginator.fetch_page(page).await?;

        let argu_ids: Vec<i32> = bookmarks.iter().map(|b| b.argu_id).collect();
        if argu_ids.is_empty() {
            return Ok((vec![], total));
        }

        let debates = Argu::find()
            .filter(argu::Column::Id.is_in(argu_ids.clone()))
            .filter(argu::Column::IsHidden.eq(false))
            .all(&self.db)
            .await?;

        // Reorder debates to match bookmark order
        let mut by_id: HashMap<i32, ArguModel> = debates.into_iter().map(|a| (a.id, a)).collect();
        let ordered: Vec<ArguModel> = argu_ids
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .collect();

        Ok((ordered, total))
    }
}
