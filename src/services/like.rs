use crate::{
    error::{AppError, AppResult},
    models::{argu, like, Argu, ArguModel, Like},
};
use chrono::NaiveDateTime;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

pub struct LikeService {
    db: DatabaseConnection,
}

impl LikeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Toggle like: if exists -> delete, if not -> create.
    /// Returns true if the debate is now liked.
    pub async fn toggle(&self, user_id: i32, argu_id: i32, now: NaiveDateTime) -> AppResult<bool> {
        Argu::find_by_id(argu_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Argu"))?;

        let existing = Like::find()
            .filter(like::Column::ArguId.eq(argu_id))
            .filter(like::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        match existing {
            Some(found) => {
                Like::delete_by_id(found.id).exec(&self.db).await?;
                Ok(false)
            }
            None => {
                like::ActiveModel {
                    argu_id: Set(argu_id),
                    user_id: Set(user_id),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
                .map_err(|e| AppError::on_duplicate(e, "Already liked"))?;
                Ok(true)
            }
        }
    }

    pub async fn is_liked(&self, user_id: i32, argu_id: i32) -> AppResult<bool> {
        let count = Like::find()
            .filter(like::Column::ArguId.eq(argu_id))
            .filter(like::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn count(&self, argu_id: i32) -> AppResult<u64> {
        Argu::find_by_id(argu_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Argu"))?;

        let count = Like::find()
            .filter(like::Column::ArguId.eq(argu_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// The caller's own visible debates that received at least one like,
    /// most-liked first.
    pub async fn liked_debates_of_author(
        &self,
        author_id: i32,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<ArguModel>, u64)> {
        let paginator = Argu::find()
            .join(JoinType::InnerJoin, argu::Relation::Like.def())
            .filter(argu::Column::UserId.eq(author_id))
            .filter(argu::Column::IsHidden.eq(false))
            .group_by(argu::Column::Id)
            .order_by_desc(Expr::col((like::Entity, like::Column::Id)).count())
            .order_by_desc(argu::Column::CreatedAt)
            .paginate(&self.db, size);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page).await?;
        Ok((rows, total))
    }
}
