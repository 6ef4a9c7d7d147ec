use crate::{
    error::{AppError, AppResult},
    models::{argu, comment, like, opinion, user, Argu, Comment, Like, Opinion, User, UserModel, UserStatus},
};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

/// Public activity counters shown on a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub argu_count: u64,
    pub comment_count: u64,
    pub like_count: u64,
    pub participated_count: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub nickname: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    pub async fn get_with_stats(&self, id: i32) -> AppResult<(UserModel, UserStats)> {
        let found = self.get_by_id(id).await?;
        let stats = self.stats(id).await?;
        Ok((found, stats))
    }

    pub async fn stats(&self, user_id: i32) -> AppResult<UserStats> {
        let argu_count = Argu::find()
            .filter(argu::Column::UserId.eq(user_id))
            .filter(argu::Column::IsHidden.eq(false))
            .count(&self.db)
            .await?;

        let comment_count = Comment::find()
            .filter(comment::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        // Likes received on the user's visible debates.
        let like_count = Like::find()
            .join(JoinType::InnerJoin, like::Relation::Argu.def())
            .filter(argu::Column::UserId.eq(user_id))
            .filter(argu::Column::IsHidden.eq(false))
            .count(&self.db)
            .await?;

        let participated_count = Opinion::find()
            .filter(opinion::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        Ok(UserStats {
            argu_count,
            comment_count,
            like_count,
            participated_count,
        })
    }

    /// Omitted fields stay as they are; a blank nickname is ignored.
    pub async fn update_profile(
        &self,
        user_id: i32,
        changes: ProfileChanges,
        now: NaiveDateTime,
    ) -> AppResult<UserModel> {
        let existing = self.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = existing.into();

        if let Some(nickname) = changes.nickname.as_deref().map(str::trim) {
            if !nickname.is_empty() {
                active.nickname = Set(nickname.to_string());
            }
        }
        if let Some(bio) = changes.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(profile_image) = changes.profile_image {
            active.profile_image = Set(Some(profile_image));
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    pub async fn search(
        &self,
        keyword: Option<&str>,
        status: Option<UserStatus>,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<UserModel>, u64)> {
        let mut query = User::find();
        if let Some(status) = status {
            query = query.filter(user::Column::Status.eq(status));
        }
        if let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Email.contains(keyword))
                    .add(user::Column::Nickname.contains(keyword)),
            );
        }

        let paginator = query
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page).await?;
        Ok((items, total))
    }

    pub async fn set_status(
        &self,
        user_id: i32,
        status: UserStatus,
        now: NaiveDateTime,
    ) -> AppResult<UserModel> {
        let existing = self.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(now);
        let updated = active.update(&self.db).await?;

        tracing::info!(user_id, ?status, "user status changed");
        Ok(updated)
    }

    /// Soft delete: the row stays, the account can no longer sign in.
    pub async fn soft_delete(&self, user_id: i32, now: NaiveDateTime) -> AppResult<()> {
        self.set_status(user_id, UserStatus::Deleted, now).await?;
        Ok(())
    }
}
