use crate::{
    error::{AppError, AppResult},
    models::{comment, user, Argu, Comment, CommentModel, User},
};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashMap;

/// A comment with its author's nickname and, for top-level comments, the
/// visible replies underneath it.
#[derive(Debug, Clone)]
pub struct CommentView {
    pub comment: CommentModel,
    pub author_nickname: Option<String>,
    pub replies: Vec<CommentView>,
}

#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub keyword: Option<String>,
    pub hidden: Option<bool>,
    pub argu_id: Option<i32>,
}

pub struct CommentService {
    db: DatabaseConnection,
}

impl CommentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Comments are accepted in any debate status.
    pub async fn create(
        &self,
        user_id: i32,
        argu_id: i32,
        parent_id: Option<i32>,
        content: &str,
        now: NaiveDateTime,
    ) -> AppResult<CommentView> {
        Argu::find_by_id(argu_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Argu"))?;

        if let Some(pid) = parent_id {
            self.validate_parent(pid, argu_id).await?;
        }

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("Comment must not be empty"));
        }

        let created = comment::ActiveModel {
            argu_id: Set(argu_id),
            user_id: Set(user_id),
            parent_id: Set(parent_id),
            content: Set(content.to_string()),
            is_hidden: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        let mut views = with_authors(&self.db, vec![created]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("created comment vanished")))
    }

    async fn validate_parent(&self, parent_id: i32, argu_id: i32) -> AppResult<()> {
        let parent = Comment::find_by_id(parent_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Parent comment"))?;

        if parent.argu_id != argu_id {
            return Err(AppError::validation(
                "Parent comment belongs to a different argu",
            ));
        }
        Ok(())
    }

    /// Paged visible top-level comments, oldest first, each with its visible replies.
    pub async fn list_by_argu(
        &self,
        argu_id: i32,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<CommentView>, u64)> {
        Argu::find_by_id(argu_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Argu"))?;

        let paginator = Comment::find()
            .filter(comment::Column::ArguId.eq(argu_id))
            .filter(comment::Column::ParentId.is_null())
            .filter(comment::Column::IsHidden.eq(false))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .paginate(&self.db, size);

        let total = paginator.num_items().await?;
        let top_level = paginator.fetch_page(page).await?;

        let parent_ids: Vec<i32> = top_level.iter().map(|c| c.id).collect();
        let replies = if parent_ids.is_empty() {
            vec![]
        } else {
            Comment::find()
                .filter(comment::Column::ParentId.is_in(parent_ids))
                .filter(comment::Column::IsHidden.eq(false))
                .order_by_asc(comment::Column::CreatedAt)
                .order_by_asc(comment::Column::Id)
                .all(&self.db)
                .await?
        };

        let mut replies_by_parent: HashMap<i32, Vec<CommentView>> = HashMap::new();
        for reply in with_authors(&self.db, replies).await? {
            if let Some(pid) = reply.comment.parent_id {
                replies_by_parent.entry(pid).or_default().push(reply);
            }
        }

        let threads = with_authors(&self.db, top_level)
            .await?
            .into_iter()
            .map(|mut view| {
                view.replies = replies_by_parent
                    .remove(&view.comment.id)
                    .unwrap_or_default();
                view
            })
            .collect();

        Ok((threads, total))
    }

    pub async fn list_by_user(
        &self,
        user_id: i32,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<CommentView>, u64)> {
        let paginator = Comment::find()
            .filter(comment::Column::UserId.eq(user_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .paginate(&self.db, size);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page).await?;
        Ok((with_authors(&self.db, rows).await?, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<CommentModel> {
        Comment::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Comment"))
    }

    /// Author-only delete; replies go with their parent.
    pub async fn delete(&self, id: i32, caller_id: i32) -> AppResult<()> {
        let existing = self.get_by_id(id).await?;
        if existing.user_id != caller_id {
            return Err(AppError::unauthorized(
                "Only the author can delete this comment",
            ));
        }
        self.delete_thread(id).await
    }

    pub async fn delete_thread(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        Comment::delete_many()
            .filter(comment::Column::ParentId.eq(id))
            .exec(&txn)
            .await?;
        let result = Comment::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Comment"));
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn search(
        &self,
        filter: &CommentFilter,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<CommentView>, u64)> {
        let mut query = Comment::find();
        if let Some(hidden) = filter.hidden {
            query = query.filter(comment::Column::IsHidden.eq(hidden));
        }
        if let Some(argu_id) = filter.argu_id {
            query = query.filter(comment::Column::ArguId.eq(argu_id));
        }
        if let Some(keyword) = filter.keyword.as_deref().map(str::trim) {
            if !keyword.is_empty() {
                query = query.filter(comment::Column::Content.contains(keyword));
            }
        }

        let paginator = query
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .paginate(&self.db, size);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page).await?;
        Ok((with_authors(&self.db, rows).await?, total))
    }

    pub async fn toggle_hidden(&self, id: i32, now: NaiveDateTime) -> AppResult<CommentModel> {
        let existing = self.get_by_id(id).await?;
        let hidden = !existing.is_hidden;

        let mut active: comment::ActiveModel = existing.into();
        active.is_hidden = Set(hidden);
        active.updated_at = Set(now);
        let updated = active.update(&self.db).await?;

        tracing::info!(comment_id = id, hidden, "comment visibility toggled");
        Ok(updated)
    }
}

async fn with_authors<C: ConnectionTrait>(
    db: &C,
    rows: Vec<CommentModel>,
) -> AppResult<Vec<CommentView>> {
    let user_ids: Vec<i32> = rows.iter().map(|c| c.user_id).collect();
    let nicknames: HashMap<i32, String> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.nickname))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|c| CommentView {
            author_nickname: nicknames.get(&c.user_id).cloned(),
            comment: c,
            replies: vec![],
        })
        .collect())
}
