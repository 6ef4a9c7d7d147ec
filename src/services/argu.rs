use crate::{
    error::{AppError, AppResult},
    models::{
        argu, bookmark, category, chat_message, comment, like, opinion, user, Argu, ArguModel,
        ArguStatus, Bookmark, Category, ChatMessage, Comment, Like, Opinion, User,
    },
    services::lifecycle::{self, ArguChanges, ResolvedChanges},
};
use chrono::NaiveDateTime;
use sea_orm::{
    sea_query::{Expr, IntoCondition},
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select, TransactionTrait,
};
use std::collections::HashMap;

/// Listing order for debates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArguSort {
    #[default]
    Latest,
    Popular,
    Comments,
    Views,
}

impl ArguSort {
    /// Unknown keys fall back to `Latest`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("popular") | Some("likes") => Self::Popular,
            Some("comments") => Self::Comments,
            Some("views") => Self::Views,
            _ => Self::Latest,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArguFilter {
    pub keyword: Option<String>,
    pub category_id: Option<i32>,
    pub user_id: Option<i32>,
    pub status: Option<ArguStatus>,
    /// `None` on the admin surface means "both".
    pub hidden: Option<bool>,
}

impl ArguFilter {
    /// Filter used by every user-facing list: hidden debates never show up.
    pub fn visible() -> Self {
        Self {
            hidden: Some(false),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewArgu {
    pub category_id: i32,
    pub title: String,
    pub content: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

/// A debate plus the derived values every response carries.
#[derive(Debug, Clone)]
pub struct ArguDetail {
    pub argu: ArguModel,
    pub author_nickname: Option<String>,
    pub category_name: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub activated: u64,
    pub ended: u64,
}

pub struct ArguService {
    db: DatabaseConnection,
}

impl ArguService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        owner_id: i32,
        input: NewArgu,
        now: NaiveDateTime,
    ) -> AppResult<ArguDetail> {
        Category::find_by_id(input.category_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;

        lifecycle::validate_schedule(input.start_date, input.end_date, now)?;

        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("Title must not be empty"));
        }

        let created = argu::ActiveModel {
            user_id: Set(owner_id),
            category_id: Set(input.category_id),
            title: Set(title),
            content: Set(input.content),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(ArguStatus::Scheduled),
            is_hidden: Set(false),
            view_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(argu_id = created.id, owner_id, "argu created");
        self.detail(created).await
    }

    pub async fn find(&self, id: i32) -> AppResult<ArguModel> {
        Argu::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Argu"))
    }

    /// Public read path: hidden debates are reported as missing, and every
    /// call bumps the view counter by one.
    pub async fn read(&self, id: i32) -> AppResult<ArguDetail> {
        let mut found = self.find(id).await?;
        lifecycle::ensure_visible(&found)?;

        Argu::update_many()
            .col_expr(
                argu::Column::ViewCount,
                Expr::col(argu::Column::ViewCount).add(1),
            )
            .filter(argu::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        found.view_count += 1;

        self.detail(found).await
    }

    /// Admin read path: ignores the hidden flag and leaves the counter alone.
    pub async fn read_any(&self, id: i32) -> AppResult<ArguDetail> {
        let found = self.find(id).await?;
        self.detail(found).await
    }

    /// Owner edit. Authorization reads the row inside the same transaction
    /// as the write, and the write itself only matches a SCHEDULED row.
    pub async fn update(
        &self,
        id: i32,
        caller_id: i32,
        changes: ArguChanges,
        now: NaiveDateTime,
    ) -> AppResult<ArguDetail> {
        let txn = self.db.begin().await?;
        let existing = find_in(&txn, id).await?;
        lifecycle::authorize_update(&existing, caller_id)?;
        let resolved = lifecycle::resolve_changes(&existing, changes, now)?;
        update_scheduled(&txn, id, resolved, now).await?;
        let updated = find_in(&txn, id).await?;
        txn.commit().await?;
        self.detail(updated).await
    }

    /// Administrative edit: no ownership or status gate, window order still enforced.
    pub async fn admin_update(
        &self,
        id: i32,
        changes: ArguChanges,
        now: NaiveDateTime,
    ) -> AppResult<ArguDetail> {
        let existing = self.find(id).await?;
        let resolved = lifecycle::resolve_admin_changes(&existing, changes)?;
        write_changes(&self.db, id, resolved, now, None).await?;
        let updated = self.find(id).await?;
        self.detail(updated).await
    }

    pub async fn delete(&self, id: i32, caller_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let existing = find_in(&txn, id).await?;
        lifecycle::authorize_delete(&existing, caller_id)?;
        delete_scheduled(&txn, id).await?;
        txn.commit().await?;
        tracing::info!(argu_id = id, caller_id, "argu deleted by owner");
        Ok(())
    }

    /// Removes a debate together with its comments, opinions, likes,
    /// bookmarks and chat messages. Reports that point at it are kept.
    pub async fn delete_with_children(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        delete_children(&txn, id).await?;

        let result = Argu::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Argu"));
        }

        txn.commit().await?;
        Ok(())
    }

    /// Advances debate status from the clock.
    ///
    /// Both steps run in one transaction. Step one is applied before step two
    /// selects, so a debate whose whole window elapsed before the first sweep
    /// goes SCHEDULED -> ACTIVE -> ENDED in a single call. Re-running is a
    /// no-op because each step filters on the status it moves away from.
    pub async fn transition_sweep(&self, now: NaiveDateTime) -> AppResult<SweepReport> {
        let txn = self.db.begin().await?;

        let activated = Argu::update_many()
            .set(argu::ActiveModel {
                status: Set(ArguStatus::Active),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(argu::Column::Status.eq(ArguStatus::Scheduled))
            .filter(argu::Column::StartDate.lte(now))
            .exec(&txn)
            .await?
            .rows_affected;

        let ended = Argu::update_many()
            .set(argu::ActiveModel {
                status: Set(ArguStatus::Ended),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(argu::Column::Status.eq(ArguStatus::Active))
            .filter(argu::Column::EndDate.lte(now))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;
        Ok(SweepReport { activated, ended })
    }

    /// Administrative override, bypasses the monotonic lifecycle.
    pub async fn set_status(
        &self,
        id: i32,
        status: ArguStatus,
        now: NaiveDateTime,
    ) -> AppResult<ArguDetail> {
        let existing = self.find(id).await?;
        let previous = existing.status;

        let mut active: argu::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(now);
        let updated = active.update(&self.db).await?;

        tracing::info!(argu_id = id, ?previous, ?status, "argu status forced");
        self.detail(updated).await
    }

    pub async fn toggle_hidden(&self, id: i32, now: NaiveDateTime) -> AppResult<ArguDetail> {
        let existing = self.find(id).await?;
        let hidden = !existing.is_hidden;

        let mut active: argu::ActiveModel = existing.into();
        active.is_hidden = Set(hidden);
        active.updated_at = Set(now);
        let updated = active.update(&self.db).await?;

        tracing::info!(argu_id = id, hidden, "argu visibility toggled");
        self.detail(updated).await
    }

    pub async fn list(
        &self,
        filter: &ArguFilter,
        sort: ArguSort,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<ArguDetail>, u64)> {
        let query = sorted(filtered(Argu::find(), filter), sort);

        let paginator = query.paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page).await?;

        Ok((self.details(rows).await?, total))
    }

    pub async fn detail(&self, model: ArguModel) -> AppResult<ArguDetail> {
        let mut details = self.details(vec![model]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("argu detail lookup lost a row")))
    }

    /// Attaches author, category and counters to a page of debates, keeping order.
    pub async fn details(&self, rows: Vec<ArguModel>) -> AppResult<Vec<ArguDetail>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<i32> = rows.iter().map(|a| a.id).collect();
        let user_ids: Vec<i32> = rows.iter().map(|a| a.user_id).collect();
        let category_ids: Vec<i32> = rows.iter().map(|a| a.category_id).collect();

        let likes = like_counts(&self.db, &ids).await?;
        let comments = visible_comment_counts(&self.db, &ids).await?;

        let nicknames: HashMap<i32, String> = User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.nickname))
            .collect();

        let categories: HashMap<i32, String> = Category::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(rows
            .into_iter()
            .map(|a| ArguDetail {
                author_nickname: nicknames.get(&a.user_id).cloned(),
                category_name: categories.get(&a.category_id).cloned(),
                like_count: likes.get(&a.id).copied().unwrap_or(0),
                comment_count: comments.get(&a.id).copied().unwrap_or(0),
                argu: a,
            })
            .collect())
    }
}

fn filtered(mut query: Select<Argu>, filter: &ArguFilter) -> Select<Argu> {
    if let Some(hidden) = filter.hidden {
        query = query.filter(argu::Column::IsHidden.eq(hidden));
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(argu::Column::CategoryId.eq(category_id));
    }
    if let Some(user_id) = filter.user_id {
        query = query.filter(argu::Column::UserId.eq(user_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(argu::Column::Status.eq(status));
    }
    if let Some(keyword) = filter.keyword.as_deref().map(str::trim) {
        if !keyword.is_empty() {
            query = query.filter(
                Condition::any()
                    .add(argu::Column::Title.contains(keyword))
                    .add(argu::Column::Content.contains(keyword)),
            );
        }
    }
    query
}

fn sorted(query: Select<Argu>, sort: ArguSort) -> Select<Argu> {
    let query = match sort {
        ArguSort::Latest => query,
        ArguSort::Views => query.order_by_desc(argu::Column::ViewCount),
        ArguSort::Popular => query
            .join(JoinType::LeftJoin, argu::Relation::Like.def())
            .group_by(argu::Column::Id)
            .order_by_desc(Expr::col((like::Entity, like::Column::Id)).count()),
        ArguSort::Comments => query
            .join(
                JoinType::LeftJoin,
                argu::Relation::Comment.def().on_condition(|_left, right| {
                    Expr::col((right, comment::Column::IsHidden))
                        .eq(false)
                        .into_condition()
                }),
            )
            .group_by(argu::Column::Id)
            .order_by_desc(Expr::col((comment::Entity, comment::Column::Id)).count()),
    };
    query
        .order_by_desc(argu::Column::CreatedAt)
        .order_by_desc(argu::Column::Id)
}

pub(crate) async fn like_counts<C: ConnectionTrait>(
    db: &C,
    argu_ids: &[i32],
) -> AppResult<HashMap<i32, i64>> {
    if argu_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, i64)> = Like::find()
        .select_only()
        .column(like::Column::ArguId)
        .column_as(Expr::col(like::Column::Id).count(), "count")
        .filter(like::Column::ArguId.is_in(argu_ids.to_vec()))
        .group_by(like::Column::ArguId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

pub(crate) async fn visible_comment_counts<C: ConnectionTrait>(
    db: &C,
    argu_ids: &[i32],
) -> AppResult<HashMap<i32, i64>> {
    if argu_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, i64)> = Comment::find()
        .select_only()
        .column(comment::Column::ArguId)
        .column_as(Expr::col(comment::Column::Id).count(), "count")
        .filter(comment::Column::ArguId.is_in(argu_ids.to_vec()))
        .filter(comment::Column::IsHidden.eq(false))
        .group_by(comment::Column::ArguId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

async fn find_in<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<ArguModel> {
    Argu::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Argu"))
}

/// Applies resolved changes only while the debate is still SCHEDULED.
/// A debate that started after the caller was authorized is left as is.
pub async fn update_scheduled<C: ConnectionTrait>(
    db: &C,
    id: i32,
    resolved: ResolvedChanges,
    now: NaiveDateTime,
) -> AppResult<()> {
    write_changes(db, id, resolved, now, Some(ArguStatus::Scheduled)).await
}

async fn write_changes<C: ConnectionTrait>(
    db: &C,
    id: i32,
    resolved: ResolvedChanges,
    now: NaiveDateTime,
    required_status: Option<ArguStatus>,
) -> AppResult<()> {
    if let Some(category_id) = resolved.category_id {
        Category::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;
    }

    let mut active = argu::ActiveModel {
        start_date: Set(resolved.start_date),
        end_date: Set(resolved.end_date),
        updated_at: Set(now),
        ..Default::default()
    };
    if let Some(title) = resolved.title {
        active.title = Set(title);
    }
    if let Some(content) = resolved.content {
        active.content = Set(content);
    }
    if let Some(category_id) = resolved.category_id {
        active.category_id = Set(category_id);
    }

    let mut query = Argu::update_many()
        .set(active)
        .filter(argu::Column::Id.eq(id));
    if let Some(status) = required_status {
        query = query.filter(argu::Column::Status.eq(status));
    }

    if query.exec(db).await?.rows_affected == 0 {
        find_in(db, id).await?;
        return Err(lifecycle::already_started());
    }
    Ok(())
}

/// Deletes a debate and its children only while it is still SCHEDULED.
/// Runs in its own (nested) transaction so a rejected delete keeps the children.
pub async fn delete_scheduled<C: TransactionTrait>(db: &C, id: i32) -> AppResult<()> {
    let txn = db.begin().await?;
    delete_children(&txn, id).await?;

    let result = Argu::delete_many()
        .filter(argu::Column::Id.eq(id))
        .filter(argu::Column::Status.eq(ArguStatus::Scheduled))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        find_in(&txn, id).await?;
        return Err(lifecycle::already_started());
    }

    txn.commit().await?;
    Ok(())
}

async fn delete_children<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    ChatMessage::delete_many()
        .filter(chat_message::Column::ArguId.eq(id))
        .exec(db)
        .await?;
    Bookmark::delete_many()
        .filter(bookmark::Column::ArguId.eq(id))
        .exec(db)
        .await?;
    Like::delete_many()
        .filter(like::Column::ArguId.eq(id))
        .exec(db)
        .await?;
    Opinion::delete_many()
        .filter(opinion::Column::ArguId.eq(id))
        .exec(db)
        .await?;
    Comment::delete_many()
        .filter(comment::Column::ArguId.eq(id))
        .filter(comment::Column::ParentId.is_not_null())
        .exec(db)
        .await?;
    Comment::delete_many()
        .filter(comment::Column::ArguId.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys() {
        assert_eq!(ArguSort::parse(None), ArguSort::Latest);
        assert_eq!(ArguSort::parse(Some("popular")), ArguSort::Popular);
        assert_eq!(ArguSort::parse(Some("COMMENTS")), ArguSort::Comments);
        assert_eq!(ArguSort::parse(Some(" views ")), ArguSort::Views);
        assert_eq!(ArguSort::parse(Some("random")), ArguSort::Latest);
    }
}
