use crate::{
    error::{AppError, AppResult},
    models::{chat_message, user, Argu, ChatMessage, ChatMessageModel, User},
    services::lifecycle,
};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;

pub const MAX_MESSAGE_CHARS: usize = 1000;

#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub message: ChatMessageModel,
    pub nickname: Option<String>,
}

/// Per-debate chat. Polling based: clients pass the timestamp of the last
/// message they saw.
pub struct ChatService {
    db: DatabaseConnection,
}

impl ChatService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn post(
        &self,
        user_id: i32,
        argu_id: i32,
        message: &str,
        now: NaiveDateTime,
    ) -> AppResult<ChatEntry> {
        self.ensure_visible_argu(argu_id).await?;

        let message = message.trim();
        let len = message.chars().count();
        if len == 0 || len > MAX_MESSAGE_CHARS {
            return Err(AppError::validation(format!(
                "Message must be between 1 and {MAX_MESSAGE_CHARS} characters"
            )));
        }

        let created = chat_message::ActiveModel {
            argu_id: Set(argu_id),
            user_id: Set(user_id),
            message: Set(message.to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        let mut entries = self.with_nicknames(vec![created]).await?;
        entries
            .pop()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("chat message vanished")))
    }

    /// Newest first, paged.
    pub async fn recent(
        &self,
        argu_id: i32,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<ChatEntry>, u64)> {
        self.ensure_visible_argu(argu_id).await?;

        let paginator = ChatMessage::find()
            .filter(chat_message::Column::ArguId.eq(argu_id))
            .order_by_desc(chat_message::Column::CreatedAt)
            .order_by_desc(chat_message::Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page).await?;
        Ok((self.with_nicknames(rows).await?, total))
    }

    /// Messages strictly after `after`, oldest first, capped at `limit`.
    pub async fn since(
        &self,
        argu_id: i32,
        after: NaiveDateTime,
        limit: u64,
    ) -> AppResult<Vec<ChatEntry>> {
        self.ensure_visible_argu(argu_id).await?;

        let rows = ChatMessage::find()
            .filter(chat_message::Column::ArguId.eq(argu_id))
            .filter(chat_message::Column::CreatedAt.gt(after))
            .order_by_asc(chat_message::Column::CreatedAt)
            .order_by_asc(chat_message::Column::Id)
            .paginate(&self.db, limit)
            .fetch_page(0)
            .await?;
        self.with_nicknames(rows).await
    }

    async fn ensure_visible_argu(&self, argu_id: i32) -> AppResult<()> {
        let argu = Argu::find_by_id(argu_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Argu"))?;
        lifecycle::ensure_visible(&argu)
    }

    async fn with_nicknames(&self, rows: Vec<ChatMessageModel>) -> AppResult<Vec<ChatEntry>> {
        let user_ids: Vec<i32> = rows.iter().map(|m| m.user_id).collect();
        let nicknames: HashMap<i32, String> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            User::find()
                .filter(user::Column::Id.is_in(user_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|u| (u.id, u.nickname))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|m| ChatEntry {
                nickname: nicknames.get(&m.user_id).cloned(),
                message: m,
            })
            .collect())
    }
}
