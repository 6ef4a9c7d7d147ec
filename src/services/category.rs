use crate::{
    error::{AppError, AppResult},
    models::{argu, category, Argu, Category, CategoryModel},
};
use chrono::NaiveDateTime;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub order_num: Option<i32>,
}

pub struct CategoryService {
    db: DatabaseConnection,
}

impl CategoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All categories by display order, each with its count of visible debates.
    pub async fn list_with_counts(&self) -> AppResult<Vec<(CategoryModel, u64)>> {
        let categories = Category::find()
            .order_by_asc(category::Column::OrderNum)
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;

        let counts: HashMap<i32, i64> = Argu::find()
            .select_only()
            .column(argu::Column::CategoryId)
            .column_as(Expr::col(argu::Column::Id).count(), "count")
            .filter(argu::Column::IsHidden.eq(false))
            .group_by(argu::Column::CategoryId)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        Ok(categories
            .into_iter()
            .map(|c| {
                let count = counts.get(&c.id).copied().unwrap_or(0).max(0) as u64;
                (c, count)
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<CategoryModel> {
        Category::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))
    }

    pub async fn get_with_count(&self, id: i32) -> AppResult<(CategoryModel, u64)> {
        let found = self.get_by_id(id).await?;
        let count = Argu::find()
            .filter(argu::Column::CategoryId.eq(id))
            .filter(argu::Column::IsHidden.eq(false))
            .count(&self.db)
            .await?;
        Ok((found, count))
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<String>,
        order_num: Option<i32>,
        now: NaiveDateTime,
    ) -> AppResult<CategoryModel> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Category name must not be empty"));
        }
        self.ensure_name_free(name, None).await?;

        let created = category::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            order_num: Set(order_num.unwrap_or(0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::on_duplicate(e, "Category name already exists"))?;

        tracing::info!(category_id = created.id, name = %created.name, "category created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i32,
        changes: CategoryChanges,
        now: NaiveDateTime,
    ) -> AppResult<CategoryModel> {
        let existing = self.get_by_id(id).await?;
        let mut active: category::ActiveModel = existing.clone().into();

        if let Some(name) = changes.name.as_deref().map(str::trim) {
            if name.is_empty() {
                return Err(AppError::validation("Category name must not be empty"));
            }
            if name != existing.name {
                self.ensure_name_free(name, Some(id)).await?;
                active.name = Set(name.to_string());
            }
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(order_num) = changes.order_num {
            active.order_num = Set(order_num);
        }
        active.updated_at = Set(now);

        active
            .update(&self.db)
            .await
            .map_err(|e| AppError::on_duplicate(e, "Category name already exists"))
    }

    /// Categories still referenced by debates cannot be removed.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get_by_id(id).await?;

        let in_use = Argu::find()
            .filter(argu::Column::CategoryId.eq(id))
            .count(&self.db)
            .await?;
        if in_use > 0 {
            return Err(AppError::validation(
                "Category still has argus and cannot be deleted",
            ));
        }

        Category::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i32>) -> AppResult<()> {
        let mut query = Category::find().filter(category::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(category::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            return Err(AppError::validation("Category name already exists"));
        }
        Ok(())
    }
}
