use crate::{
    error::{AppError, AppResult},
    models::{admin, Admin, AdminModel, AdminRole, AdminStatus},
    utils::{encode_admin_token, hash_password, verify_password},
};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub admin_id: String,
    pub password: String,
    pub name: String,
    pub role: Option<AdminRole>,
}

#[derive(Debug, Clone, Default)]
pub struct AdminChanges {
    pub name: Option<String>,
    pub role: Option<AdminRole>,
    pub status: Option<AdminStatus>,
}

/// Console accounts: sign-in and management.
pub struct AdminAccountService {
    db: DatabaseConnection,
}

impl AdminAccountService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns (admin_model, access_token). Unknown id, wrong password and
    /// inactive accounts are all Unauthorized.
    pub async fn login(&self, admin_id: &str, password: &str) -> AppResult<(AdminModel, String)> {
        let found = Admin::find()
            .filter(admin::Column::AdminId.eq(admin_id.trim()))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid admin id or password"))?;

        if !verify_password(password, &found.password_hash)? {
            tracing::warn!(admin = %found.admin_id, "admin login rejected: wrong password");
            return Err(AppError::unauthorized("Invalid admin id or password"));
        }

        if found.status != AdminStatus::Active {
            tracing::warn!(admin = %found.admin_id, "admin login rejected: inactive");
            return Err(AppError::unauthorized("Admin account is inactive"));
        }

        let token = encode_admin_token(found.id)?;
        tracing::info!(admin = %found.admin_id, "admin signed in");
        Ok((found, token))
    }

    pub async fn list(&self) -> AppResult<Vec<AdminModel>> {
        Ok(Admin::find()
            .order_by_asc(admin::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<AdminModel> {
        Admin::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Admin"))
    }

    pub async fn create(&self, input: NewAdmin, now: NaiveDateTime) -> AppResult<AdminModel> {
        let admin_id = input.admin_id.trim().to_string();
        let taken = Admin::find()
            .filter(admin::Column::AdminId.eq(admin_id.as_str()))
            .count(&self.db)
            .await?;
        if taken > 0 {
            return Err(AppError::validation("Admin id already exists"));
        }

        let password_hash = hash_password(&input.password)?;
        let created = admin::ActiveModel {
            admin_id: Set(admin_id),
            password_hash: Set(password_hash),
            name: Set(input.name.trim().to_string()),
            role: Set(input.role.unwrap_or_default()),
            status: Set(AdminStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::on_duplicate(e, "Admin id already exists"))?;

        tracing::info!(admin = %created.admin_id, role = ?created.role, "admin account created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i32,
        changes: AdminChanges,
        now: NaiveDateTime,
    ) -> AppResult<AdminModel> {
        let existing = self.get_by_id(id).await?;
        let mut active: admin::ActiveModel = existing.into();

        if let Some(name) = changes.name.as_deref().map(str::trim) {
            if !name.is_empty() {
                active.name = Set(name.to_string());
            }
        }
        if let Some(role) = changes.role {
            active.role = Set(role);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    pub async fn change_password(
        &self,
        id: i32,
        new_password: &str,
        now: NaiveDateTime,
    ) -> AppResult<()> {
        let existing = self.get_by_id(id).await?;
        let mut active: admin::ActiveModel = existing.into();
        active.password_hash = Set(hash_password(new_password)?);
        active.updated_at = Set(now);
        active.update(&self.db).await?;

        tracing::info!(admin_pk = id, "admin password changed");
        Ok(())
    }

    /// An admin cannot delete their own account.
    pub async fn delete(&self, id: i32, caller_id: i32) -> AppResult<()> {
        if id == caller_id {
            return Err(AppError::validation("You cannot delete your own account"));
        }
        self.get_by_id(id).await?;
        Admin::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(admin_pk = id, caller_id, "admin account deleted");
        Ok(())
    }
}
