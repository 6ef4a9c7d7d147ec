use crate::config::env_flag;
use crate::error::AppResult;
use crate::models::{admin, Admin, AdminRole, AdminStatus};
use crate::utils::hash_password;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, PaginatorTrait};
use std::env;

#[derive(Debug, Clone)]
pub struct BootstrapAdminConfig {
    pub admin_id: String,
    pub password: String,
    pub name: String,
}

impl BootstrapAdminConfig {
    pub fn from_env() -> Option<Self> {
        if !env_flag("BOOTSTRAP_ADMIN_ENABLED", false) {
            return None;
        }

        let (Ok(admin_id), Ok(password)) = (
            env::var("BOOTSTRAP_ADMIN_ID"),
            env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) else {
            tracing::warn!(
                "BOOTSTRAP_ADMIN_ENABLED is set but BOOTSTRAP_ADMIN_ID/BOOTSTRAP_ADMIN_PASSWORD are missing"
            );
            return None;
        };

        Some(Self {
            admin_id,
            password,
            name: env::var("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
        })
    }
}

/// Creates the first SUPER_ADMIN when the admins table is empty.
/// Returns whether an account was created.
pub async fn ensure_bootstrap_admin(
    db: &DatabaseConnection,
    cfg: Option<BootstrapAdminConfig>,
) -> AppResult<bool> {
    let Some(cfg) = cfg else {
        return Ok(false);
    };

    if Admin::find().count(db).await? > 0 {
        return Ok(false);
    }

    let now = chrono::Utc::now().naive_utc();
    let created = admin::ActiveModel {
        admin_id: Set(cfg.admin_id),
        password_hash: Set(hash_password(&cfg.password)?),
        name: Set(cfg.name),
        role: Set(AdminRole::SuperAdmin),
        status: Set(AdminStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(admin = %created.admin_id, "bootstrap super admin created");
    Ok(true)
}
