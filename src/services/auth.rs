use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel, UserStatus},
    utils::{encode_user_token, hash_password, verify_password},
};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter,
};

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new user. Returns (user_model, access_token).
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
        now: NaiveDateTime,
    ) -> AppResult<(UserModel, String)> {
        let email = normalize_email(email);
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(AppError::validation("Nickname must not be empty"));
        }

        if self.email_taken(&email).await? {
            return Err(AppError::validation("Email is already registered"));
        }

        let password_hash = hash_password(password)?;

        let created = user::ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            nickname: Set(nickname.to_string()),
            profile_image: Set(None),
            bio: Set(None),
            status: Set(UserStatus::Active),
            email_verified: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::on_duplicate(e, "Email is already registered"))?;

        let token = encode_user_token(created.id)?;
        tracing::info!(user_id = created.id, "user registered");
        Ok((created, token))
    }

    /// Returns (user_model, access_token).
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(UserModel, String)> {
        let email = normalize_email(email);
        let found = User::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await?;

        let Some(found) = found else {
            tracing::warn!("login rejected: unknown email");
            return Err(AppError::unauthorized("Invalid email or password"));
        };

        if !verify_password(password, &found.password_hash)? {
            tracing::warn!(user_id = found.id, "login rejected: wrong password");
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        match found.status {
            UserStatus::Active => {}
            UserStatus::Suspended => {
                return Err(AppError::forbidden("Account is suspended"));
            }
            UserStatus::Deleted => {
                return Err(AppError::forbidden("Account has been deleted"));
            }
        }

        let token = encode_user_token(found.id)?;
        Ok((found, token))
    }

    async fn email_taken(&self, email: &str) -> AppResult<bool> {
        let count = User::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}
