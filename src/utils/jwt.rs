use crate::config::jwt::JwtConfig;
use anyhow::{Context, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static JWT_CONFIG: OnceLock<JwtConfig> = OnceLock::new();

/// Initialize JWT config from environment. Must be called once at startup.
pub fn init_jwt_config(config: JwtConfig) -> Result<()> {
    JWT_CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("JWT config already initialized"))?;
    Ok(())
}

fn get_config() -> Result<&'static JwtConfig> {
    JWT_CONFIG
        .get()
        .context("JWT config not initialized, call init_jwt_config() at startup")
}

/// Which principal space a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    User,
    Admin,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // users.id or admins.id, depending on scope
    pub exp: usize,
    pub iat: usize,
    pub scope: TokenScope,
}

impl Claims {
    pub fn subject_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

pub fn encode_user_token(user_id: i32) -> Result<String> {
    let config = get_config()?;
    encode_token(user_id, TokenScope::User, config.user_token_expiry, config)
}

pub fn encode_admin_token(admin_id: i32) -> Result<String> {
    let config = get_config()?;
    encode_token(admin_id, TokenScope::Admin, config.admin_token_expiry, config)
}

fn encode_token(subject: i32, scope: TokenScope, ttl: u64, config: &JwtConfig) -> Result<String> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: subject.to_string(),
        exp: now + ttl as usize,
        iat: now,
        scope,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .context("Failed to encode token")
}

pub fn decode_jwt(token: &str) -> Result<Claims> {
    let config = get_config()?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .context("Failed to decode JWT")
}

/// Seconds until a freshly issued token of `scope` expires.
pub fn token_ttl(scope: TokenScope) -> Result<u64> {
    let config = get_config()?;
    Ok(match scope {
        TokenScope::User => config.user_token_expiry,
        TokenScope::Admin => config.admin_token_expiry,
    })
}
