use super::env_parse;
use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub user_token_expiry: u64,  // 24 hours
    pub admin_token_expiry: u64, // 8 hours
}

impl JwtConfig {
    pub fn from_env() -> Result<Self> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable must be set"))?;

        if secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters"
            ));
        }

        Ok(Self {
            secret,
            user_token_expiry: env_parse("JWT_EXPIRATION", 86_400),
            admin_token_expiry: env_parse("ADMIN_JWT_EXPIRATION", 28_800),
        })
    }
}
