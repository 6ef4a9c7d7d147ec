use super::env_flag;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitRule {
    const fn new(per_second: u64, burst_size: u32) -> Self {
        Self {
            per_second,
            burst_size,
        }
    }
}

/// Route groups that get their own limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGroup {
    Auth,
    Public,
    User,
    Admin,
}

impl RouteGroup {
    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "auth" | "login" => Some(Self::Auth),
            "public" | "public_read" | "public-read" => Some(Self::Public),
            "user" | "protected" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub auth: RateLimitRule,
    pub public: RateLimitRule,
    pub user: RateLimitRule,
    pub admin: RateLimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth: RateLimitRule::new(5, 10),
            public: RateLimitRule::new(30, 60),
            user: RateLimitRule::new(10, 20),
            admin: RateLimitRule::new(20, 40),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.enabled = env_flag("RATE_LIMIT_ENABLED", cfg.enabled);

        if let Ok(raw) = env::var("RATE_LIMIT_CONFIG") {
            match parse_overrides(&raw) {
                Ok(overrides) => {
                    for (group, rule) in overrides {
                        cfg.set(group, rule);
                    }
                }
                Err(err) => tracing::warn!("Ignoring RATE_LIMIT_CONFIG '{}': {}", raw, err),
            }
        }

        cfg
    }

    pub fn rule(&self, group: RouteGroup) -> RateLimitRule {
        match group {
            RouteGroup::Auth => self.auth,
            RouteGroup::Public => self.public,
            RouteGroup::User => self.user,
            RouteGroup::Admin => self.admin,
        }
    }

    fn set(&mut self, group: RouteGroup, rule: RateLimitRule) {
        match group {
            RouteGroup::Auth => self.auth = rule,
            RouteGroup::Public => self.public = rule,
            RouteGroup::User => self.user = rule,
            RouteGroup::Admin => self.admin = rule,
        }
    }
}

const ALL_GROUPS: [RouteGroup; 4] = [
    RouteGroup::Auth,
    RouteGroup::Public,
    RouteGroup::User,
    RouteGroup::Admin,
];

/// Accepts either a single `per:burst` applied to every group, or
/// `group=per:burst` pairs separated by commas.
fn parse_overrides(raw: &str) -> Result<Vec<(RouteGroup, RateLimitRule)>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty value".to_string());
    }

    if !trimmed.contains('=') {
        let rule = parse_rule(trimmed)?;
        return Ok(ALL_GROUPS.iter().map(|g| (*g, rule)).collect());
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (name, rule) = item
                .split_once('=')
                .ok_or_else(|| format!("invalid item '{}', expected group=per:burst", item))?;
            let group = RouteGroup::parse(name)
                .ok_or_else(|| format!("unknown group '{}'", name.trim()))?;
            Ok((group, parse_rule(rule.trim())?))
        })
        .collect()
}

fn parse_rule(raw: &str) -> Result<RateLimitRule, String> {
    let (per_second, burst) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid rule '{}', expected per:burst", raw))?;

    let per_second: u64 = per_second
        .trim()
        .parse()
        .map_err(|_| format!("invalid per_second '{}'", per_second.trim()))?;
    let burst_size: u32 = burst
        .trim()
        .parse()
        .map_err(|_| format!("invalid burst_size '{}'", burst.trim()))?;

    if per_second == 0 || burst_size == 0 {
        return Err("per_second and burst_size must be > 0".to_string());
    }

    Ok(RateLimitRule::new(per_second, burst_size))
}
