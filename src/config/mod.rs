pub mod database;
pub mod jwt;
pub mod rate_limit;
pub mod sweep;

use std::env;

/// Read a boolean flag such as `RATE_LIMIT_ENABLED=on`; unparsable values fall back to `default`.
pub fn env_flag(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .and_then(|value| parse_flag(&value))
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// Read a numeric setting, falling back to `default` when unset or malformed.
pub fn env_parse<T: std::str::FromStr>(var_name: &str, default: T) -> T {
    env::var(var_name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_spellings() {
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
