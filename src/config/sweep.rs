use super::{env_flag, env_parse};
use std::time::Duration;

/// Schedule of the debate status sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    pub enabled: bool,
    pub interval: Duration,
}

impl SweepConfig {
    pub fn from_env() -> Self {
        let seconds: u64 = env_parse("SWEEP_INTERVAL_SECONDS", 60);
        Self {
            enabled: env_flag("SWEEP_ENABLED", true),
            interval: Duration::from_secs(seconds.max(1)),
        }
    }
}
