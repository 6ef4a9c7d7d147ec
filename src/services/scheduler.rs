use crate::{config::sweep::SweepConfig, services::argu::ArguService};
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;

/// Spawns the periodic debate status sweep. Failures are logged and the
/// next tick tries again.
pub fn spawn_status_sweeper(db: DatabaseConnection, config: SweepConfig) -> Option<JoinHandle<()>> {
    if !config.enabled {
        tracing::info!("argu status sweep disabled");
        return None;
    }

    tracing::info!(interval_secs = config.interval.as_secs(), "argu status sweep scheduled");

    Some(tokio::spawn(async move {
        let service = ArguService::new(db);
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let now = chrono::Utc::now().naive_utc();
            match service.transition_sweep(now).await {
                Ok(report) if report.activated > 0 || report.ended > 0 => {
                    tracing::info!(
                        activated = report.activated,
                        ended = report.ended,
                        "argu status sweep applied"
                    );
                }
                Ok(_) => tracing::debug!("argu status sweep: nothing to do"),
                Err(e) => tracing::error!("argu status sweep failed: {e}"),
            }
        }
    }))
}
