//! Background eviction of idle sessions

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::SharedSessionManager;
use crate::config::SessionConfig;
use crate::support::ShutdownSignal;

/// Periodically evict sessions idle for longer than `idle_timeout_secs`.
/// The task ends when `shutdown` fires.
pub fn start_session_sweeper(
    sessions: SharedSessionManager,
    config: &SessionConfig,
    shutdown: ShutdownSignal,
) -> JoinHandle<()> {
    let idle_timeout = Duration::from_secs(config.idle_timeout_secs);
    let sweep_interval = Duration::from_secs(config.sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Session sweeper started (interval: {}s, idle timeout: {}s)",
            sweep_interval.as_secs(),
            idle_timeout.as_secs()
        );

        let mut interval = tokio::time::interval(sweep_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let evicted = sessions.evict_idle(idle_timeout);
                    if evicted > 0 {
                        debug!(evicted, remaining = sessions.session_count(), "Idle sessions evicted");
                    }
                }
                _ = shutdown.wait() => {
                    info!("Session sweeper shutting down");
                    break;
                }
            }
        }
    })
}
