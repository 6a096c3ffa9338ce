//! Server runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: directory seeding, the session
//! manager and its idle sweeper, the HTTP listener and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::infrastructure::InMemoryUserDirectory;
use crate::interfaces::http::{create_router, AppState};
use crate::session::{create_session_manager, start_session_sweeper, SharedSessionManager};
use crate::support::ShutdownCoordinator;

/// Handle to a running server.
///
/// # Examples
///
/// ```rust,no_run
/// use roster_gate::config::AppConfig;
/// use roster_gate::server::ServerHandle;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(AppConfig::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// The directory instance every handler shares.
    pub directory: Arc<InMemoryUserDirectory>,
    pub sessions: SharedSessionManager,
    pub config: AppConfig,
    /// Address the listener is actually bound to.
    pub local_addr: SocketAddr,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
    sweeper_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Seed the directory, bind the listener and start serving.
    pub async fn start(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Starting roster-gate...");

        let directory = Arc::new(InMemoryUserDirectory::with_users(config.seed_users())?);
        info!(users = config.users.len(), "User directory seeded");

        let sessions = create_session_manager();
        let state = AppState::new(directory.clone(), sessions.clone(), config.session.clone());
        let router = create_router(state);

        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server listening on http://{}", local_addr);

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let signal = shutdown.signal();
        let sweeper_task = start_session_sweeper(sessions.clone(), &config.session, shutdown.signal());

        let api_task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    signal.wait().await;
                    info!("HTTP server received shutdown signal");
                })
                .await;
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
            }
        });

        Ok(Self {
            directory,
            sessions,
            config,
            local_addr,
            shutdown,
            api_task,
            sweeper_task,
        })
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait until the server task finishes, bounded by the shutdown timeout
    /// once shutdown has started.
    pub async fn wait(self) {
        let signal = self.shutdown.signal();
        let timeout = std::time::Duration::from_secs(self.shutdown.timeout_secs());
        let mut api_task = self.api_task;
        let sweeper_task = self.sweeper_task;

        let finished = tokio::select! {
            result = &mut api_task => Some(result),
            _ = signal.wait() => None,
        };

        let result = match finished {
            Some(result) => result,
            None => {
                info!("Waiting up to {}s for in-flight requests...", timeout.as_secs());
                match tokio::time::timeout(timeout, &mut api_task).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("Graceful shutdown timed out; aborting server task");
                        api_task.abort();
                        sweeper_task.abort();
                        return;
                    }
                }
            }
        };

        match result {
            Ok(()) => info!("HTTP server stopped"),
            Err(e) => error!("HTTP server task panicked: {}", e),
        }
        sweeper_task.abort();
        info!("roster-gate shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down roster-gate...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialise the global tracing subscriber from the logging config.
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ephemeral_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 2;
        config
    }

    #[tokio::test]
    async fn start_seeds_directory_and_shuts_down() {
        let handle = ServerHandle::start(ephemeral_config()).await.unwrap();
        assert_ne!(handle.local_addr.port(), 0);
        assert!(handle.is_running());

        use crate::domain::UserRepositoryInterface;
        assert_eq!(handle.directory.count().await.unwrap(), 2);

        tokio::time::timeout(std::time::Duration::from_secs(5), handle.shutdown())
            .await
            .expect("shutdown should complete");
    }

    #[tokio::test]
    async fn start_fails_on_duplicate_seed_emails() {
        let mut config = ephemeral_config();
        config.users[1].email = config.users[0].email.clone();
        assert!(ServerHandle::start(config).await.is_err());
    }
}
