//! roster-gate: CLI server
//!
//! ```sh
//! # Run with default config (~/.config/roster-gate/config.toml)
//! roster-gate
//!
//! # Custom config path and port
//! roster-gate --config /etc/roster-gate/config.toml --port 8080
//!
//! # Validate config without starting
//! roster-gate --check
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use roster_gate::config::{AppConfig, ConfigError};
use roster_gate::server::{init_tracing, ServerHandle};

/// User directory and session login server.
#[derive(Parser, Debug)]
#[command(name = "roster-gate", version, about = "User directory with session login and role-gated routes")]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "ROSTER_GATE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,
}

/// Load the file, apply CLI overrides and validate the result.
///
/// A missing file yields the defaults. A file that fails to read, parse or
/// validate is an error; it never falls back to the built-in seed accounts.
fn resolve_config(cli: &Cli, path: &Path) -> Result<AppConfig, ConfigError> {
    let mut config = AppConfig::load(path)?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(roster_gate::default_config_path);

    let config = match resolve_config(&cli, &config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration is invalid: {}", e);
            eprintln!("   Config file : {}", config_path.display());
            std::process::exit(1);
        }
    };

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Log level   : {}", config.logging.level);
        println!("   Seed users  : {}", config.users.len());
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(config).await?;
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");
    handle.wait().await;

    Ok(())
}
