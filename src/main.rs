//! Vesuvio reservation service
//!
//! ```sh
//! # Run with default config (~/.config/vesuvio/config.toml)
//! vesuvio-service
//!
//! # Custom config path and port
//! vesuvio-service --config /etc/vesuvio/config.toml --port 9090
//!
//! # Validate config without starting
//! vesuvio-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use vesuvio::config::{AppConfig, CONFIG_ENV};
use vesuvio::server::{check_database, init_tracing, ServerHandle, ServerOptions};

/// Vesuvio: restaurant table reservations over HTTP/JSON.
#[derive(Parser, Debug)]
#[command(name = "vesuvio-service", version, about = "Restaurant reservation service")]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration, ping the database and exit.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the configured seed users.
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(vesuvio::default_config_path);
    let mut config = AppConfig::load_with_overrides(&config_path, |key| std::env::var(key).ok())
        .map_err(|e| format!("invalid configuration {}: {}", config_path.display(), e))?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    init_tracing(&config.logging);
    info!("Configuration loaded from {}", config_path.display());

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        check_database(&config.database_config()).await?;
        println!("✅ Configuration is valid, database reachable");
        println!("   Config file : {}", config_path.display());
        println!("{}", config.summary());
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        seed_users: !cli.no_seed,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;
    Ok(())
}
