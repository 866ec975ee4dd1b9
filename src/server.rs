//! Reusable reservation service runtime.
//!
//! [`ServerHandle`] owns the full server lifecycle: database connection,
//! migrations, seed users, the REST API, metrics, and graceful shutdown.
//! The binary and the integration tests both start the service through it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::AuthService;
use crate::config::{AppConfig, LogFormat, LoggingConfig};
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::{
    init_database, redact_url, DatabaseConfig, SeaOrmRepositoryProvider,
};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Logging ────────────────────────────────────────────────────────

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level. Calling it twice is harmless.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match logging.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// The process-wide Prometheus handle. The global recorder can only be
/// installed once, so restarts within one process reuse it.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!(error = %e, "Metrics recorder unavailable, /metrics will be empty");
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

/// Open the configured database, run `SELECT 1` and close it again.
pub async fn check_database(config: &DatabaseConfig) -> Result<(), sea_orm::DbErr> {
    let db = init_database(config).await?;
    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    let result = db.execute(stmt).await;
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }
    result.map(|_| ())
}

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the reservation service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured seed users if missing (default: true).
    pub seed_users: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            seed_users: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running reservation service.
///
/// ```rust,no_run
/// use vesuvio::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the API is bound to (resolves port 0).
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the service.
    ///
    /// 1. Install the Prometheus recorder
    /// 2. Connect to the database and run migrations
    /// 3. Create seed users
    /// 4. Bind and serve the REST API (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting Vesuvio reservation service...");
        let prometheus = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db_config = app_cfg.database_config();
        info!("Database: {}", redact_url(&db_config.url));
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & Services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        if opts.seed_users && !app_cfg.seed.users.is_empty() {
            let auth = AuthService::new(repos.clone())
                .with_bcrypt_cost(app_cfg.security.bcrypt_cost);
            let created = auth.seed_users(&app_cfg.seed.users).await?;
            info!(created, configured = app_cfg.seed.users.len(), "Seed users checked");
        }

        let state = AppState::new(
            db.clone(),
            repos.clone(),
            prometheus,
            app_cfg.security.bcrypt_cost,
        );
        let api_router = create_api_router(state);

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Vesuvio started");

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Base URL for clients, e.g. `http://127.0.0.1:8080`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for shutdown to be triggered, give in-flight requests up to
    /// `server.shutdown_timeout` seconds, then close the database.
    pub async fn wait(self) {
        let api_task = self.api_task;
        let drained = self
            .shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!("REST API server task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("In-flight requests were cut off");
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Vesuvio shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down Vesuvio...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}
