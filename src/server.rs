//! Server runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: storage init, migrations,
//! demo seeding, the HTTP server, metrics and graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::DirectoryService;
use crate::config::{AppConfig, StorageBackend};
use crate::domain::{RecordStore, User};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, DatabaseConfig, InMemoryUserStore, UserRepository};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::{PaginationPolicy, ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the directory server.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running directory server.
pub struct ServerHandle {
    pub config: AppConfig,
    /// Address the HTTP listener is bound to.
    pub local_addr: std::net::SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server.
    ///
    /// 1. Install the Prometheus recorder (once per process)
    /// 2. Open the configured store, migrating and seeding a database store
    /// 3. Bind the HTTP listener and serve the router until shutdown
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.check()?;

        info!("Starting user directory...");

        let prometheus = prometheus_handle();

        // ── Storage ────────────────────────────────────────────
        let (store, db): (Arc<dyn RecordStore<Record = User>>, Option<DatabaseConnection>) =
            match app_cfg.storage.backend {
                StorageBackend::Database => {
                    let db = init_database(&DatabaseConfig {
                        url: app_cfg.database.url.clone(),
                    })
                    .await?;

                    if opts.auto_migrate {
                        info!("Running database migrations...");
                        Migrator::up(&db, None).await?;
                        info!("Migrations completed");
                    }

                    let repo = UserRepository::new(db.clone());
                    let seeded = repo.seed_demo_users(app_cfg.database.seed_demo_users).await?;
                    if seeded > 0 {
                        info!("Seeded {} demo users", seeded);
                    }
                    let store: Arc<dyn RecordStore<Record = User>> = Arc::new(repo);
                    (store, Some(db))
                }
                StorageBackend::Memory => {
                    info!(
                        "Using in-memory store with {} demo users",
                        app_cfg.database.seed_demo_users
                    );
                    let store: Arc<dyn RecordStore<Record = User>> = Arc::new(
                        InMemoryUserStore::with_demo_users(app_cfg.database.seed_demo_users),
                    );
                    (store, None)
                }
            };

        // ── Directory service ──────────────────────────────────
        let policy = PaginationPolicy::from(&app_cfg.pagination);
        let directory = Arc::new(
            DirectoryService::new(store)
                .with_policy(policy)
                .with_projection(app_cfg.directory.projection())
                .with_store_timeout(app_cfg.directory.store_timeout()),
        );
        info!(
            default_limit = policy.default_limit,
            max_limit = policy.max_limit,
            window_size = policy.window_size,
            "Pagination configured"
        );

        // ── HTTP server ────────────────────────────────────────
        let router = create_api_router(AppState::new(directory, db.clone()), Some(prometheus));

        let listener = tokio::net::TcpListener::bind(app_cfg.listen_address()).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();
        let api_task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("HTTP server received shutdown signal");
            });
            if let Err(e) = server.await {
                error!("HTTP server error: {}", e);
            }
        });

        Ok(Self {
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let drained = shutdown
            .drain(async {
                if let Err(e) = api_task.await {
                    error!("HTTP server task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("Some requests were still in flight at shutdown");
        }

        if let Some(db) = db {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        }

        info!("User directory shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        self.shutdown.signal().trigger();
        self.wait().await;
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can only be installed once per process; later calls
/// (tests, restarts) reuse it or fall back to a detached recorder.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!("Prometheus recorder not installed: {}", e);
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

/// Initialize tracing from the logging config. `RUST_LOG` takes precedence.
///
/// Call once at process startup, before [`ServerHandle::start`]. A second
/// call leaves the first subscriber in place.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter(&config.logging.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if let Err(e) = installed {
        warn!("Tracing subscriber already installed: {}", e);
    }
}

/// A bare level keeps database driver chatter at `warn`; anything with a
/// `=` or `,` is taken as a full filter directive.
fn log_filter(level: &str) -> EnvFilter {
    let directive = if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{level},sqlx=warn,sea_orm=warn,sea_orm_migration=warn")
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageSettings;

    fn memory_config(users: u32) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 0;
        cfg.storage = StorageSettings {
            backend: StorageBackend::Memory,
        };
        cfg.database.seed_demo_users = users;
        cfg
    }

    #[tokio::test]
    async fn starts_and_stops_on_memory_backend() {
        let handle = ServerHandle::start(ServerOptions {
            config: memory_config(3),
            auto_migrate: false,
        })
        .await
        .unwrap();

        assert_ne!(handle.local_addr.port(), 0);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn starts_on_in_memory_sqlite() {
        let mut cfg = memory_config(12);
        cfg.storage.backend = StorageBackend::Database;
        cfg.database.url = "sqlite::memory:".to_string();

        let handle = ServerHandle::start(ServerOptions {
            config: cfg,
            auto_migrate: true,
        })
        .await
        .unwrap();

        handle.shutdown().await;
    }

    #[test]
    fn bare_level_quiets_database_crates() {
        let filter = log_filter("debug").to_string();
        assert!(filter.contains("sqlx=warn"));
        assert!(filter.contains("debug"));
    }

    #[test]
    fn full_directive_is_used_verbatim() {
        let filter = log_filter("user_directory=trace").to_string();
        assert!(filter.contains("user_directory=trace"));
        assert!(!filter.contains("sqlx"));
    }
}
