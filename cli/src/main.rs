//! User directory CLI server.
//!
//! ```sh
//! # Run with default config (~/.config/user-directory/config.toml)
//! user-directory
//!
//! # Custom config path and port
//! user-directory --config /etc/user-directory/config.toml --port 8080
//!
//! # Seed 250 demo users into an empty table
//! user-directory --seed 250
//!
//! # Validate config without starting
//! user-directory --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use user_directory::config::{AppConfig, CONFIG_ENV_VAR};
use user_directory::server::{init_tracing, ServerHandle, ServerOptions};

/// Paginated user directory with an HTML page and a JSON API.
#[derive(Parser, Debug)]
#[command(
    name = "user-directory",
    version,
    about = "Paginated user directory server",
    long_about = "Serves a paginated user table at / and the same data as JSON at /users.\n\n\
                  Default config: ~/.config/user-directory/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV_VAR)]
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

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Insert N demo users when the user table is empty.
    #[arg(long, value_name = "N")]
    seed: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(user_directory::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) if cli.check => {
            error!("Invalid configuration in {}: {}", config_path.display(), e);
            return Err(e.into());
        }
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if let Some(count) = cli.seed {
        info!("CLI override: seed_demo_users = {}", count);
        config.database.seed_demo_users = count;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.check()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.listen_address());
        println!("   Storage     : {:?}", config.storage.backend);
        println!("   Database    : {}", config.database.url);
        println!(
            "   Pagination  : limit {} (max {}), window {}",
            config.pagination.default_limit,
            config.pagination.max_limit,
            config.pagination.window_size
        );
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
