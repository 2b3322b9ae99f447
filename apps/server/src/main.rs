//! TenantMux gateway binary
//!
//! Configuration comes from the environment (and `.env` if present):
//! - `PORT`, `TENANTMUX_HOST`, `TENANTMUX_CACHE_TTL_SECS`, `TENANTMUX_CORS_ORIGIN`
//! - `TENANTMUX_DATABASE` - SQLite file (default: platform data dir)
//! - `TENANTMUX_LOG_DIR` - directory for daily log files (default: platform data dir)
//! - `RUST_LOG` - log filter

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tenantmux_core::branding::{self, env_var};
use tenantmux_gateway::{DependenciesBuilder, GatewayConfig, GatewayServer};
use tenantmux_storage::Database;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// Get the logs directory
fn get_logs_dir() -> PathBuf {
    std::env::var(env_var("LOG_DIR"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(branding::APP_IDENTIFIER)
                .join("logs")
        })
}

/// Initialize console and rotating file logging.
///
/// The returned guard must live until exit so buffered lines are flushed.
/// File logging is skipped if the log directory cannot be used.
fn init_tracing() -> Option<WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = EnvFilter::new("info");
        for directive in [
            "tenantmux_core=debug",
            "tenantmux_gateway=debug",
            "tenantmux_storage=debug",
            "tower_http=info",
        ] {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
        filter
    });

    // Console layer: colored, compact
    let console_layer = fmt::layer()
        .with_ansi(true)
        .compact()
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    // Creates files like: tenantmux.2026-01-22.log
    let logs_dir = get_logs_dir();
    let file_appender = std::fs::create_dir_all(&logs_dir)
        .map_err(|e| e.to_string())
        .and_then(|_| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(branding::LOG_PREFIX)
                .filename_suffix("log")
                .build(&logs_dir)
                .map_err(|e| e.to_string())
        });

    match file_appender {
        Ok(appender) => {
            let (non_blocking_file, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();
            warn!("File logging disabled ({}): {}", logs_dir.display(), e);
            None
        }
    }
}

fn database_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(env_var("DATABASE")) {
        return Ok(PathBuf::from(path));
    }
    tenantmux_storage::default_database_path()
        .ok_or_else(|| anyhow!("No data directory; set {}", env_var("DATABASE")))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _guard = init_tracing();

    info!("{} v{} starting", branding::DISPLAY_NAME, env!("CARGO_PKG_VERSION"));

    let db_path = database_path()?;
    let database = Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    info!("Using database {}", db_path.display());

    let dependencies = DependenciesBuilder::new()
        .with_database(Arc::new(Mutex::new(database)))
        .build()
        .map_err(|e| anyhow!(e))?;

    let config = GatewayConfig::from_env();
    info!("Gateway URL: {}", config.base_url());

    GatewayServer::new(config, dependencies).run().await
}
