//! Gateway Server
//!
//! HTTP server exposing the tenant API and the notification WebSocket.
//! Self-contained with dependency injection for clean architecture.

mod dependencies;
pub mod handlers;
pub mod logging_middleware;
mod service_container;

use handlers::AppState;

pub use dependencies::{DependenciesBuilder, GatewayDependencies};
pub use service_container::ServiceContainer;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tenantmux_core::branding::{self, env_var};
use tenantmux_core::features;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::notifications::ws::ws_handler;
use crate::pipeline::{gated, tenant_scoped};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),
}

/// Gateway server configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Lifetime of cached tenants and resources; also the sweep period
    pub cache_ttl: Duration,
    /// Enable CORS for browser access
    pub enable_cors: bool,
    /// Single allowed origin; any origin when `None`
    pub cors_origin: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: branding::DEFAULT_GATEWAY_PORT,
            cache_ttl: branding::DEFAULT_CACHE_TTL,
            enable_cors: true,
            cors_origin: None,
        }
    }
}

impl GatewayConfig {
    /// Defaults overridden by `PORT`, `TENANTMUX_HOST`,
    /// `TENANTMUX_CACHE_TTL_SECS` and `TENANTMUX_CORS_ORIGIN`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("[Gateway] Ignoring invalid PORT '{}'", port),
            }
        }
        if let Some(host) = lookup(&env_var("HOST")) {
            config.host = host;
        }
        if let Some(ttl) = lookup(&env_var("CACHE_TTL_SECS")) {
            match ttl.parse::<u64>() {
                Ok(secs) if secs > 0 => config.cache_ttl = Duration::from_secs(secs),
                _ => warn!("[Gateway] Ignoring invalid CACHE_TTL_SECS '{}'", ttl),
            }
        }
        if let Some(origin) = lookup(&env_var("CORS_ORIGIN")) {
            config.cors_origin = Some(origin).filter(|o| !o.is_empty() && o != "*");
        }

        config
    }

    /// Get the socket address
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }

    /// Base URL for this gateway
    pub fn base_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    fn cors_layer(&self) -> CorsLayer {
        let origin = match self.cors_origin.as_deref().map(HeaderValue::from_str) {
            Some(Ok(origin)) => AllowOrigin::exact(origin),
            Some(Err(_)) => {
                warn!("[Gateway] Invalid CORS origin, allowing any origin");
                AllowOrigin::from(Any)
            }
            None => AllowOrigin::from(Any),
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    }
}

/// TenantMux Gateway Server
///
/// Owns its services and their lifecycle. All external dependencies are
/// injected through the constructor.
pub struct GatewayServer {
    config: GatewayConfig,
    services: Arc<ServiceContainer>,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, dependencies: GatewayDependencies) -> Self {
        info!("[Gateway] Initializing with dependency injection...");
        let services = Arc::new(ServiceContainer::initialize(
            &dependencies,
            config.cache_ttl,
        ));
        info!("[Gateway] Services initialized successfully");

        Self { config, services }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn services(&self) -> Arc<ServiceContainer> {
        self.services.clone()
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        let state = AppState {
            services: self.services.clone(),
        };

        let tenant_routes = tenant_scoped(
            Router::new()
                .route("/api/tenant", get(handlers::get_tenant))
                .merge(gated(
                    Router::new().route("/api/analytics", get(handlers::get_analytics)),
                    features::ANALYTICS,
                ))
                .merge(gated(
                    Router::new().route("/api/users", get(handlers::get_users)),
                    features::USER_MANAGEMENT,
                )),
            self.services.pipeline.clone(),
        );

        let mut router = Router::new()
            .route("/healthz", get(handlers::healthz))
            .route("/api/notifications/send", post(handlers::send_notification))
            .route("/ws", get(ws_handler))
            .merge(tenant_routes)
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn_with_state(
                self.services.observability.clone(),
                logging_middleware::request_timing_middleware,
            ))
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            router = router.layer(self.config.cors_layer());
        }

        router
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    ///
    /// Starts the cache sweeper before accepting connections and stops it on exit.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        let sweeper = self.services.cache_sweeper.clone();
        sweeper.start();

        info!(
            "[Gateway] Ready on {} (CORS: {}, cache TTL: {:?})",
            listener.local_addr()?,
            if self.config.enable_cors { "enabled" } else { "disabled" },
            self.config.cache_ttl
        );

        let result = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        sweeper.stop().await;
        info!("[Gateway] Stopped");
        result.map_err(Into::into)
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.addr()?;
        info!("[Gateway] Starting on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Start the server in the background
    ///
    /// Returns a JoinHandle that can be used to wait for completion or abort.
    pub fn spawn(self) -> tokio::task::JoinHandle<anyhow::Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

fn panic_response(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    ApiError::from_panic(payload).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("[Gateway] Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("[Gateway] Shutdown requested");
}
