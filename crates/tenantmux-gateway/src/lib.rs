//! TenantMux Gateway
//!
//! Multi-tenant API gateway that provides:
//! - Tenant resolution from the `x-tenant-id` header with a TTL cache
//! - Feature-gated, cache-backed tenant resources (analytics, users)
//! - Tenant-scoped real-time notifications over WebSocket
//! - Request timing reported to a pluggable observability sink
//! - Dependency Injection for clean architecture

pub mod error;
pub mod logging;
pub mod notifications;
pub mod pipeline;
pub mod server;
pub mod services;

pub use error::ApiError;
pub use logging::{ObservabilitySink, RequestTiming, TracingSink};
pub use notifications::{ConnectionId, NotificationBus, NotificationSubscriber};
pub use pipeline::{RequestPipeline, RequiredFeature, ResolvedTenant};
pub use server::{
    DependenciesBuilder, GatewayConfig, GatewayDependencies, GatewayServer, ServiceContainer,
};
pub use services::{CacheSweeper, ResourceCache, TenantResolver};
