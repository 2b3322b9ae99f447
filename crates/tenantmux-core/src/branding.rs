//! Centralized branding constants
//!
//! All product naming and well-known defaults come from this module.

use std::time::Duration;

/// Human-readable product name
pub const DISPLAY_NAME: &str = "TenantMux";

/// Identifier used for data directories
pub const APP_IDENTIFIER: &str = "tenantmux";

/// Prefix for rotated log files (e.g. `tenantmux.2026-01-22.log`)
pub const LOG_PREFIX: &str = "tenantmux";

/// Default port the gateway listens on
pub const DEFAULT_GATEWAY_PORT: u16 = 3001;

/// Request header carrying the tenant identifier
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Default time-to-live for tenant and resource caches
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TENANTMUX_";

/// Build a fully-qualified environment variable name (e.g. `TENANTMUX_HOST`)
pub fn env_var(name: &str) -> String {
    format!("{}{}", ENV_PREFIX, name)
}
