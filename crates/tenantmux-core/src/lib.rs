//! # TenantMux Core Library
//!
//! Domain logic, entities, and business rules for TenantMux.
//!
//! ## Modules
//!
//! - `branding` - Centralized product constants
//! - `cache` - Generic expiring key-value store (`TtlCache`)
//! - `domain` - Core entities (Tenant, User, AnalyticsReport, NotificationMessage)
//! - `error` - Error taxonomy shared by every layer
//! - `feature_gate` - Per-tenant feature flag decisions
//! - `repository` - Data access traits

pub mod branding;
pub mod cache;
pub mod domain;
pub mod error;
pub mod feature_gate;
pub mod repository;

// Re-export commonly used types
pub use cache::{Sweep, TtlCache};
pub use domain::*;
pub use error::{TenantError, TenantResult};
pub use feature_gate::{features, FeatureGate};
pub use repository::*;
