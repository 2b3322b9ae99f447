//! Error taxonomy for tenant-scoped operations
//!
//! Every failure on the request path is one of four kinds. The gateway maps
//! them onto HTTP status codes; nothing in the core retries.

use thiserror::Error;

/// Message returned when the tenant header is missing or unreadable
pub const TENANT_ID_REQUIRED: &str = "Tenant ID is required";

/// Errors produced while resolving and gating tenants
#[derive(Debug, Error)]
pub enum TenantError {
    /// Missing or malformed tenant id or request fields (client error)
    #[error("{0}")]
    Validation(String),

    /// The tenant id has no directory record
    #[error("Tenant not found")]
    NotFound,

    /// The tenant's feature map denies the requested feature
    #[error("{feature} not enabled for this tenant")]
    FeatureDisabled { feature: String },

    /// Unexpected failure in the directory, a provider, or a handler
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl TenantError {
    /// Validation error for an absent tenant identifier
    pub fn tenant_id_required() -> Self {
        Self::Validation(TENANT_ID_REQUIRED.to_string())
    }

    /// Validation error with a custom message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Feature-disabled error for the given feature name
    pub fn feature_disabled(feature: impl Into<String>) -> Self {
        Self::FeatureDisabled {
            feature: feature.into(),
        }
    }

    /// Stable, lowercase name of the error kind (for logs)
    pub fn kind(&self) -> &'static str {
        match self {
            TenantError::Validation(_) => "validation",
            TenantError::NotFound => "not_found",
            TenantError::FeatureDisabled { .. } => "feature_disabled",
            TenantError::Internal(_) => "internal",
        }
    }
}

/// Result alias for tenant-scoped operations
pub type TenantResult<T> = Result<T, TenantError>;
