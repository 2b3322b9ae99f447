//! Per-tenant feature flag decisions

use crate::domain::Tenant;
use crate::error::{TenantError, TenantResult};

/// Well-known feature names
pub mod features {
    pub const ANALYTICS: &str = "analytics";
    pub const USER_MANAGEMENT: &str = "userManagement";
    pub const CHAT: &str = "chat";
    pub const NOTIFICATIONS: &str = "notifications";
}

/// Pure decision function over a tenant's feature map
pub struct FeatureGate;

impl FeatureGate {
    /// True iff the flag is present and enabled. A missing key is `false`.
    pub fn allows(tenant: &Tenant, feature: &str) -> bool {
        tenant.feature(feature).unwrap_or(false)
    }

    /// Fail with `FeatureDisabled` when the tenant may not use `feature`
    pub fn check(tenant: &Tenant, feature: &str) -> TenantResult<()> {
        if Self::allows(tenant, feature) {
            Ok(())
        } else {
            Err(TenantError::feature_disabled(feature))
        }
    }
}
