//! Analytics summary served by `GET /api/analytics`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{TenantId, User};

/// Per-tenant usage summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub tenant_id: TenantId,
    pub total_users: usize,
    pub active_users: usize,
    /// Role name -> user count
    pub users_by_role: BTreeMap<String, usize>,
    pub generated_at: DateTime<Utc>,
}

impl AnalyticsReport {
    /// Summarize a tenant's user list
    pub fn from_users(tenant_id: TenantId, users: &[User]) -> Self {
        let mut users_by_role = BTreeMap::new();
        for user in users {
            *users_by_role
                .entry(user.role.as_str().to_string())
                .or_insert(0) += 1;
        }

        Self {
            tenant_id,
            total_users: users.len(),
            active_users: users.iter().filter(|u| u.active).count(),
            users_by_role,
            generated_at: Utc::now(),
        }
    }
}
