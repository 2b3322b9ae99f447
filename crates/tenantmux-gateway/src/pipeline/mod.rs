//! Tenant request pipeline
//!
//! Order of checks for a tenant-scoped route:
//! 1. Read `x-tenant-id` (missing or unreadable → 400 `Tenant ID is required`)
//! 2. Resolve the tenant (unknown → 404, directory failure → 500)
//! 3. Check the route's required feature, if any (denied → 403)
//! 4. Run the handler with `ResolvedTenant` in the request extensions
//!
//! The middleware layers are attached with [`tenant_scoped`] and [`gated`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::sync::Arc;
use tenantmux_core::{branding::TENANT_HEADER, FeatureGate, Tenant, TenantError, TenantResult};
use tracing::debug;

use crate::error::ApiError;
use crate::services::TenantResolver;

/// Tenant attached to a request once the pipeline admits it
#[derive(Debug, Clone)]
pub struct ResolvedTenant {
    pub tenant: Arc<Tenant>,
    /// Header value as received (used for cache keys)
    pub raw_id: String,
}

impl<S> FromRequestParts<S> for ResolvedTenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<ResolvedTenant>().cloned().ok_or_else(|| {
            ApiError::from(TenantError::Internal(anyhow::anyhow!(
                "Route is missing the tenant pipeline"
            )))
        })
    }
}

/// Feature a route requires, used as middleware state
#[derive(Debug, Clone, Copy)]
pub struct RequiredFeature(pub &'static str);

/// Header parsing and tenant resolution for tenant-scoped requests
pub struct RequestPipeline {
    resolver: Arc<TenantResolver>,
}

impl RequestPipeline {
    pub fn new(resolver: Arc<TenantResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<TenantResolver> {
        &self.resolver
    }

    /// Tenant id from the request headers
    pub fn tenant_id_from_headers(headers: &HeaderMap) -> TenantResult<String> {
        headers
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(TenantError::tenant_id_required)
    }

    /// Run steps 1-2 for a request. Feature checks belong to [`require_feature`].
    pub async fn admit(&self, headers: &HeaderMap) -> TenantResult<ResolvedTenant> {
        let raw_id = Self::tenant_id_from_headers(headers)?;
        let tenant = self.resolver.resolve(&raw_id).await?;
        Ok(ResolvedTenant { tenant, raw_id })
    }
}

/// Middleware: resolve the tenant and store it in the request extensions
pub async fn resolve_tenant(
    State(pipeline): State<Arc<RequestPipeline>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let resolved = pipeline.admit(request.headers()).await?;
    debug!(tenant = resolved.tenant.id, "[Pipeline] Tenant resolved");
    request.extensions_mut().insert(resolved);
    Ok(next.run(request).await)
}

/// Middleware: reject requests whose tenant lacks the feature
pub async fn require_feature(
    State(RequiredFeature(feature)): State<RequiredFeature>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let resolved = request
        .extensions()
        .get::<ResolvedTenant>()
        .ok_or_else(|| {
            ApiError::from(TenantError::Internal(anyhow::anyhow!(
                "Feature gate '{}' used without the tenant pipeline",
                feature
            )))
        })?;
    FeatureGate::check(&resolved.tenant, feature)?;
    Ok(next.run(request).await)
}

/// Require a feature on every route of `router`.
///
/// Must sit inside [`tenant_scoped`].
pub fn gated<S>(router: Router<S>, feature: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(
        RequiredFeature(feature),
        require_feature,
    ))
}

/// Resolve the tenant for every route of `router`
pub fn tenant_scoped<S>(router: Router<S>, pipeline: Arc<RequestPipeline>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(pipeline, resolve_tenant))
}
