//! Gateway services
//!
//! Each service has a single responsibility and receives its collaborators
//! through its constructor.

mod cache_sweeper;
mod resource_cache;
mod tenant_resolver;

pub use cache_sweeper::CacheSweeper;
pub use resource_cache::ResourceCache;
pub use tenant_resolver::TenantResolver;
