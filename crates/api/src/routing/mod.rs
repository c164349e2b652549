//! Host-based tenant routing
//!
//! This module resolves incoming Host headers to organizations, enabling
//! tenant-scoped URLs like:
//! - Platform subdomains: acme.hireboard.com
//! - Custom domains: careers.acme.io

mod cache;
mod directory;
mod host_resolver;

pub use cache::HostCache;
pub use directory::{DirectoryError, PgDirectory, TenantDirectory};
pub use host_resolver::HostResolver;

/// The resolver wired to Postgres, as used by the running service
pub type AppHostResolver = HostResolver<PgDirectory>;
