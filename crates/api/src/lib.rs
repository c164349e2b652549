//! Hireboard API Library
//!
//! Tenancy core for the Hireboard recruiting platform: host-to-tenant
//! resolution, the domain/subdomain registry, custom domain verification
//! against the edge provider, and the per-request gate.

pub mod config;
pub mod error;
pub mod gate;
pub mod provider;
pub mod registry;
pub mod routes;
pub mod routing;
pub mod state;
pub mod verification;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routing::{AppHostResolver, HostCache, HostResolver};
pub use state::AppState;
