//! Shared application state

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::registry::DomainRegistry;
use crate::routing::AppHostResolver;
use crate::verification::VerificationOrchestrator;

/// State shared across handlers and middleware.
///
/// Everything here is either immutable or internally synchronized; requests
/// never mutate shared state directly.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: PgPool,
    pub resolver: AppHostResolver,
    pub registry: DomainRegistry,
    pub orchestrator: VerificationOrchestrator,
}
