//! Hireboard API server entry point

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hireboard_api::config::Config;
use hireboard_api::provider::EdgeClient;
use hireboard_api::registry::{DomainRegistry, ReservedWords};
use hireboard_api::routing::{HostCache, HostResolver, PgDirectory};
use hireboard_api::routes::create_router;
use hireboard_api::state::AppState;
use hireboard_api::verification::VerificationOrchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let pool = hireboard_shared::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("connecting to database")?;

    {
        let migration_pool = hireboard_shared::create_migration_pool(&config.database_url)
            .await
            .context("connecting for migrations")?;
        hireboard_shared::run_migrations(&migration_pool)
            .await
            .context("running migrations")?;
    }

    let host_cache = Arc::new(HostCache::new());
    let resolver = HostResolver::with_cache(
        PgDirectory::new(pool.clone()),
        config.platform_domain.clone(),
        host_cache.clone(),
    );
    let registry = DomainRegistry::new(
        pool.clone(),
        ReservedWords::new(config.reserved_subdomains.clone()),
    );
    let provider = EdgeClient::new(
        config.provider_api_url.clone(),
        config.provider_api_token.clone(),
        config.provider_app_name.clone(),
        Duration::from_millis(config.provider_timeout_ms),
    )
    .context("building provider client")?;
    let orchestrator =
        VerificationOrchestrator::new(registry.clone(), provider, host_cache.clone());

    let bind_address = config.bind_address.clone();
    let state = AppState {
        config: Arc::new(config),
        pool,
        resolver,
        registry,
        orchestrator,
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {bind_address}"))?;
    info!("hireboard-api listening on {bind_address}");
    axum::serve(listener, app).await.context("serving")?;

    Ok(())
}
