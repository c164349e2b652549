//! Health and probe endpoints
//!
//! The registry database is the only dependency that gates readiness; the
//! edge provider is intentionally not probed here, since a provider outage
//! only blocks admin domain operations, not tenant traffic.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub registry: &'static str,
}

/// Health summary for infrastructure monitoring
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let registry_ok = registry_reachable(&state).await;
    let status = if registry_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if registry_ok { "ok" } else { "degraded" },
            service: "hireboard-api",
            version: env!("CARGO_PKG_VERSION"),
            registry: if registry_ok { "reachable" } else { "unreachable" },
        }),
    )
}

/// Liveness probe (just returns 200 if the server is running)
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: the service can route tenants only if the registry
/// database answers
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if registry_reachable(&state).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn registry_reachable(state: &AppState) -> bool {
    sqlx::query("SELECT 1").execute(&state.pool).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness_is_unconditional() {
        assert_eq!(liveness().await, StatusCode::OK);
    }
}
