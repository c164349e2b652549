//! Subdomain admin routes
//!
//! Subdomains live under the platform apex, so there is no verification
//! step: allocation succeeds or fails immediately. Authorization is enforced
//! by the caller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use hireboard_shared::{OrgId, Subdomain};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSubdomainRequest {
    /// Single label under the platform domain (e.g. "acme")
    pub subdomain: String,
}

#[derive(Debug, Serialize)]
pub struct ListSubdomainsResponse {
    pub subdomains: Vec<Subdomain>,
}

/// List all subdomains for an organization
pub async fn list_subdomains(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<ListSubdomainsResponse>, ApiError> {
    let subdomains = state.registry.list_subdomains(OrgId(org_id)).await?;
    Ok(Json(ListSubdomainsResponse { subdomains }))
}

/// Allocate a subdomain (active immediately)
pub async fn create_subdomain(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<CreateSubdomainRequest>,
) -> Result<(StatusCode, Json<Subdomain>), ApiError> {
    let subdomain = state
        .registry
        .add_subdomain(OrgId(org_id), &req.subdomain)
        .await?;

    // A negative cache entry from before the allocation must not mask it
    state.resolver.invalidate_host(&format!(
        "{}.{}",
        subdomain.subdomain, state.config.platform_domain
    ));

    Ok((StatusCode::CREATED, Json(subdomain)))
}

/// Get a subdomain by id
pub async fn get_subdomain(
    State(state): State<AppState>,
    Path(subdomain_id): Path<Uuid>,
) -> Result<Json<Subdomain>, ApiError> {
    let subdomain = state.registry.get_subdomain(subdomain_id).await?;
    Ok(Json(subdomain))
}

/// Remove a subdomain. Nothing to tear down externally; the platform's own
/// DNS wildcard covers all labels.
pub async fn delete_subdomain(
    State(state): State<AppState>,
    Path(subdomain_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let removed = state.registry.remove_subdomain(subdomain_id).await?;

    state.resolver.invalidate_host(&format!(
        "{}.{}",
        removed.subdomain, state.config.platform_domain
    ));

    Ok(StatusCode::NO_CONTENT)
}
