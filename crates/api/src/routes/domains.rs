//! Custom domain admin routes
//!
//! Organization admins manage custom career-site domains here: register a
//! domain, fetch the DNS records to configure, attach it at the edge
//! provider, trigger verification, and remove it. Authorization is enforced
//! by the caller; these handlers trust they are already scoped to an
//! authorized organization admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use hireboard_shared::{CustomDomain, OrgId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::registry::{dns_instructions, DnsInstructions};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDomainRequest {
    /// The custom domain (e.g. "careers.acme.io")
    pub domain: String,
}

#[derive(Debug, Serialize)]
pub struct DomainResponse {
    #[serde(flatten)]
    pub domain: CustomDomain,
    /// DNS records the operator must configure
    pub dns_instructions: DnsInstructions,
}

#[derive(Debug, Serialize)]
pub struct ListDomainsResponse {
    pub domains: Vec<CustomDomain>,
}

#[derive(Debug, Serialize)]
pub struct AttachDomainResponse {
    #[serde(flatten)]
    pub domain: CustomDomain,
    /// Whether the provider already sees the routing DNS in place
    pub configured: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyDomainResponse {
    #[serde(flatten)]
    pub domain: CustomDomain,
    pub verified: bool,
    pub message: String,
}

/// List all custom domains for an organization
pub async fn list_domains(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<ListDomainsResponse>, ApiError> {
    let domains = state.registry.list_domains(OrgId(org_id)).await?;
    Ok(Json(ListDomainsResponse { domains }))
}

/// Register a new custom domain (status starts at `pending`)
pub async fn create_domain(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<CreateDomainRequest>,
) -> Result<(StatusCode, Json<DomainResponse>), ApiError> {
    let domain = state.registry.add_domain(OrgId(org_id), &req.domain).await?;
    Ok((StatusCode::CREATED, Json(with_instructions(&state, domain))))
}

/// Get a custom domain with its DNS instructions
pub async fn get_domain(
    State(state): State<AppState>,
    Path(domain_id): Path<Uuid>,
) -> Result<Json<DomainResponse>, ApiError> {
    let domain = state.registry.get_domain(domain_id).await?;
    Ok(Json(with_instructions(&state, domain)))
}

/// Fetch just the DNS record pair for a domain
pub async fn get_dns_instructions(
    State(state): State<AppState>,
    Path(domain_id): Path<Uuid>,
) -> Result<Json<DnsInstructions>, ApiError> {
    let domain = state.registry.get_domain(domain_id).await?;
    Ok(Json(dns_instructions(
        &domain.domain,
        &domain.verification_token,
        &state.config.edge_cname_target,
    )))
}

/// Attach a domain to the application at the edge provider
pub async fn attach_domain(
    State(state): State<AppState>,
    Path(domain_id): Path<Uuid>,
) -> Result<Json<AttachDomainResponse>, ApiError> {
    let outcome = state.orchestrator.attach(domain_id).await?;
    Ok(Json(AttachDomainResponse {
        domain: outcome.domain,
        configured: outcome.configured,
    }))
}

/// Trigger DNS verification for a domain
pub async fn verify_domain(
    State(state): State<AppState>,
    Path(domain_id): Path<Uuid>,
) -> Result<Json<VerifyDomainResponse>, ApiError> {
    let outcome = state.orchestrator.verify(domain_id).await?;
    let message = if outcome.verified {
        "Domain verified. Traffic will route to your career site.".to_string()
    } else {
        let records = dns_instructions(
            &outcome.domain.domain,
            &outcome.domain.verification_token,
            &state.config.edge_cname_target,
        );
        format!(
            "DNS not confirmed yet. Expected {} -> {} and {} with value {}",
            records.target.name, records.target.value,
            records.verification.name, records.verification.value,
        )
    };
    Ok(Json(VerifyDomainResponse {
        domain: outcome.domain,
        verified: outcome.verified,
        message,
    }))
}

/// Remove a custom domain (provider detach first; 502 on provider failure
/// with the record retained)
pub async fn delete_domain(
    State(state): State<AppState>,
    Path(domain_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.orchestrator.remove(domain_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn with_instructions(state: &AppState, domain: CustomDomain) -> DomainResponse {
    let dns = dns_instructions(
        &domain.domain,
        &domain.verification_token,
        &state.config.edge_cname_target,
    );
    DomainResponse {
        domain,
        dns_instructions: dns,
    }
}
