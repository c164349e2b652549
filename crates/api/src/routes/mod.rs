//! API routes

pub mod domains;
pub mod health;
pub mod subdomains;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{gate::request_gate, state::AppState};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Admin routes. Authorization lives with the auth collaborator upstream;
    // these trust the caller is an organization admin.
    let admin_routes = Router::new()
        .route("/orgs/:org_id/domains", get(domains::list_domains))
        .route("/orgs/:org_id/domains", post(domains::create_domain))
        .route("/domains/:domain_id", get(domains::get_domain))
        .route("/domains/:domain_id", delete(domains::delete_domain))
        .route("/domains/:domain_id/dns", get(domains::get_dns_instructions))
        .route("/domains/:domain_id/attach", post(domains::attach_domain))
        .route("/domains/:domain_id/verify", post(domains::verify_domain))
        .route("/orgs/:org_id/subdomains", get(subdomains::list_subdomains))
        .route("/orgs/:org_id/subdomains", post(subdomains::create_subdomain))
        .route("/subdomains/:subdomain_id", get(subdomains::get_subdomain))
        .route("/subdomains/:subdomain_id", delete(subdomains::delete_subdomain));

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), request_gate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
