//! Per-request entry point
//!
//! Resolves the Host header to a tenant, attaches it to request extensions,
//! and applies the redirect policy. Tenant resolution happens whether or not
//! the caller is authenticated; authentication state itself comes from the
//! upstream session collaborator as an [`AuthSession`] extension and is
//! never produced here.

mod policy;

pub use policy::{gate_action, GateAction, LANDING_PATH, LOGIN_PATH};

use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::state::AppState;

/// Caller identity supplied by the authentication collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: Uuid,
}

/// Gate middleware: tenant resolution, then redirect policy.
pub async fn request_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    // Request-scoped tenant context; downstream handlers read it from
    // extensions, never from shared mutable state
    if let Some(tenant) = state.resolver.resolve(host).await {
        request.extensions_mut().insert(tenant);
    }

    let authenticated = request.extensions().get::<AuthSession>().is_some();
    match gate_action(request.uri().path(), authenticated) {
        GateAction::Allow => next.run(request).await,
        GateAction::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
        GateAction::RedirectToLanding => Redirect::to(LANDING_PATH).into_response(),
    }
}
