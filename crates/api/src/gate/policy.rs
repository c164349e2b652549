//! Redirect policy decisions
//!
//! Pure routing policy for the request gate, kept free of request plumbing
//! so the precedence rules can be pinned by unit tests.

/// Where unauthenticated callers are sent
pub const LOGIN_PATH: &str = "/login";
/// Where authenticated callers land
pub const LANDING_PATH: &str = "/dashboard";

/// Exact-match routes reachable without a session
const PUBLIC_ROUTES: &[&str] = &["/", "/login", "/signup", "/health", "/favicon.ico", "/robots.txt"];

/// Prefixes reachable without a session; auth callbacks short-circuit the
/// authenticated-entry redirect as well
const PUBLIC_PREFIXES: &[&str] = &["/assets/", "/auth/", "/api/public/", "/health/"];

/// Entry routes an authenticated caller is bounced away from
const ENTRY_ROUTES: &[&str] = &["/", "/login", "/signup"];

/// What the gate should do with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    Allow,
    RedirectToLogin,
    RedirectToLanding,
}

/// Decide the gate action for a request path.
///
/// Evaluated after tenant resolution and independent of it: tenant-scoped
/// and platform requests share one policy.
pub fn gate_action(path: &str, authenticated: bool) -> GateAction {
    // Auth callbacks and static assets bypass both checks
    if PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return GateAction::Allow;
    }

    if authenticated {
        if ENTRY_ROUTES.contains(&path) {
            return GateAction::RedirectToLanding;
        }
        return GateAction::Allow;
    }

    if PUBLIC_ROUTES.contains(&path) {
        return GateAction::Allow;
    }

    GateAction::RedirectToLogin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes_allowed_without_session() {
        for path in ["/", "/login", "/signup", "/health"] {
            assert_eq!(gate_action(path, false), GateAction::Allow, "{path}");
        }
    }

    #[test]
    fn test_public_prefixes_allowed_without_session() {
        assert_eq!(gate_action("/assets/app.css", false), GateAction::Allow);
        assert_eq!(gate_action("/auth/callback", false), GateAction::Allow);
        assert_eq!(gate_action("/api/public/jobs", false), GateAction::Allow);
    }

    #[test]
    fn test_unauthenticated_private_route_redirects_to_login() {
        assert_eq!(gate_action("/dashboard", false), GateAction::RedirectToLogin);
        assert_eq!(gate_action("/candidates/42", false), GateAction::RedirectToLogin);
        assert_eq!(gate_action("/api/domains", false), GateAction::RedirectToLogin);
    }

    #[test]
    fn test_authenticated_entry_routes_redirect_to_landing() {
        for path in ["/", "/login", "/signup"] {
            assert_eq!(gate_action(path, true), GateAction::RedirectToLanding, "{path}");
        }
    }

    #[test]
    fn test_authenticated_private_route_allowed() {
        assert_eq!(gate_action("/dashboard", true), GateAction::Allow);
        assert_eq!(gate_action("/candidates/42", true), GateAction::Allow);
    }

    #[test]
    fn test_auth_callback_short_circuits_both_checks() {
        assert_eq!(gate_action("/auth/callback", true), GateAction::Allow);
        assert_eq!(gate_action("/auth/callback", false), GateAction::Allow);
    }
}
