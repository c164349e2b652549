//! Application configuration

use std::collections::HashSet;
use std::env;

/// Subdomain labels withheld from tenant allocation by default.
///
/// The effective set is this list merged with the RESERVED_SUBDOMAINS
/// environment variable, so deployments can extend it without a rebuild.
const DEFAULT_RESERVED_SUBDOMAINS: &[&str] = &[
    "api",
    "www",
    "admin",
    "mail",
    "app",
    "dashboard",
    "console",
    "portal",
    "docs",
    "help",
    "support",
    "status",
    "blog",
    "cdn",
    "static",
    "assets",
    "media",
    "careers",
    "jobs",
    "staging",
    "dev",
    "test",
    "demo",
];

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    /// Platform apex domain, e.g. "hireboard.com" for *.hireboard.com routing
    pub platform_domain: String,
    /// CNAME target tenants point their custom domains at
    pub edge_cname_target: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // Edge provider (domain attach / verify / detach)
    pub provider_api_url: String,
    pub provider_api_token: String,
    pub provider_app_name: String,
    pub provider_timeout_ms: u64,

    // Subdomain allocation
    pub reserved_subdomains: HashSet<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            platform_domain: env::var("PLATFORM_DOMAIN")
                .unwrap_or_else(|_| "localhost".to_string())
                .to_lowercase(),
            edge_cname_target: env::var("EDGE_CNAME_TARGET")
                .unwrap_or_else(|_| "edge.hireboard.com".to_string())
                .to_lowercase(),

            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Edge provider
            provider_api_url: env::var("PROVIDER_API_URL")
                .unwrap_or_else(|_| "https://api.fly.io/graphql".to_string()),
            provider_api_token: env::var("PROVIDER_API_TOKEN")
                .map_err(|_| ConfigError::Missing("PROVIDER_API_TOKEN"))?,
            provider_app_name: env::var("PROVIDER_APP_NAME")
                .map_err(|_| ConfigError::Missing("PROVIDER_APP_NAME"))?,
            provider_timeout_ms: env::var("PROVIDER_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap_or(10000),

            reserved_subdomains: reserved_subdomains_from_env(
                env::var("RESERVED_SUBDOMAINS").ok().as_deref(),
            ),
        })
    }
}

/// Build the effective reserved-word set: defaults plus any extras from the
/// environment, all lowercased.
fn reserved_subdomains_from_env(extra: Option<&str>) -> HashSet<String> {
    let mut set: HashSet<String> = DEFAULT_RESERVED_SUBDOMAINS
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    if let Some(extra) = extra {
        for word in extra.split(',') {
            let word = word.trim().to_lowercase();
            if !word.is_empty() {
                set.insert(word);
            }
        }
    }
    set
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reserved_words_present() {
        let set = reserved_subdomains_from_env(None);
        assert!(set.contains("www"));
        assert!(set.contains("api"));
        assert!(set.contains("careers"));
        assert!(!set.contains("acme"));
    }

    #[test]
    fn test_env_extends_reserved_words() {
        let set = reserved_subdomains_from_env(Some("Internal, beta ,,"));
        assert!(set.contains("internal"));
        assert!(set.contains("beta"));
        // Defaults survive the merge
        assert!(set.contains("admin"));
    }
}
