//! Host-to-Tenant Resolution
//!
//! Resolves incoming Host headers to tenant organizations:
//! - Platform subdomains: acme.hireboard.com -> org lookup by subdomain label
//! - Custom domains: careers.acme.io -> org lookup via custom_domains
//!
//! Precedence is a fixed strategy sequence, evaluated in order:
//! platform-exact -> subdomain -> custom-domain -> www-fallback.
//! The first strategy that decides wins; later ones are never consulted.

use hireboard_shared::{Tenant, TenantSource};
use std::sync::Arc;
use tracing::warn;

use super::{DirectoryError, HostCache, TenantDirectory};

/// Host resolver with caching
///
/// Holds no mutable state across requests; every request re-resolves from
/// the registry (through the cache).
#[derive(Clone)]
pub struct HostResolver<D> {
    directory: D,
    cache: Arc<HostCache>,
    platform_domain: String,
}

impl<D: TenantDirectory> HostResolver<D> {
    /// Create a new host resolver
    pub fn new(directory: D, platform_domain: String) -> Self {
        Self {
            directory,
            cache: Arc::new(HostCache::new()),
            platform_domain: platform_domain.to_lowercase(),
        }
    }

    /// Create a new host resolver with a shared cache
    pub fn with_cache(directory: D, platform_domain: String, cache: Arc<HostCache>) -> Self {
        Self {
            directory,
            cache,
            platform_domain: platform_domain.to_lowercase(),
        }
    }

    /// Resolve a Host header to a tenant.
    ///
    /// Returns None for the platform's own hosts, for unknown hosts, and for
    /// domains that are not yet verified. A registry read failure also
    /// resolves to None: an unverified or unknown host must never claim a
    /// tenant, and a store hiccup must not 500 every request (fail closed).
    pub async fn resolve(&self, host: &str) -> Option<Tenant> {
        let host = normalize_host(host);

        // Strategy 1: the platform's own hosts are never tenant-scoped
        if is_platform_host(&host, &self.platform_domain) {
            return None;
        }

        if let Some(cached) = self.cache.get(&host) {
            return cached;
        }

        match self.resolve_uncached(&host).await {
            Ok(tenant) => {
                self.cache.set(&host, tenant);
                tenant
            }
            Err(err) => {
                // Fail closed; do not cache so the next request retries
                warn!(host = %host, error = %err, "host resolution failed, treating as no tenant");
                None
            }
        }
    }

    async fn resolve_uncached(&self, host: &str) -> Result<Option<Tenant>, DirectoryError> {
        // Strategy 2: subdomain of the platform apex
        let suffix = format!(".{}", self.platform_domain);
        if let Some(label) = host.strip_suffix(&suffix) {
            // Multi-level subdomains are unsupported
            if label.contains('.') {
                return Ok(None);
            }
            return Ok(self
                .directory
                .active_subdomain_org(label)
                .await?
                .map(|organization_id| Tenant {
                    organization_id,
                    source: TenantSource::Subdomain,
                }));
        }

        // Strategy 3: verified custom domain, exact match
        if let Some(organization_id) = self.directory.verified_domain_org(host).await? {
            return Ok(Some(Tenant {
                organization_id,
                source: TenantSource::CustomDomain,
            }));
        }

        // Strategy 4: retry with a leading www. stripped
        if let Some(bare) = host.strip_prefix("www.") {
            if let Some(organization_id) = self.directory.verified_domain_org(bare).await? {
                return Ok(Some(Tenant {
                    organization_id,
                    source: TenantSource::CustomDomain,
                }));
            }
        }

        Ok(None)
    }

    /// Invalidate cache for a specific host
    pub fn invalidate_host(&self, host: &str) {
        let host = normalize_host(host);
        self.cache.invalidate(&host);
    }

    /// Invalidate all cached entries for an organization
    pub fn invalidate_org(&self, org_id: hireboard_shared::OrgId) {
        self.cache.invalidate_org(org_id);
    }

    /// Get the host cache for management
    pub fn cache(&self) -> &HostCache {
        &self.cache
    }
}

/// Normalize a host header value
fn normalize_host(host: &str) -> String {
    // Remove port if present
    let host = host.split(':').next().unwrap_or(host);
    // Lowercase
    host.to_lowercase()
}

/// Check if this is one of the platform's own hosts
fn is_platform_host(host: &str, platform_domain: &str) -> bool {
    host == platform_domain || host == format!("www.{}", platform_domain) || host == "localhost"
}

#[cfg(test)]
mod tests {
    use super::*;
    use hireboard_shared::OrgId;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// In-memory directory for precedence tests
    #[derive(Default)]
    struct MapDirectory {
        subdomains: HashMap<String, OrgId>,
        verified_domains: HashMap<String, OrgId>,
        failing: AtomicBool,
    }

    impl TenantDirectory for &MapDirectory {
        async fn active_subdomain_org(&self, label: &str) -> Result<Option<OrgId>, DirectoryError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(DirectoryError("connection refused".into()));
            }
            Ok(self.subdomains.get(label).copied())
        }

        async fn verified_domain_org(&self, domain: &str) -> Result<Option<OrgId>, DirectoryError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(DirectoryError("connection refused".into()));
            }
            Ok(self.verified_domains.get(domain).copied())
        }
    }

    fn resolver(directory: &MapDirectory) -> HostResolver<&MapDirectory> {
        HostResolver::new(directory, "hireboard.com".to_string())
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("Example.COM"), "example.com");
        assert_eq!(normalize_host("example.com:8080"), "example.com");
        assert_eq!(normalize_host("EXAMPLE.COM:443"), "example.com");
    }

    #[test]
    fn test_is_platform_host() {
        assert!(is_platform_host("hireboard.com", "hireboard.com"));
        assert!(is_platform_host("www.hireboard.com", "hireboard.com"));
        assert!(is_platform_host("localhost", "hireboard.com"));
        assert!(!is_platform_host("acme.hireboard.com", "hireboard.com"));
        assert!(!is_platform_host("careers.acme.io", "hireboard.com"));
    }

    #[tokio::test]
    async fn test_platform_hosts_resolve_to_none() {
        let mut directory = MapDirectory::default();
        // Even a registered "www" label must not shadow the platform hosts
        directory.subdomains.insert("www".into(), OrgId::new());
        let resolver = resolver(&directory);

        assert_eq!(resolver.resolve("hireboard.com").await, None);
        assert_eq!(resolver.resolve("www.hireboard.com").await, None);
        assert_eq!(resolver.resolve("localhost").await, None);
        assert_eq!(resolver.resolve("HIREBOARD.COM:443").await, None);
    }

    #[tokio::test]
    async fn test_subdomain_resolution() {
        let org = OrgId::new();
        let mut directory = MapDirectory::default();
        directory.subdomains.insert("acme".into(), org);
        let resolver = resolver(&directory);

        assert_eq!(
            resolver.resolve("acme.hireboard.com").await,
            Some(Tenant {
                organization_id: org,
                source: TenantSource::Subdomain,
            })
        );
        assert_eq!(resolver.resolve("ACME.Hireboard.COM:8443").await.map(|t| t.organization_id), Some(org));
        assert_eq!(resolver.resolve("other.hireboard.com").await, None);
    }

    #[tokio::test]
    async fn test_nested_subdomain_is_unsupported() {
        let org = OrgId::new();
        let mut directory = MapDirectory::default();
        directory.subdomains.insert("acme".into(), org);
        let resolver = resolver(&directory);

        assert_eq!(resolver.resolve("extra.acme.hireboard.com").await, None);
    }

    #[tokio::test]
    async fn test_verified_custom_domain_resolution() {
        let org = OrgId::new();
        let mut directory = MapDirectory::default();
        directory.verified_domains.insert("careers.acme.io".into(), org);
        let resolver = resolver(&directory);

        assert_eq!(
            resolver.resolve("careers.acme.io").await,
            Some(Tenant {
                organization_id: org,
                source: TenantSource::CustomDomain,
            })
        );
        // Unregistered hosts miss
        assert_eq!(resolver.resolve("jobs.acme.io").await, None);
    }

    #[tokio::test]
    async fn test_unverified_domain_never_resolves() {
        // The fake directory only contains verified domains, mirroring the
        // SQL predicate; an absent (pending/failed) domain misses.
        let directory = MapDirectory::default();
        let resolver = resolver(&directory);
        assert_eq!(resolver.resolve("careers.acme.io").await, None);
    }

    #[tokio::test]
    async fn test_www_fallback() {
        let org = OrgId::new();
        let mut directory = MapDirectory::default();
        directory.verified_domains.insert("careers.acme.io".into(), org);
        let resolver = resolver(&directory);

        let tenant = resolver.resolve("www.careers.acme.io").await;
        assert_eq!(tenant.map(|t| t.organization_id), Some(org));
        assert_eq!(tenant.map(|t| t.source), Some(TenantSource::CustomDomain));
    }

    #[tokio::test]
    async fn test_www_form_registered_separately_wins() {
        let bare_org = OrgId::new();
        let www_org = OrgId::new();
        let mut directory = MapDirectory::default();
        directory.verified_domains.insert("careers.acme.io".into(), bare_org);
        directory
            .verified_domains
            .insert("www.careers.acme.io".into(), www_org);
        let resolver = resolver(&directory);

        assert_eq!(
            resolver.resolve("www.careers.acme.io").await.map(|t| t.organization_id),
            Some(www_org)
        );
    }

    #[tokio::test]
    async fn test_directory_failure_fails_closed() {
        let org = OrgId::new();
        let mut directory = MapDirectory::default();
        directory.verified_domains.insert("careers.acme.io".into(), org);
        directory.failing.store(true, Ordering::SeqCst);
        let resolver = resolver(&directory);

        assert_eq!(resolver.resolve("careers.acme.io").await, None);

        // Recovery: the failure was not cached
        directory.failing.store(false, Ordering::SeqCst);
        assert_eq!(
            resolver.resolve("careers.acme.io").await.map(|t| t.organization_id),
            Some(org)
        );
    }

    #[tokio::test]
    async fn test_cache_invalidation_after_registry_change() {
        let org = OrgId::new();
        let mut directory = MapDirectory::default();
        directory.verified_domains.insert("careers.acme.io".into(), org);
        let resolver = resolver(&directory);

        // Warm a negative entry before verification, then invalidate
        let cold = HostResolver::new(&directory, "hireboard.com".to_string());
        assert_eq!(cold.resolve("jobs.acme.io").await, None);
        cold.invalidate_host("jobs.acme.io");
        assert!(cold.cache().get("jobs.acme.io").is_none());

        // Positive entry evicted by org-wide invalidation
        assert!(resolver.resolve("careers.acme.io").await.is_some());
        resolver.invalidate_org(org);
        assert!(resolver.cache().get("careers.acme.io").is_none());
    }
}
