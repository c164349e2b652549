//! In-memory host cache with TTL
//!
//! Caches host-to-tenant lookups to keep resolution off the database for
//! repeat requests. Negative results are cached too.

use hireboard_shared::{OrgId, Tenant};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Default cache TTL (5 minutes)
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache entry with expiration
#[derive(Clone)]
struct CacheEntry {
    tenant: Option<Tenant>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(tenant: Option<Tenant>, ttl: Duration) -> Self {
        Self {
            tenant,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe in-memory host cache
pub struct HostCache {
    /// Maps normalized host -> tenant (None means host resolves to no tenant)
    cache: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for HostCache {
    fn default() -> Self {
        Self::new()
    }
}

impl HostCache {
    /// Create a new cache with default TTL
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Create a new cache with custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Get the cached tenant for a host
    /// Returns Some(Some(tenant)) on a positive hit,
    /// Some(None) if the host was cached as not resolving,
    /// None if not in cache or expired
    pub fn get(&self, host: &str) -> Option<Option<Tenant>> {
        let cache = self.cache.read().ok()?;
        let entry = cache.get(host)?;

        if entry.is_expired() {
            None
        } else {
            Some(entry.tenant)
        }
    }

    /// Cache a host -> tenant mapping
    pub fn set(&self, host: &str, tenant: Option<Tenant>) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(host.to_string(), CacheEntry::new(tenant, self.ttl));
        }
    }

    /// Invalidate a specific host
    pub fn invalidate(&self, host: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(host);
        }
    }

    /// Invalidate all entries for an organization (registry writes call this
    /// so a freshly verified or removed domain is visible immediately)
    pub fn invalidate_org(&self, org_id: OrgId) {
        if let Ok(mut cache) = self.cache.write() {
            cache.retain(|_, entry| entry.tenant.map(|t| t.organization_id) != Some(org_id));
        }
    }

    /// Clear expired entries (call periodically for memory management)
    pub fn cleanup(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.retain(|_, entry| !entry.is_expired());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hireboard_shared::TenantSource;
    use std::thread::sleep;

    fn tenant(org: OrgId) -> Tenant {
        Tenant {
            organization_id: org,
            source: TenantSource::Subdomain,
        }
    }

    #[test]
    fn test_cache_get_set() {
        let cache = HostCache::new();
        let org = OrgId::new();

        assert!(cache.get("acme.hireboard.com").is_none());

        cache.set("acme.hireboard.com", Some(tenant(org)));
        assert_eq!(cache.get("acme.hireboard.com"), Some(Some(tenant(org))));
    }

    #[test]
    fn test_cache_negative() {
        let cache = HostCache::new();

        cache.set("unknown.example.com", None);
        assert_eq!(cache.get("unknown.example.com"), Some(None));
    }

    #[test]
    fn test_cache_expiration() {
        let cache = HostCache::with_ttl(Duration::from_millis(50));
        let org = OrgId::new();

        cache.set("acme.hireboard.com", Some(tenant(org)));
        assert_eq!(cache.get("acme.hireboard.com"), Some(Some(tenant(org))));

        sleep(Duration::from_millis(60));
        assert!(cache.get("acme.hireboard.com").is_none());
    }

    #[test]
    fn test_cache_invalidate() {
        let cache = HostCache::new();
        let org = OrgId::new();

        cache.set("acme.hireboard.com", Some(tenant(org)));
        cache.invalidate("acme.hireboard.com");
        assert!(cache.get("acme.hireboard.com").is_none());
    }

    #[test]
    fn test_cache_invalidate_org() {
        let cache = HostCache::new();
        let org = OrgId::new();
        let other_org = OrgId::new();

        cache.set("a.hireboard.com", Some(tenant(org)));
        cache.set("careers.acme.io", Some(tenant(org)));
        cache.set("c.hireboard.com", Some(tenant(other_org)));

        cache.invalidate_org(org);

        assert!(cache.get("a.hireboard.com").is_none());
        assert!(cache.get("careers.acme.io").is_none());
        assert_eq!(cache.get("c.hireboard.com"), Some(Some(tenant(other_org))));
    }
}
