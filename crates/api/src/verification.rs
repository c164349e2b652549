//! Custom domain verification orchestration
//!
//! Owns the pending -> attached -> verified lifecycle and the ordering rules
//! around the edge provider:
//! - attach and verify are distinct, admin-triggered operations (DNS
//!   propagation is unbounded; nothing here polls);
//! - a failed provider call leaves the registry status untouched so the
//!   admin can retry the same operation;
//! - removal detaches at the provider first and only deletes the local row
//!   on success, so the provider can never keep routing a domain the
//!   registry has forgotten.

use hireboard_shared::{CustomDomain, DomainStatus};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::provider::{EdgeClient, ProviderError};
use crate::registry::DomainRegistry;
use crate::routing::HostCache;

const RETRY_BASE_DELAY_MS: u64 = 250;
const RETRY_MAX_DELAY: Duration = Duration::from_secs(2);
/// Retries after the initial attempt; only transient failures are retried
const MAX_RETRIES: usize = 2;

/// Outcome of an attach operation
#[derive(Debug, Clone)]
pub struct AttachOutcome {
    pub domain: CustomDomain,
    /// Whether the provider already sees the routing DNS in place
    pub configured: bool,
}

/// Outcome of a verify operation
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub domain: CustomDomain,
    /// Whether the provider confirmed DNS ownership
    pub verified: bool,
}

/// Coordinates registry status transitions with the edge provider
#[derive(Clone)]
pub struct VerificationOrchestrator {
    registry: DomainRegistry,
    provider: EdgeClient,
    host_cache: Arc<HostCache>,
}

impl VerificationOrchestrator {
    pub fn new(registry: DomainRegistry, provider: EdgeClient, host_cache: Arc<HostCache>) -> Self {
        Self {
            registry,
            provider,
            host_cache,
        }
    }

    /// Attach a registered domain to the application at the edge provider.
    ///
    /// Idempotent: re-attaching an already-attached domain succeeds, and a
    /// verified domain is not demoted. Provider failure leaves the status
    /// untouched.
    pub async fn attach(&self, id: Uuid) -> ApiResult<AttachOutcome> {
        let domain = self.registry.get_domain(id).await?;

        let attachment = provider_call(|| self.provider.attach_domain(&domain.domain))
            .await
            .map_err(|e| ApiError::Provider(e.to_string()))?;

        let updated = match next_status_after_attach(domain.status) {
            Some(status) => self.registry.set_domain_status(id, status).await?,
            None => domain,
        };

        info!(domain = %updated.domain, "domain attached at edge provider");
        Ok(AttachOutcome {
            domain: updated,
            configured: attachment.configured,
        })
    }

    /// Ask the provider to confirm DNS for a domain.
    ///
    /// Explicitly admin-triggered after DNS is configured. A clean negative
    /// answer moves a pending/attached domain to `failed` (retryable); a
    /// provider call failure surfaces as ProviderError with the status
    /// untouched.
    pub async fn verify(&self, id: Uuid) -> ApiResult<VerifyOutcome> {
        let domain = self.registry.get_domain(id).await?;

        let check = provider_call(|| self.provider.check_domain(&domain.domain))
            .await
            .map_err(|e| ApiError::Provider(e.to_string()))?;

        let updated = match next_status_after_verify(domain.status, check.configured) {
            Some(status) => self.registry.set_domain_status(id, status).await?,
            None => domain,
        };

        if check.configured {
            info!(domain = %updated.domain, "domain verified");
            // A newly verified domain must become routable immediately
            self.invalidate_hosts(&updated.domain);
        } else {
            info!(domain = %updated.domain, "domain verification not confirmed by provider");
        }

        Ok(VerifyOutcome {
            domain: updated,
            verified: check.configured,
        })
    }

    /// Remove a domain: provider detach first, local delete only on success.
    pub async fn remove(&self, id: Uuid) -> ApiResult<CustomDomain> {
        let domain = self.registry.get_domain(id).await?;

        provider_call(|| self.provider.detach_domain(&domain.domain))
            .await
            .map_err(|e| ApiError::Provider(e.to_string()))?;

        let removed = self.registry.remove_domain(id).await?;
        self.invalidate_hosts(&removed.domain);
        info!(domain = %removed.domain, "domain removed");
        Ok(removed)
    }

    fn invalidate_hosts(&self, domain: &str) {
        self.host_cache.invalidate(domain);
        self.host_cache.invalidate(&format!("www.{domain}"));
    }
}

/// Status transition after a successful provider attach
fn next_status_after_attach(current: DomainStatus) -> Option<DomainStatus> {
    match current {
        DomainStatus::Pending | DomainStatus::Failed => Some(DomainStatus::Attached),
        DomainStatus::Attached | DomainStatus::Verified => None,
    }
}

/// Status transition after a provider verification answer
fn next_status_after_verify(current: DomainStatus, configured: bool) -> Option<DomainStatus> {
    if configured {
        (current != DomainStatus::Verified).then_some(DomainStatus::Verified)
    } else {
        match current {
            // Retryable negative result
            DomainStatus::Pending | DomainStatus::Attached => Some(DomainStatus::Failed),
            // A clean negative never demotes an already verified domain,
            // and failed stays failed
            DomainStatus::Verified | DomainStatus::Failed => None,
        }
    }
}

/// Run a provider call with bounded exponential backoff on transient
/// failures. Provider-side rejections are surfaced immediately. No lock is
/// held across the await.
async fn provider_call<T, Fut>(call: impl Fn() -> Fut) -> Result<T, ProviderError>
where
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let retry_strategy = ExponentialBackoff::from_millis(RETRY_BASE_DELAY_MS)
        .max_delay(RETRY_MAX_DELAY)
        .take(MAX_RETRIES)
        .map(jitter);

    Retry::spawn(retry_strategy, || async {
        let result = call().await;
        match &result {
            Ok(_) => Ok(result),
            Err(e) if e.is_transient() => {
                debug!(error = %e, "transient provider error - will retry");
                Err(result)
            }
            Err(e) => {
                debug!(error = %e, "permanent provider error - will not retry");
                Ok(result)
            }
        }
    })
    .await
    .unwrap_or_else(|e| e)
}
