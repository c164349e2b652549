//! Registry read seam for host resolution
//!
//! `TenantDirectory` is the narrow read interface the resolver depends on.
//! Production uses [`PgDirectory`]; tests use an in-memory map so resolution
//! precedence can be pinned without a database. Both lookups are single
//! indexed queries on the unique domain/subdomain columns.

use hireboard_shared::OrgId;
use sqlx::PgPool;
use uuid::Uuid;

/// A registry read failed. The resolver never surfaces this to callers; it
/// resolves the request as "no tenant" instead.
#[derive(Debug, thiserror::Error)]
#[error("registry read failed: {0}")]
pub struct DirectoryError(pub String);

/// Read-only lookups the host resolver performs
pub trait TenantDirectory: Send + Sync {
    /// Organization owning an active subdomain label, if any
    fn active_subdomain_org(
        &self,
        label: &str,
    ) -> impl std::future::Future<Output = Result<Option<OrgId>, DirectoryError>> + Send;

    /// Organization owning a verified custom domain, if any.
    /// Pending, attached, and failed domains never match.
    fn verified_domain_org(
        &self,
        domain: &str,
    ) -> impl std::future::Future<Output = Result<Option<OrgId>, DirectoryError>> + Send;
}

/// Postgres-backed directory
#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrgRow {
    organization_id: Uuid,
}

impl TenantDirectory for PgDirectory {
    async fn active_subdomain_org(&self, label: &str) -> Result<Option<OrgId>, DirectoryError> {
        let result: Option<OrgRow> = sqlx::query_as(
            "SELECT organization_id FROM subdomains WHERE subdomain = $1 AND status = 'active'",
        )
        .bind(label)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError(e.to_string()))?;

        Ok(result.map(|row| OrgId(row.organization_id)))
    }

    async fn verified_domain_org(&self, domain: &str) -> Result<Option<OrgId>, DirectoryError> {
        let result: Option<OrgRow> = sqlx::query_as(
            "SELECT organization_id FROM custom_domains WHERE domain = $1 AND status = 'verified'",
        )
        .bind(domain)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError(e.to_string()))?;

        Ok(result.map(|row| OrgId(row.organization_id)))
    }
}
