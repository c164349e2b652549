//! Common types used across Hireboard

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// ID Wrappers
// =============================================================================

/// Organization ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct OrgId(pub Uuid);

impl OrgId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrgId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrgId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Custom domain lifecycle status (stored as TEXT in PostgreSQL)
///
/// Only `verified` domains may route traffic. `attached` means the edge
/// provider accepted the domain but DNS ownership has not been confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    #[default]
    Pending,
    Attached,
    Verified,
    Failed,
}

impl DomainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainStatus::Pending => "pending",
            DomainStatus::Attached => "attached",
            DomainStatus::Verified => "verified",
            DomainStatus::Failed => "failed",
        }
    }
}

impl FromStr for DomainStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DomainStatus::Pending),
            "attached" => Ok(DomainStatus::Attached),
            "verified" => Ok(DomainStatus::Verified),
            "failed" => Ok(DomainStatus::Failed),
            _ => Ok(DomainStatus::Pending),
        }
    }
}

/// How a request host was matched to a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TenantSource {
    /// Matched a platform subdomain (e.g. acme.hireboard.com)
    Subdomain,
    /// Matched a verified custom domain (e.g. careers.acme.io)
    CustomDomain,
}

// =============================================================================
// Tenant context
// =============================================================================

/// A resolved tenant, attached to request extensions by the request gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub organization_id: OrgId,
    pub source: TenantSource,
}

// =============================================================================
// Registry rows
// =============================================================================

/// A tenant-owned custom domain requiring ownership verification
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomDomain {
    pub id: Uuid,
    pub organization_id: OrgId,
    /// Normalized lowercase FQDN, globally unique
    pub domain: String,
    #[sqlx(try_from = "String")]
    pub status: DomainStatus,
    /// Generated once at creation, immutable afterwards
    pub verification_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A single-label subdomain under the platform apex, active immediately
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subdomain {
    pub id: Uuid,
    pub organization_id: OrgId,
    /// Normalized lowercase label, globally unique
    pub subdomain: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TryFrom<String> for DomainStatus {
    type Error = std::convert::Infallible;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(s.parse().unwrap_or_default())
    }
}
