//! Domain and subdomain registry
//!
//! Persisted records of custom domains and subdomains per organization.
//! Format, reservation, and uniqueness invariants are enforced here at write
//! time; status transitions for custom domains belong to the verification
//! orchestrator.

mod dns;
mod validate;

pub use dns::{dns_instructions, DnsInstructions, DnsRecord};
pub use validate::{is_valid_fqdn, is_valid_subdomain_label, normalize, ReservedWords};

use hireboard_shared::{CustomDomain, DomainStatus, OrgId, Subdomain};
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

const DOMAIN_COLUMNS: &str =
    "id, organization_id, domain, status, verification_token, created_at, updated_at";
const SUBDOMAIN_COLUMNS: &str = "id, organization_id, subdomain, status, created_at";

/// Registry over the custom_domains and subdomains collections
#[derive(Clone)]
pub struct DomainRegistry {
    pool: PgPool,
    reserved: ReservedWords,
}

impl DomainRegistry {
    pub fn new(pool: PgPool, reserved: ReservedWords) -> Self {
        Self { pool, reserved }
    }

    /// List an organization's custom domains, newest first
    pub async fn list_domains(&self, org_id: OrgId) -> ApiResult<Vec<CustomDomain>> {
        let rows = sqlx::query_as::<_, CustomDomain>(&format!(
            "SELECT {DOMAIN_COLUMNS} FROM custom_domains \
             WHERE organization_id = $1 ORDER BY created_at DESC"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// List an organization's subdomains, newest first
    pub async fn list_subdomains(&self, org_id: OrgId) -> ApiResult<Vec<Subdomain>> {
        let rows = sqlx::query_as::<_, Subdomain>(&format!(
            "SELECT {SUBDOMAIN_COLUMNS} FROM subdomains \
             WHERE organization_id = $1 ORDER BY created_at DESC"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Register a custom domain for an organization.
    ///
    /// The row is written with status `pending` and a fresh verification
    /// token; attaching and verifying are separate orchestrator operations.
    /// Uniqueness is enforced by the unique index, not a pre-check, so two
    /// concurrent writers cannot both win: the loser's insert surfaces as
    /// [`ApiError::DuplicateDomain`].
    pub async fn add_domain(&self, org_id: OrgId, input: &str) -> ApiResult<CustomDomain> {
        let domain = normalize(input);
        if !is_valid_fqdn(&domain) {
            return Err(ApiError::Validation(
                "Invalid domain format. Enter a full domain like 'careers.yourcompany.com'"
                    .to_string(),
            ));
        }

        let token = generate_verification_token();
        let row = sqlx::query_as::<_, CustomDomain>(&format!(
            "INSERT INTO custom_domains (organization_id, domain, verification_token) \
             VALUES ($1, $2, $3) RETURNING {DOMAIN_COLUMNS}"
        ))
        .bind(org_id)
        .bind(&domain)
        .bind(&token)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Allocate a platform subdomain for an organization.
    ///
    /// Subdomains live under the platform apex, so there is nothing to
    /// verify externally: the row is active immediately.
    pub async fn add_subdomain(&self, org_id: OrgId, input: &str) -> ApiResult<Subdomain> {
        let label = normalize(input);
        if !is_valid_subdomain_label(&label) {
            return Err(ApiError::Validation(
                "Invalid subdomain. Use 3-63 lowercase letters, digits, or hyphens".to_string(),
            ));
        }
        if self.reserved.contains(&label) {
            return Err(ApiError::Validation(format!(
                "'{label}' is reserved and cannot be allocated"
            )));
        }

        let row = sqlx::query_as::<_, Subdomain>(&format!(
            "INSERT INTO subdomains (organization_id, subdomain) \
             VALUES ($1, $2) RETURNING {SUBDOMAIN_COLUMNS}"
        ))
        .bind(org_id)
        .bind(&label)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Fetch a custom domain by id
    pub async fn get_domain(&self, id: Uuid) -> ApiResult<CustomDomain> {
        let row = sqlx::query_as::<_, CustomDomain>(&format!(
            "SELECT {DOMAIN_COLUMNS} FROM custom_domains WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound)?;
        Ok(row)
    }

    /// Fetch a subdomain by id
    pub async fn get_subdomain(&self, id: Uuid) -> ApiResult<Subdomain> {
        let row = sqlx::query_as::<_, Subdomain>(&format!(
            "SELECT {SUBDOMAIN_COLUMNS} FROM subdomains WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound)?;
        Ok(row)
    }

    /// Move a custom domain to a new lifecycle status
    pub async fn set_domain_status(
        &self,
        id: Uuid,
        status: DomainStatus,
    ) -> ApiResult<CustomDomain> {
        let row = sqlx::query_as::<_, CustomDomain>(&format!(
            "UPDATE custom_domains SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {DOMAIN_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound)?;
        Ok(row)
    }

    /// Delete a custom domain row.
    ///
    /// Callers must have completed the provider-side detach first (the
    /// orchestrator owns that ordering); this is only the local delete.
    pub async fn remove_domain(&self, id: Uuid) -> ApiResult<CustomDomain> {
        let row = sqlx::query_as::<_, CustomDomain>(&format!(
            "DELETE FROM custom_domains WHERE id = $1 RETURNING {DOMAIN_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound)?;
        Ok(row)
    }

    /// Delete a subdomain row. No external teardown is required for
    /// subdomains, so this deletes directly.
    pub async fn remove_subdomain(&self, id: Uuid) -> ApiResult<Subdomain> {
        let row = sqlx::query_as::<_, Subdomain>(&format!(
            "DELETE FROM subdomains WHERE id = $1 RETURNING {SUBDOMAIN_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound)?;
        Ok(row)
    }
}

/// Generate an opaque verification token (32 chars, base36)
fn generate_verification_token() -> String {
    let mut rng = rand::thread_rng();
    (0..32)
        .map(|_| {
            let idx = rng.gen_range(0..36);
            if idx < 10 {
                (b'0' + idx) as char
            } else {
                (b'a' + idx - 10) as char
            }
        })
        .collect()
}
