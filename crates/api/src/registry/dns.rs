//! DNS instruction derivation
//!
//! Pure function of the stored domain, its verification token, and the
//! edge target: no state is read or written, and identical inputs always
//! produce identical records. Operators paste these into their DNS zone.

use serde::Serialize;

const DNS_TTL: u32 = 3600;

/// Prefix for the ownership-proof TXT record host
const VERIFY_RECORD_PREFIX: &str = "_hireboard-verify";

/// Prefix inside the TXT record value
const VERIFY_VALUE_PREFIX: &str = "hireboard-verify";

/// One DNS record an operator must configure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecord {
    pub record_type: String,
    pub name: String,
    pub value: String,
    pub ttl: u32,
}

/// The record pair proving ownership and routing traffic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsInstructions {
    /// Routing record pointing the domain at the application edge
    pub target: DnsRecord,
    /// Ownership-proof record carrying the verification token
    pub verification: DnsRecord,
}

/// Derive the DNS records for a custom domain.
pub fn dns_instructions(domain: &str, token: &str, edge_target: &str) -> DnsInstructions {
    DnsInstructions {
        target: DnsRecord {
            record_type: "CNAME".to_string(),
            name: domain.to_string(),
            value: edge_target.to_string(),
            ttl: DNS_TTL,
        },
        verification: DnsRecord {
            record_type: "TXT".to_string(),
            name: format!("{}.{}", VERIFY_RECORD_PREFIX, domain),
            value: format!("{}={}", VERIFY_VALUE_PREFIX, token),
            ttl: DNS_TTL,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructions_shape() {
        let instructions = dns_instructions("careers.acme.io", "tok123", "edge.hireboard.com");
        assert_eq!(instructions.target.record_type, "CNAME");
        assert_eq!(instructions.target.name, "careers.acme.io");
        assert_eq!(instructions.target.value, "edge.hireboard.com");
        assert_eq!(instructions.verification.record_type, "TXT");
        assert_eq!(instructions.verification.name, "_hireboard-verify.careers.acme.io");
        assert_eq!(instructions.verification.value, "hireboard-verify=tok123");
    }

    #[test]
    fn test_deterministic() {
        let a = dns_instructions("careers.acme.io", "tok123", "edge.hireboard.com");
        let b = dns_instructions("careers.acme.io", "tok123", "edge.hireboard.com");
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_changes_only_verification_value() {
        let a = dns_instructions("careers.acme.io", "tok123", "edge.hireboard.com");
        let b = dns_instructions("careers.acme.io", "tok456", "edge.hireboard.com");
        assert_eq!(a.target, b.target);
        assert_eq!(a.verification.name, b.verification.name);
        assert_ne!(a.verification.value, b.verification.value);
    }
}
