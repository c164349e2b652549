//! Format validation for domains and subdomain labels
//!
//! All checks run against normalized (trimmed, lowercased) input, before any
//! database write or provider call.

use std::collections::HashSet;

/// Injected set of subdomain labels withheld from tenant allocation
#[derive(Debug, Clone)]
pub struct ReservedWords(HashSet<String>);

impl ReservedWords {
    pub fn new(words: HashSet<String>) -> Self {
        Self(words)
    }

    /// Check a normalized label against the set
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }
}

/// Normalize user input for storage and comparison
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Validate an FQDN: at most 253 chars, at least two labels, each label
/// 1-63 chars of [a-z0-9-] with no leading or trailing hyphen.
pub fn is_valid_fqdn(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    parts.iter().all(|part| is_valid_label_chars(part, 1))
}

/// Validate a single subdomain label: 3-63 chars of [a-z0-9-] with no
/// leading or trailing hyphen and no embedded dots.
pub fn is_valid_subdomain_label(label: &str) -> bool {
    is_valid_label_chars(label, 3)
}

fn is_valid_label_chars(part: &str, min_len: usize) -> bool {
    if part.len() < min_len || part.len() > 63 {
        return false;
    }
    if part.starts_with('-') || part.ends_with('-') {
        return false;
    }
    part.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
