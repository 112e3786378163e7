//! Static header discovery in bundle source.
//!
//! Two passes: a presence test for every known reference header, then a
//! generic scan for object-key string literals carrying the vendor
//! prefix. Reference matches come first; that order defines precedence
//! when the inventory is later reconciled with live traffic.

use crate::profile;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One discovered custom header with human-readable provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFinding {
    /// Header name, case preserved as discovered. Compared case-insensitively.
    pub name: String,
    pub description: String,
}

/// Description attached to headers found only by the generic scan.
pub const UNKNOWN_HEADER_DESC: &str = "undocumented header found in bundle source";

/// Scan bundle source for custom header names.
pub fn scan_headers(source: &str) -> Vec<HeaderFinding> {
    let lower = source.to_lowercase();
    let mut findings: Vec<HeaderFinding> = Vec::new();

    // Pass 1: known reference headers, in reference order.
    for (name, description) in profile::REFERENCE_HEADERS {
        if lower.contains(name) {
            findings.push(HeaderFinding {
                name: (*name).to_string(),
                description: (*description).to_string(),
            });
        }
    }

    // Pass 2: object-key string literals with the vendor prefix, e.g.
    // `"fansly-client-check": t` in a headers object.
    let key_re = Regex::new(r#"["']([A-Za-z0-9_-]+)["']\s*:"#).expect("valid regex");
    for caps in key_re.captures_iter(source) {
        let key = &caps[1];
        let key_lower = key.to_lowercase();
        if !key_lower.starts_with(profile::VENDOR_HEADER_PREFIX) {
            continue;
        }
        if findings.iter().any(|f| f.name.eq_ignore_ascii_case(key)) {
            continue;
        }
        findings.push(HeaderFinding {
            name: key.to_string(),
            description: UNKNOWN_HEADER_DESC.to_string(),
        });
    }

    findings
}
