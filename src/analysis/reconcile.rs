//! Static/dynamic header reconciliation.
//!
//! Static findings are drawn from code and treated as ground truth; live
//! traffic only ever adds names the static scan missed. The result holds
//! at most one finding per case-insensitive name and is order-stable for
//! identical inputs.

use crate::analysis::header_scan::HeaderFinding;
use crate::capture::CapturedRequest;
use crate::profile;
use std::collections::HashSet;

/// Merge static findings with observed traffic into one inventory.
pub fn reconcile(
    static_findings: Vec<HeaderFinding>,
    requests: &[CapturedRequest],
) -> Vec<HeaderFinding> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut inventory: Vec<HeaderFinding> = Vec::new();

    for finding in static_findings {
        if seen.insert(finding.name.to_lowercase()) {
            inventory.push(finding);
        }
    }

    // Vendor headers sent on real requests.
    for req in requests {
        for name in req.headers.keys() {
            if !has_vendor_prefix(name) || !seen.insert(name.to_lowercase()) {
                continue;
            }
            inventory.push(HeaderFinding {
                name: name.clone(),
                description: format!("observed on {} {}", req.method, url_path(&req.url)),
            });
        }
    }

    // Vendor headers announced in CORS preflights. The browser lists the
    // intended custom headers in access-control-request-headers before the
    // real request is allowed, so this catches headers the capture window
    // never saw on an actual request.
    for req in requests {
        if !req.method.eq_ignore_ascii_case("OPTIONS") {
            continue;
        }
        let Some(listed) = header_value_ci(req, "access-control-request-headers") else {
            continue;
        };
        for segment in listed.split(',') {
            let name = segment.trim();
            if name.is_empty() || !has_vendor_prefix(name) || !seen.insert(name.to_lowercase()) {
                continue;
            }
            inventory.push(HeaderFinding {
                name: name.to_string(),
                description: format!("listed in preflight request for {}", url_path(&req.url)),
            });
        }
    }

    inventory
}

fn has_vendor_prefix(name: &str) -> bool {
    name.to_lowercase().starts_with(profile::VENDOR_HEADER_PREFIX)
}

fn header_value_ci<'a>(req: &'a CapturedRequest, name: &str) -> Option<&'a str> {
    req.headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Path component of a URL, or the whole string when it does not parse.
fn url_path(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}
