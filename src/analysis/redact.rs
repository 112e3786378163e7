//! Header value redaction.
//!
//! Two independent rules, either or both of which may match: an exact
//! list of known sensitive names (matched case-sensitively on the
//! canonical lowercase forms the client uses), and a case-insensitive
//! substring net over name fragments like "token". No raw value for a
//! matching header ever reaches the archive.

use crate::profile;
use std::collections::BTreeMap;

/// Return a redacted copy of the given header map. The input is not mutated.
pub fn redact_headers(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if is_sensitive(name) {
                profile::REDACTION_MARKER.to_string()
            } else {
                value.clone()
            };
            (name.clone(), value)
        })
        .collect()
}

fn is_sensitive(name: &str) -> bool {
    if profile::SENSITIVE_HEADERS.contains(&name) {
        return true;
    }
    let lower = name.to_lowercase();
    profile::SECRET_NAME_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn known_sensitive_names_are_redacted() {
        let input = headers(&[
            ("authorization", "Bearer abc"),
            ("cookie", "sid=1"),
            ("fansly-session-id", "s1"),
            ("fansly-client-check", "c1"),
        ]);
        let out = redact_headers(&input);
        for value in out.values() {
            assert_eq!(value, profile::REDACTION_MARKER);
        }
    }

    #[test]
    fn fragment_net_matches_any_case() {
        let input = headers(&[
            ("X-Api-Token", "t"),
            ("x-AUTH-user", "u"),
            ("Idempotency-Key", "k"),
            ("x-shared-SECRET", "s"),
        ]);
        let out = redact_headers(&input);
        for value in out.values() {
            assert_eq!(value, profile::REDACTION_MARKER);
        }
    }

    #[test]
    fn other_headers_pass_through_untouched() {
        let input = headers(&[("accept", "*/*"), ("fansly-client-ts", "1724751045")]);
        let out = redact_headers(&input);
        assert_eq!(out.get("accept").unwrap(), "*/*");
        assert_eq!(out.get("fansly-client-ts").unwrap(), "1724751045");
    }

    #[test]
    fn input_map_is_not_mutated() {
        let input = headers(&[("cookie", "sid=1")]);
        let _ = redact_headers(&input);
        assert_eq!(input.get("cookie").unwrap(), "sid=1");
    }
}
