//! Check-key recipe extraction.
//!
//! The bundle constructs its check-key from literal fragments, and the
//! construction shape drifts between releases. Two shapes are known and
//! reconstructed exactly; every other assignment to the check-key field
//! is captured verbatim so a shape change is reported instead of
//! silently dropped. This is pattern matching over minified text, not
//! parsing; best effort by design.

use crate::profile;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Construction shape a finding was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKeyPattern {
    /// `["p1","p2"].reverse().join("-") + "p3"`
    ArrayReverse,
    /// three `.push("…")` calls joined with `"-"`
    Push,
    /// unrecognized right-hand side, captured verbatim
    Other,
}

/// One recovered check-key construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckKeyFinding {
    #[serde(rename = "kind")]
    pub pattern: CheckKeyPattern,
    /// Reconstructed key for the known shapes, raw expression text for `Other`.
    pub value: String,
}

/// Extract every check-key construction from bundle source.
///
/// Order is fixed: the ArrayReverse match first, then the Push match,
/// then all `Other` assignments in source order. No match of any shape
/// yields an empty list.
pub fn extract_check_keys(source: &str) -> Vec<CheckKeyFinding> {
    let mut findings = Vec::new();

    if let Some(value) = match_array_reverse(source) {
        findings.push(CheckKeyFinding {
            pattern: CheckKeyPattern::ArrayReverse,
            value,
        });
    }
    if let Some(value) = match_push(source) {
        findings.push(CheckKeyFinding {
            pattern: CheckKeyPattern::Push,
            value,
        });
    }
    findings.extend(match_other(source));

    findings
}

/// `checkKey_ = ["p1","p2"].reverse().join("-") + "p3"` → `p2-p1p3`.
///
/// The reversal is applied before the join, so the second literal leads,
/// hyphen-joined to the first, with the suffix appended directly.
fn match_array_reverse(source: &str) -> Option<String> {
    let re = Regex::new(&format!(
        r#"{field}\s*[:=]\s*\[\s*"([^"]+)"\s*,\s*"([^"]+)"\s*\]\s*\.\s*reverse\s*\(\s*\)\s*\.\s*join\s*\(\s*"-"\s*\)\s*\+\s*"([^"]+)""#,
        field = regex::escape(profile::CHECK_KEY_FIELD),
    ))
    .expect("valid regex");

    let caps = re.captures(source)?;
    Some(format!("{}-{}{}", &caps[2], &caps[1], &caps[3]))
}

/// Empty array, three pushes, then `checkKey_ = <ident>.join("-")` → `p1-p2-p3`.
///
/// The regex crate has no backreferences, so the pushed-to identifier is
/// matched loosely at each position; the three-push plus join-assignment
/// anchor keeps false positives implausible. Gaps between the pieces are
/// bounded so the match cannot straddle unrelated code.
fn match_push(source: &str) -> Option<String> {
    let re = Regex::new(&format!(
        r#"\w+\s*=\s*\[\s*\](?s:.){{0,120}}?\w+\.push\(\s*"([^"]+)"\s*\)(?s:.){{0,120}}?\w+\.push\(\s*"([^"]+)"\s*\)(?s:.){{0,120}}?\w+\.push\(\s*"([^"]+)"\s*\)(?s:.){{0,400}}?{field}\s*[:=]\s*\w+\s*\.\s*join\s*\(\s*"-"\s*\)"#,
        field = regex::escape(profile::CHECK_KEY_FIELD),
    ))
    .expect("valid regex");

    let caps = re.captures(source)?;
    Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
}

/// Every further check-key assignment whose right-hand side is not one of
/// the known shapes, captured verbatim (trimmed) in source order.
///
/// The known shapes are excluded by their leading syntax only: an RHS
/// starting with `[` (array literal) or matching `<ident>.join(`. A
/// textual guard against double-reporting, not a structural one.
fn match_other(source: &str) -> Vec<CheckKeyFinding> {
    let assign_re = Regex::new(&format!(
        r#"{field}\s*[:=]\s*([^;\n]+)"#,
        field = regex::escape(profile::CHECK_KEY_FIELD),
    ))
    .expect("valid regex");
    let join_call_re = Regex::new(r#"^\w+\s*\.\s*join\s*\("#).expect("valid regex");

    assign_re
        .captures_iter(source)
        .filter_map(|caps| {
            let rhs = caps[1].trim();
            if rhs.starts_with('[') || join_call_re.is_match(rhs) {
                return None;
            }
            Some(CheckKeyFinding {
                pattern: CheckKeyPattern::Other,
                value: rhs.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_reverse_reconstructs_reversed_join() {
        // (p1, p2, p3) = ("abc", "xyz", "-suffix") → "xyz-abc-suffix"
        let src = r#"e.checkKey_ = ["abc", "xyz"].reverse().join("-") + "-suffix";"#;
        let findings = extract_check_keys(src);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pattern, CheckKeyPattern::ArrayReverse);
        assert_eq!(findings[0].value, "xyz-abc-suffix");
    }

    #[test]
    fn array_reverse_matches_minified_form() {
        let src = r#"this.checkKey_=["p1","p2"].reverse().join("-")+"p3";"#;
        let findings = extract_check_keys(src);
        assert_eq!(findings[0].value, "p2-p1p3");
    }

    #[test]
    fn push_shape_preserves_order() {
        let src = r#"var n=[];n.push("a");n.push("b");n.push("c");this.checkKey_=n.join("-");"#;
        let findings = extract_check_keys(src);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pattern, CheckKeyPattern::Push);
        assert_eq!(findings[0].value, "a-b-c");
    }

    #[test]
    fn push_shape_survives_minified_noise_between_pieces() {
        let src = r#"let q=[],z=1;q.push("session");z++;q.push("client");q.push("ts");e.checkKey_=q.join("-");"#;
        let findings = extract_check_keys(src);
        assert_eq!(findings[0].value, "session-client-ts");
    }

    #[test]
    fn unknown_shape_is_captured_verbatim() {
        let src = r#"this.checkKey_ = window.deriveKey(seed, 3) ;"#;
        let findings = extract_check_keys(src);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pattern, CheckKeyPattern::Other);
        assert_eq!(findings[0].value, "window.deriveKey(seed, 3)");
    }

    #[test]
    fn known_shapes_are_not_double_reported_as_other() {
        let src = concat!(
            r#"a.checkKey_=["p1","p2"].reverse().join("-")+"p3";"#,
            r#"var n=[];n.push("x");n.push("y");n.push("z");b.checkKey_=n.join("-");"#,
            r#"c.checkKey_=mystery();"#,
        );
        let findings = extract_check_keys(src);
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[0].pattern, CheckKeyPattern::ArrayReverse);
        assert_eq!(findings[0].value, "p2-p1p3");
        assert_eq!(findings[1].pattern, CheckKeyPattern::Push);
        assert_eq!(findings[1].value, "x-y-z");
        assert_eq!(findings[2].pattern, CheckKeyPattern::Other);
        assert_eq!(findings[2].value, "mystery()");
    }

    #[test]
    fn all_other_matches_are_collected() {
        let src = "x.checkKey_=f();\ny.checkKey_=g();";
        let findings = extract_check_keys(src);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].value, "f()");
        assert_eq!(findings[1].value, "g()");
    }

    #[test]
    fn no_match_yields_empty_list() {
        assert!(extract_check_keys("console.log('nothing here')").is_empty());
    }

    #[test]
    fn object_literal_member_syntax_is_accepted() {
        let src = r#"{checkKey_:["one","two"].reverse().join("-")+"!"}"#;
        let findings = extract_check_keys(src);
        assert_eq!(findings[0].value, "two-one!");
    }
}
