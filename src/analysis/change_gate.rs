//! Content-hash change gate.
//!
//! Decides whether freshly fetched bundle content is a new version. The
//! short identifier (first 8 hex chars of the SHA-256 digest) is matched
//! as a substring against previously recorded version names, so the
//! archive needs no separate hash index and may embed whatever metadata
//! it likes in filenames. Short-id collisions are accepted as negligible.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Length of the short identifier in hex characters.
const SHORT_ID_LEN: usize = 8;

/// Gate decision for one fetched content blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Content already recorded; the run ends successfully with no new version.
    Unchanged { short_id: String },
    /// New content, authorized under the given version id.
    NewVersion {
        version_id: String,
        short_id: String,
        source_hash: String,
    },
}

/// Lowercase hex SHA-256 of the given bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Evaluate content against the names of previously recorded versions.
pub fn evaluate(content: &[u8], known_names: &[String], captured_at: DateTime<Utc>) -> GateDecision {
    let source_hash = sha256_hex(content);
    let short_id = source_hash[..SHORT_ID_LEN].to_string();

    if known_names.iter().any(|name| name.contains(&short_id)) {
        return GateDecision::Unchanged { short_id };
    }

    let version_id = format!("{}_{short_id}", captured_at.format("%Y%m%d-%H%M%S"));
    GateDecision::NewVersion {
        version_id,
        short_id,
        source_hash,
    }
}
