//! Fixed profile of the monitored service.
//!
//! Every literal the pipeline depends on (URLs, filename shape, header
//! names) lives here so a change in the monitored client is a one-file
//! edit.

/// Hosting page that references the monitored bundle.
pub const HOSTING_PAGE_URL: &str = "https://fansly.com/";

/// API host whose traffic the dynamic capturer records.
pub const API_HOST: &str = "apiv3.fansly.com";

/// Filename stem of the monitored bundle (served as e.g. `main.93f1c29a.js`).
pub const ASSET_STEM: &str = "main";

/// Filename extension of the monitored bundle.
pub const ASSET_EXT: &str = ".js";

/// Prefix identifying the service's custom request headers.
pub const VENDOR_HEADER_PREFIX: &str = "fansly-";

/// Field name the bundle assigns the check-key to.
pub const CHECK_KEY_FIELD: &str = "checkKey_";

/// Known custom headers with their documented roles. Order matters: it is
/// the precedence order used when merging with dynamically observed headers.
pub const REFERENCE_HEADERS: &[(&str, &str)] = &[
    (
        "fansly-client-check",
        "client integrity check derived from the check-key recipe",
    ),
    ("fansly-client-id", "persistent client/device identifier"),
    (
        "fansly-client-ts",
        "client timestamp used for request signing",
    ),
    ("fansly-session-id", "active session identifier"),
];

/// Headers whose values are always redacted, matched on the canonical
/// lowercase names the client uses.
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "fansly-session-id",
    "fansly-client-check",
];

/// Name fragments that force redaction regardless of the exact header
/// (case-insensitive substring match).
pub const SECRET_NAME_FRAGMENTS: &[&str] = &["token", "auth", "key", "secret"];

/// Replacement value for redacted headers.
pub const REDACTION_MARKER: &str = "[redacted]";

/// Pages visited during dynamic capture, in order.
pub const CAPTURE_ROUTES: &[&str] = &[
    "https://fansly.com/",
    "https://fansly.com/explore",
    "https://fansly.com/messages",
];

/// localStorage key the client reads its session token from.
pub const TOKEN_STORAGE_KEY: &str = "session_active_session";
