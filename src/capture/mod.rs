//! Dynamic traffic capture behind a narrow trait seam.
//!
//! The browser is an external, failure-isolated collaborator: one
//! operation, observation only, and any failure degrades to an empty
//! capture set so the pipeline can proceed on static findings alone.

pub mod chromium;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One network request observed during capture. Immutable once captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedRequest {
    pub url: String,
    pub method: String,
    /// Header name → value. BTreeMap keeps downstream iteration order-stable.
    pub headers: BTreeMap<String, String>,
}

/// Captures API traffic for the monitored service.
#[async_trait]
pub trait TrafficCapturer: Send + Sync {
    /// Drive a browser session, optionally authenticated with `token`, and
    /// return every observed request to the monitored API host. Must never
    /// error: any failure yields an empty list.
    async fn capture(&self, token: Option<&str>) -> Vec<CapturedRequest>;
}

/// Capturer that observes nothing. Used by `--static-only` runs and tests.
pub struct NullCapturer;

#[async_trait]
impl TrafficCapturer for NullCapturer {
    async fn capture(&self, _token: Option<&str>) -> Vec<CapturedRequest> {
        Vec::new()
    }
}
