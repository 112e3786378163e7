//! The single monitoring run.
//!
//! Fetch page → locate bundle → fetch bundle → change gate → static
//! extraction alongside dynamic capture → reconcile → redact → persist.
//! Fatal conditions abort before any persistence; capture and beautify
//! failures degrade at their boundary and never surface past it.

use crate::acquisition::http_client::HttpClient;
use crate::acquisition::locator;
use crate::analysis::change_gate::{self, GateDecision};
use crate::analysis::check_key;
use crate::analysis::header_scan;
use crate::analysis::reconcile;
use crate::analysis::redact;
use crate::archive::{Archive, LatestSnapshot, VersionRecord};
use crate::beautify;
use crate::capture::{CapturedRequest, TrafficCapturer};
use crate::config::Config;
use crate::error::{MonitorError, Result};
use crate::profile;
use chrono::Utc;
use tracing::{info, warn};

/// Fetch timeout for the page and bundle requests.
const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Outcome of one run.
#[derive(Debug)]
pub enum RunOutcome {
    /// Bundle content already recorded; nothing persisted.
    Unchanged { short_id: String },
    /// A new version was recorded.
    NewVersion {
        record: VersionRecord,
        /// On-disk filename of the bundle copy.
        asset_filename: String,
    },
}

/// Execute one complete monitoring run against the configured service.
pub async fn run(config: &Config, capturer: &dyn TrafficCapturer) -> Result<RunOutcome> {
    run_against(profile::HOSTING_PAGE_URL, config, capturer).await
}

/// Run against an explicit hosting page URL. Split out so integration
/// tests can point the pipeline at a local server.
pub async fn run_against(
    page_url: &str,
    config: &Config,
    capturer: &dyn TrafficCapturer,
) -> Result<RunOutcome> {
    let http = HttpClient::new(FETCH_TIMEOUT_MS);

    // Hosting page.
    let page = http
        .get(page_url)
        .await
        .map_err(|e| MonitorError::PageFetch {
            url: page_url.to_string(),
            reason: format!("{e:#}"),
        })?;
    if !page.is_success() {
        return Err(MonitorError::BadStatus {
            url: page_url.to_string(),
            status: page.status,
        });
    }

    // Bundle reference, then the bundle itself.
    let asset_ref = locator::locate_bundle(&page.body, &page.final_url).ok_or_else(|| {
        MonitorError::AssetNotReferenced {
            stem: profile::ASSET_STEM.to_string(),
            ext: profile::ASSET_EXT.to_string(),
        }
    })?;
    info!(url = %asset_ref.url, "located bundle");

    let asset = http
        .get(&asset_ref.url)
        .await
        .map_err(|e| MonitorError::AssetFetch {
            url: asset_ref.url.clone(),
            reason: format!("{e:#}"),
        })?;
    if !asset.is_success() {
        return Err(MonitorError::BadStatus {
            url: asset_ref.url.clone(),
            status: asset.status,
        });
    }

    // Gate on novelty before any extraction.
    let archive = Archive::open(&config.archive_dir).map_err(archive_err)?;
    let known = archive.known_version_names().map_err(archive_err)?;
    let captured_at = Utc::now();

    let (version_id, source_hash) =
        match change_gate::evaluate(asset.body.as_bytes(), &known, captured_at) {
            GateDecision::Unchanged { short_id } => {
                info!(%short_id, "bundle unchanged, nothing to record");
                return Ok(RunOutcome::Unchanged { short_id });
            }
            GateDecision::NewVersion {
                version_id,
                short_id,
                source_hash,
            } => {
                info!(%version_id, %short_id, "new bundle version");
                (version_id, source_hash)
            }
        };

    // Static extraction has no data dependency on dynamic capture; run
    // them side by side for wall-clock, not correctness.
    let source = asset.body.as_str();
    let (static_findings, requests) = tokio::join!(
        async { (check_key::extract_check_keys(source), header_scan::scan_headers(source)) },
        capturer.capture(config.token.as_deref()),
    );
    let (check_key_findings, static_headers) = static_findings;

    let header_inventory = reconcile::reconcile(static_headers, &requests);
    let redacted_requests: Vec<CapturedRequest> = requests
        .into_iter()
        .map(|req| CapturedRequest {
            headers: redact::redact_headers(&req.headers),
            ..req
        })
        .collect();

    let record = VersionRecord {
        version_id,
        captured_at,
        source_hash,
        original_filename: asset_ref.original_filename.clone(),
        check_key_findings,
        header_inventory,
        redacted_requests,
    };

    // The saved copy may be beautified; extraction above already ran on
    // the raw text.
    let copy_text = if config.beautify {
        match beautify::beautify_source(&asset.body) {
            Some(formatted) => formatted,
            None => {
                warn!("beautify failed, saving raw bundle copy");
                asset.body.clone()
            }
        }
    } else {
        asset.body.clone()
    };

    let asset_filename = archive
        .write_version(&record, &copy_text)
        .map_err(archive_err)?;
    archive
        .write_latest(&LatestSnapshot::from_record(&record, &asset_filename))
        .map_err(archive_err)?;

    info!(
        version_id = %record.version_id,
        check_keys = record.check_key_findings.len(),
        headers = record.header_inventory.len(),
        requests = record.redacted_requests.len(),
        "version recorded"
    );

    Ok(RunOutcome::NewVersion {
        record,
        asset_filename,
    })
}

fn archive_err(e: anyhow::Error) -> MonitorError {
    MonitorError::Archive(format!("{e:#}"))
}
