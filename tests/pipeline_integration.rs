//! End-to-end pipeline tests against a local HTTP server.
//!
//! Dynamic capture is replaced by in-process capturers so no browser is
//! involved; the HTTP fetch path runs against wiremock.

use argus_monitor::analysis::check_key::CheckKeyPattern;
use argus_monitor::capture::{CapturedRequest, NullCapturer, TrafficCapturer};
use argus_monitor::config::Config;
use argus_monitor::error::MonitorError;
use argus_monitor::pipeline::{run_against, RunOutcome};
use assert_json_diff::assert_json_include;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Capturer returning a fixed request list, standing in for the browser.
struct FixedCapturer {
    requests: Vec<CapturedRequest>,
}

#[async_trait]
impl TrafficCapturer for FixedCapturer {
    async fn capture(&self, _token: Option<&str>) -> Vec<CapturedRequest> {
        self.requests.clone()
    }
}

fn test_config(archive_dir: &Path) -> Config {
    Config {
        beautify: false,
        token: None,
        archive_dir: archive_dir.to_path_buf(),
        chromium_path: None,
    }
}

async fn serve_bundle(server: &MockServer, bundle_source: &str) {
    let html = r#"<html><head>
        <script src="/runtime.0a1b.js"></script>
        <script src="/main.93f1c29a.js"></script>
    </head><body></body></html>"#;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/main.93f1c29a.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(bundle_source))
        .mount(server)
        .await;
}

fn request(method: &str, url: &str, headers: &[(&str, &str)]) -> CapturedRequest {
    CapturedRequest {
        url: url.to_string(),
        method: method.to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

#[tokio::test]
async fn static_only_run_records_push_key_and_reference_header() {
    let server = MockServer::start().await;
    let bundle = concat!(
        r#"var q=[];q.push("session");q.push("client");q.push("ts");"#,
        r#"e.checkKey_=q.join("-");send("fansly-client-id",id);"#,
    );
    serve_bundle(&server, bundle).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let outcome = run_against(&server.uri(), &config, &NullCapturer)
        .await
        .unwrap();
    let RunOutcome::NewVersion {
        record,
        asset_filename,
    } = outcome
    else {
        panic!("expected a new version");
    };

    assert_eq!(record.original_filename, "main.93f1c29a.js");
    assert_eq!(record.check_key_findings.len(), 1);
    assert_eq!(record.check_key_findings[0].pattern, CheckKeyPattern::Push);
    assert_eq!(record.check_key_findings[0].value, "session-client-ts");

    assert_eq!(record.header_inventory.len(), 1);
    assert_eq!(record.header_inventory[0].name, "fansly-client-id");
    assert_eq!(
        record.header_inventory[0].description,
        "persistent client/device identifier"
    );
    assert!(record.redacted_requests.is_empty());

    // No requests were captured, so no authorization/cookie material can
    // appear anywhere in the persisted record.
    let serialized = serde_json::to_string(&record).unwrap();
    assert!(!serialized.contains("authorization"));
    assert!(!serialized.contains("cookie"));

    // Persisted artifacts: the bundle copy, the metadata record, the
    // rolling snapshot.
    assert!(dir.path().join("versions").join(&asset_filename).exists());
    let latest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("latest.json")).unwrap())
            .unwrap();
    assert_json_include!(
        actual: latest,
        expected: serde_json::json!({
            "version_id": record.version_id,
            "asset_filename": asset_filename,
            "source_hash": record.source_hash,
            "check_key_findings": [{"kind": "push", "value": "session-client-ts"}],
            "header_names": ["fansly-client-id"],
        })
    );
}

#[tokio::test]
async fn second_run_on_identical_content_is_a_no_op() {
    let server = MockServer::start().await;
    serve_bundle(&server, r#"e.checkKey_=["a","b"].reverse().join("-")+"c";"#).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let first = run_against(&server.uri(), &config, &NullCapturer)
        .await
        .unwrap();
    assert!(matches!(first, RunOutcome::NewVersion { .. }));

    let second = run_against(&server.uri(), &config, &NullCapturer)
        .await
        .unwrap();
    assert!(matches!(second, RunOutcome::Unchanged { .. }));

    // Still exactly one recorded version.
    let meta_count = std::fs::read_dir(dir.path().join("versions"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".meta.json"))
        .count();
    assert_eq!(meta_count, 1);
}

#[tokio::test]
async fn preflight_listing_adds_vendor_header_only() {
    let server = MockServer::start().await;
    // Bundle mentions no headers at all; the only source is the preflight.
    serve_bundle(&server, "console.log(1);").await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let capturer = FixedCapturer {
        requests: vec![request(
            "OPTIONS",
            "https://apiv3.fansly.com/api/v1/timeline",
            &[
                ("access-control-request-headers", "fansly-client-id, x-other"),
                ("authorization", "Bearer live-secret"),
            ],
        )],
    };

    let outcome = run_against(&server.uri(), &config, &capturer).await.unwrap();
    let RunOutcome::NewVersion { record, .. } = outcome else {
        panic!("expected a new version");
    };

    assert_eq!(record.header_inventory.len(), 1);
    assert_eq!(record.header_inventory[0].name, "fansly-client-id");
    assert_eq!(
        record.header_inventory[0].description,
        "listed in preflight request for /api/v1/timeline"
    );
    assert!(!record
        .header_inventory
        .iter()
        .any(|f| f.name.eq_ignore_ascii_case("x-other")));

    // The captured request is archived with its authorization value redacted.
    assert_eq!(record.redacted_requests.len(), 1);
    assert_eq!(
        record.redacted_requests[0].headers.get("authorization").unwrap(),
        "[redacted]"
    );
    let serialized = serde_json::to_string(&record).unwrap();
    assert!(!serialized.contains("live-secret"));
}

#[tokio::test]
async fn missing_bundle_reference_is_fatal_before_persistence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><script src=\"/vendor.js\"></script></html>"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let err = run_against(&server.uri(), &config, &NullCapturer)
        .await
        .unwrap_err();
    assert!(matches!(err, MonitorError::AssetNotReferenced { .. }));
    assert!(!dir.path().join("latest.json").exists());
}

#[tokio::test]
async fn beautify_toggle_formats_the_saved_copy_only() {
    let server = MockServer::start().await;
    let bundle = r#"var a=1;var b=2;x.checkKey_=derive();"#;
    serve_bundle(&server, bundle).await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.beautify = true;

    let outcome = run_against(&server.uri(), &config, &NullCapturer)
        .await
        .unwrap();
    let RunOutcome::NewVersion {
        record,
        asset_filename,
    } = outcome
    else {
        panic!("expected a new version");
    };

    // Extraction ran on the raw text regardless of the toggle.
    assert_eq!(record.check_key_findings[0].value, "derive()");

    let copy =
        std::fs::read_to_string(dir.path().join("versions").join(&asset_filename)).unwrap();
    assert!(copy.lines().count() > 1);
    assert!(copy.contains("var a=1;\n"));
}
