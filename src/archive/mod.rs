//! Versioned findings archive on the filesystem.
//!
//! Layout under the archive root:
//! - `versions/<version_id>_<original_filename>` — bundle copy
//! - `versions/<version_id>.meta.json` — full VersionRecord
//! - `latest.json` — rolling snapshot, overwritten each new version
//!
//! Version records are append-only: later versions supersede, never
//! delete. The change gate matches its short hash id against the
//! filenames in `versions/`, so no separate hash index exists.

use crate::analysis::check_key::CheckKeyFinding;
use crate::analysis::header_scan::HeaderFinding;
use crate::capture::CapturedRequest;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything recorded about one observed bundle version. Immutable once
/// written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version_id: String,
    pub captured_at: DateTime<Utc>,
    /// Full SHA-256 hex digest of the raw bundle.
    pub source_hash: String,
    /// Filename as served, e.g. `main.93f1c29a.js`.
    pub original_filename: String,
    pub check_key_findings: Vec<CheckKeyFinding>,
    pub header_inventory: Vec<HeaderFinding>,
    /// Captured requests, header values already redacted.
    pub redacted_requests: Vec<CapturedRequest>,
}

/// Rolling projection of the most recent version: names only, no
/// descriptions, no requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestSnapshot {
    pub version_id: String,
    pub captured_at: DateTime<Utc>,
    /// On-disk filename of the versioned bundle copy.
    pub asset_filename: String,
    pub source_hash: String,
    pub check_key_findings: Vec<CheckKeyFinding>,
    pub header_names: Vec<String>,
}

impl LatestSnapshot {
    /// Project a snapshot from a freshly written record.
    pub fn from_record(record: &VersionRecord, asset_filename: &str) -> Self {
        Self {
            version_id: record.version_id.clone(),
            captured_at: record.captured_at,
            asset_filename: asset_filename.to_string(),
            source_hash: record.source_hash.clone(),
            check_key_findings: record.check_key_findings.clone(),
            header_names: record
                .header_inventory
                .iter()
                .map(|f| f.name.clone())
                .collect(),
        }
    }
}

/// Filesystem-backed archive.
pub struct Archive {
    root: PathBuf,
}

impl Archive {
    /// Open (creating if needed) the archive at the given root.
    pub fn open(root: &Path) -> Result<Self> {
        let versions = root.join("versions");
        fs::create_dir_all(&versions)
            .with_context(|| format!("failed to create archive dir: {}", versions.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    fn latest_path(&self) -> PathBuf {
        self.root.join("latest.json")
    }

    /// Filenames of everything recorded under `versions/`, for the change
    /// gate's substring membership test.
    pub fn known_version_names(&self) -> Result<Vec<String>> {
        let dir = self.versions_dir();
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)
            .with_context(|| format!("failed to read archive dir: {}", dir.display()))?
        {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Persist one new version: the bundle copy and its metadata record.
    /// Returns the on-disk filename of the bundle copy.
    pub fn write_version(&self, record: &VersionRecord, asset_text: &str) -> Result<String> {
        let asset_filename = format!("{}_{}", record.version_id, record.original_filename);
        let asset_path = self.versions_dir().join(&asset_filename);
        fs::write(&asset_path, asset_text)
            .with_context(|| format!("failed to write bundle copy: {}", asset_path.display()))?;

        let meta_path = self
            .versions_dir()
            .join(format!("{}.meta.json", record.version_id));
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&meta_path, json)
            .with_context(|| format!("failed to write metadata: {}", meta_path.display()))?;

        Ok(asset_filename)
    }

    /// Overwrite the rolling latest snapshot.
    pub fn write_latest(&self, snapshot: &LatestSnapshot) -> Result<()> {
        let path = self.latest_path();
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write snapshot: {}", path.display()))?;
        Ok(())
    }

    /// Read the rolling snapshot, if any version was ever recorded.
    pub fn read_latest(&self) -> Result<Option<LatestSnapshot>> {
        let path = self.latest_path();
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Read one version record by id.
    pub fn read_version(&self, version_id: &str) -> Result<Option<VersionRecord>> {
        let path = self.versions_dir().join(format!("{version_id}.meta.json"));
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("failed to read metadata: {}", path.display()))?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// All recorded versions, newest first.
    pub fn list_versions(&self) -> Result<Vec<VersionRecord>> {
        let mut records = Vec::new();
        for name in self.known_version_names()? {
            if let Some(version_id) = name.strip_suffix(".meta.json") {
                if let Some(record) = self.read_version(version_id)? {
                    records.push(record);
                }
            }
        }
        // Version ids start with a UTC timestamp, so lexical order is
        // chronological.
        records.sort_by(|a, b| b.version_id.cmp(&a.version_id));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::check_key::CheckKeyPattern;
    use tempfile::TempDir;

    fn sample_record(version_id: &str) -> VersionRecord {
        VersionRecord {
            version_id: version_id.to_string(),
            captured_at: Utc::now(),
            source_hash: "deadbeef".repeat(8),
            original_filename: "main.93f1c29a.js".to_string(),
            check_key_findings: vec![CheckKeyFinding {
                pattern: CheckKeyPattern::Push,
                value: "a-b-c".to_string(),
            }],
            header_inventory: vec![HeaderFinding {
                name: "fansly-client-id".to_string(),
                description: "persistent client/device identifier".to_string(),
            }],
            redacted_requests: Vec::new(),
        }
    }

    #[test]
    fn write_then_read_version_roundtrips() {
        let dir = TempDir::new().unwrap();
        let archive = Archive::open(dir.path()).unwrap();

        let record = sample_record("20260827-120000_aabbccdd");
        let asset_filename = archive.write_version(&record, "var x=1;").unwrap();
        assert_eq!(asset_filename, "20260827-120000_aabbccdd_main.93f1c29a.js");

        let read = archive
            .read_version("20260827-120000_aabbccdd")
            .unwrap()
            .unwrap();
        assert_eq!(read.version_id, record.version_id);
        assert_eq!(read.check_key_findings, record.check_key_findings);
    }

    #[test]
    fn known_names_include_copies_and_meta() {
        let dir = TempDir::new().unwrap();
        let archive = Archive::open(dir.path()).unwrap();
        archive
            .write_version(&sample_record("20260827-120000_aabbccdd"), "x")
            .unwrap();

        let names = archive.known_version_names().unwrap();
        assert!(names.iter().any(|n| n.contains("aabbccdd")));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn latest_snapshot_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let archive = Archive::open(dir.path()).unwrap();
        assert!(archive.read_latest().unwrap().is_none());

        let first = sample_record("20260827-120000_aaaaaaaa");
        archive
            .write_latest(&LatestSnapshot::from_record(&first, "a.js"))
            .unwrap();
        let second = sample_record("20260827-130000_bbbbbbbb");
        archive
            .write_latest(&LatestSnapshot::from_record(&second, "b.js"))
            .unwrap();

        let latest = archive.read_latest().unwrap().unwrap();
        assert_eq!(latest.version_id, "20260827-130000_bbbbbbbb");
        assert_eq!(latest.header_names, vec!["fansly-client-id"]);
    }

    #[test]
    fn list_versions_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let archive = Archive::open(dir.path()).unwrap();
        archive
            .write_version(&sample_record("20260826-120000_11111111"), "x")
            .unwrap();
        archive
            .write_version(&sample_record("20260827-120000_22222222"), "y")
            .unwrap();

        let records = archive.list_versions().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].version_id, "20260827-120000_22222222");
    }
}
