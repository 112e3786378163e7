//! `argus show` — one full version record.

use crate::archive::Archive;
use crate::cli::output;
use crate::config::Config;
use anyhow::{bail, Result};

/// Show the given version, or the latest one when no id is passed.
pub async fn run(config: Config, version_id: Option<&str>) -> Result<()> {
    let archive = Archive::open(&config.archive_dir)?;

    let version_id = match version_id {
        Some(id) => id.to_string(),
        None => match archive.read_latest()? {
            Some(latest) => latest.version_id,
            None => bail!("no versions recorded yet; run `argus run` first"),
        },
    };

    let Some(record) = archive.read_version(&version_id)? else {
        bail!("no such version: {version_id}");
    };

    if output::is_json() {
        output::print_json(&record);
        return Ok(());
    }

    println!("  Version:  {}", record.version_id);
    println!("  Captured: {}", record.captured_at);
    println!("  Bundle:   {}", record.original_filename);
    println!("  SHA-256:  {}", record.source_hash);
    println!();
    println!("  Check-key findings:");
    if record.check_key_findings.is_empty() {
        println!("    (none)");
    }
    for finding in &record.check_key_findings {
        println!("    {:?}: {}", finding.pattern, finding.value);
    }
    println!();
    println!("  Header inventory:");
    for finding in &record.header_inventory {
        println!("    {} — {}", finding.name, finding.description);
    }
    println!();
    println!("  Captured requests (redacted):");
    if record.redacted_requests.is_empty() {
        println!("    (none)");
    }
    for req in &record.redacted_requests {
        println!("    {} {}", req.method, req.url);
    }
    Ok(())
}
