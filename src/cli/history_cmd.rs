//! `argus history` — recorded versions, newest first.

use crate::archive::Archive;
use crate::cli::output;
use crate::config::Config;
use anyhow::Result;

pub async fn run(config: Config, limit: usize) -> Result<()> {
    let archive = Archive::open(&config.archive_dir)?;
    let records = archive.list_versions()?;
    let shown: Vec<_> = records.into_iter().take(limit).collect();

    if output::is_json() {
        output::print_json(&shown);
        return Ok(());
    }

    if shown.is_empty() {
        println!("  No versions recorded yet. Run `argus run` first.");
        return Ok(());
    }

    println!("  {} version(s):", shown.len());
    for record in &shown {
        println!(
            "  {}  {}  keys={}  headers={}  requests={}",
            record.version_id,
            record.original_filename,
            record.check_key_findings.len(),
            record.header_inventory.len(),
            record.redacted_requests.len(),
        );
    }
    Ok(())
}
