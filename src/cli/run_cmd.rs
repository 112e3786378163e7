//! `argus run` — one monitoring pass.

use crate::capture::chromium::ChromiumCapturer;
use crate::capture::{NullCapturer, TrafficCapturer};
use crate::cli::output;
use crate::config::Config;
use crate::pipeline::{self, RunOutcome};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Run the pipeline once and report the outcome.
pub async fn run(config: Config, static_only: bool) -> Result<()> {
    let capturer: Box<dyn TrafficCapturer> = if static_only {
        Box::new(NullCapturer)
    } else {
        Box::new(ChromiumCapturer::new(config.chromium_path.clone()))
    };

    let spinner = make_spinner(static_only);
    let result = pipeline::run(&config, capturer.as_ref()).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let outcome = result?;

    match outcome {
        RunOutcome::Unchanged { short_id } => {
            if output::is_json() {
                output::print_json(&serde_json::json!({
                    "outcome": "unchanged",
                    "short_id": short_id,
                }));
            } else if !output::is_quiet() {
                println!("  Bundle unchanged ({short_id}), nothing recorded.");
            }
        }
        RunOutcome::NewVersion {
            record,
            asset_filename,
        } => {
            if output::is_json() {
                output::print_json(&serde_json::json!({
                    "outcome": "new_version",
                    "version_id": record.version_id,
                    "asset_filename": asset_filename,
                    "check_key_findings": record.check_key_findings,
                    "header_inventory": record.header_inventory,
                    "captured_requests": record.redacted_requests.len(),
                }));
            } else if !output::is_quiet() {
                println!("  New version recorded: {}", record.version_id);
                println!("  Bundle copy: {asset_filename}");
                println!();
                if record.check_key_findings.is_empty() {
                    println!("  No check-key construction found.");
                } else {
                    println!("  Check-key findings:");
                    for finding in &record.check_key_findings {
                        println!("    {:?}: {}", finding.pattern, finding.value);
                    }
                }
                println!();
                println!("  Header inventory ({}):", record.header_inventory.len());
                for finding in &record.header_inventory {
                    println!("    {} — {}", finding.name, finding.description);
                }
                println!();
                println!(
                    "  Captured requests archived (redacted): {}",
                    record.redacted_requests.len()
                );
            }
        }
    }

    Ok(())
}

fn make_spinner(static_only: bool) -> Option<ProgressBar> {
    if output::is_quiet() || output::is_json() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("  {spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(if static_only {
        "checking bundle (static only)..."
    } else {
        "checking bundle and capturing traffic..."
    });
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}
