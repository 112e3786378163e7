//! Environment readiness check.

use crate::capture::chromium::find_chromium;
use crate::config::Config;
use anyhow::Result;

/// Check Chromium availability, archive writability, and token presence.
pub async fn run(config: Config) -> Result<()> {
    println!("Argus Doctor");
    println!("============");
    println!();

    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    // Chromium is needed for dynamic capture only; static runs work without it.
    let chromium = find_chromium(config.chromium_path.as_deref());
    match &chromium {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Dynamic capture will degrade to static-only; \
             set ARGUS_CHROMIUM_PATH or install Chrome."
        ),
    }

    // Archive dir writability.
    let archive_writable = check_writable(&config.archive_dir);
    if archive_writable {
        println!(
            "[OK] Archive dir writable: {}",
            config.archive_dir.display()
        );
    } else {
        println!(
            "[!!] Archive dir NOT writable: {}",
            config.archive_dir.display()
        );
    }

    // Token presence only; the value is never printed.
    if config.token.is_some() {
        println!("[OK] ARGUS_TOKEN is set (authenticated capture)");
    } else {
        println!("[--] ARGUS_TOKEN not set (unauthenticated capture only)");
    }

    println!();
    if archive_writable {
        println!("Status: READY");
        if chromium.is_none() {
            println!("  (static-only: no browser for dynamic capture)");
        }
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}

fn check_writable(dir: &std::path::Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".argus-doctor-probe");
    let ok = std::fs::write(&probe, b"probe").is_ok();
    let _ = std::fs::remove_file(&probe);
    ok
}
