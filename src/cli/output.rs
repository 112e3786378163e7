//! Output helpers honoring the global `--json` / `--quiet` flags.

/// Whether `--json` was passed (published as `ARGUS_JSON`).
pub fn is_json() -> bool {
    std::env::var("ARGUS_JSON").as_deref() == Ok("1")
}

/// Whether `--quiet` was passed (published as `ARGUS_QUIET`).
pub fn is_quiet() -> bool {
    std::env::var("ARGUS_QUIET").as_deref() == Ok("1")
}

/// Print a machine-readable value to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("  Error: failed to serialize output: {e}"),
    }
}
