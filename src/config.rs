//! Run configuration, read from the environment once at startup.
//!
//! The config value is threaded explicitly into the pipeline entry point;
//! extraction and reconciliation never read the environment themselves.

use std::path::PathBuf;

/// Configuration for one monitoring run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Beautify the saved bundle copy. Extraction always runs on raw text.
    pub beautify: bool,
    /// Session token injected into the browser before capture. Env-only
    /// (`ARGUS_TOKEN`), never a CLI flag, so it stays out of process lists.
    pub token: Option<String>,
    /// Archive root directory.
    pub archive_dir: PathBuf,
    /// Explicit Chromium binary path, overriding discovery.
    pub chromium_path: Option<PathBuf>,
}

impl Config {
    /// Build a config from `ARGUS_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            beautify: env_flag("ARGUS_BEAUTIFY"),
            token: std::env::var("ARGUS_TOKEN").ok().filter(|t| !t.is_empty()),
            archive_dir: std::env::var("ARGUS_ARCHIVE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_archive_dir()),
            chromium_path: std::env::var("ARGUS_CHROMIUM_PATH").ok().map(PathBuf::from),
        }
    }
}

/// Default archive location: `~/.argus/archive`.
pub fn default_archive_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".argus/archive")
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_archive_dir_is_home_relative() {
        let dir = default_archive_dir();
        assert!(dir.ends_with(".argus/archive"));
    }
}
