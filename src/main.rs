// Copyright 2026 Argus Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

mod acquisition;
mod analysis;
mod archive;
mod beautify;
mod capture;
mod cli;
mod config;
mod error;
mod pipeline;
mod profile;

use config::Config;

#[derive(Parser)]
#[command(
    name = "argus",
    about = "Argus — monitor a web client's main bundle for check-key and header changes",
    version,
    after_help = "Run 'argus <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one monitoring pass
    Run {
        /// Archive directory (default: ~/.argus/archive or ARGUS_ARCHIVE_DIR)
        #[arg(long)]
        archive_dir: Option<PathBuf>,
        /// Skip browser capture; use static findings only
        #[arg(long)]
        static_only: bool,
        /// Beautify the saved bundle copy (extraction still uses raw text)
        #[arg(long)]
        beautify: bool,
    },
    /// List recorded versions, newest first
    History {
        /// Maximum number of versions to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show one full version record
    Show {
        /// Version id (default: latest)
        version_id: Option<String>,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Publish global flags via environment variables so all modules can
    // check them.
    if cli.json {
        std::env::set_var("ARGUS_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("ARGUS_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("ARGUS_VERBOSE", "1");
    }

    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            archive_dir,
            static_only,
            beautify,
        } => {
            let mut config = Config::from_env();
            if let Some(dir) = archive_dir {
                config.archive_dir = dir;
            }
            if beautify {
                config.beautify = true;
            }
            cli::run_cmd::run(config, static_only).await
        }
        Commands::History { limit } => cli::history_cmd::run(Config::from_env(), limit).await,
        Commands::Show { version_id } => {
            cli::show_cmd::run(Config::from_env(), version_id.as_deref()).await
        }
        Commands::Doctor => cli::doctor::run(Config::from_env()).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "argus", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success (including an unchanged bundle), 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "argus=debug" } else { "argus=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse().expect("valid directive")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
