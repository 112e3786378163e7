//! CLI subcommand implementations for the Argus binary.

pub mod doctor;
pub mod history_cmd;
pub mod output;
pub mod run_cmd;
pub mod show_cmd;
