//! Extraction and reconciliation — the decision core of the pipeline.

pub mod change_gate;
pub mod check_key;
pub mod header_scan;
pub mod reconcile;
pub mod redact;
