// Copyright 2026 Argus Contributors
// SPDX-License-Identifier: Apache-2.0

//! Argus monitoring library — tracks a web client's main script bundle,
//! extracts its check-key recipe and custom request headers, and archives
//! redacted versioned findings.
//!
//! This library crate exposes the core modules for integration testing.

pub mod acquisition;
pub mod analysis;
pub mod archive;
pub mod beautify;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod profile;
