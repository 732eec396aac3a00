// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reportwerk: Core types, filename derivation and error definitions shared
// across all export crates.

pub mod config;
pub mod error;
pub mod filename;
pub mod human_errors;
pub mod integrity;
pub mod telemetry;
pub mod types;

pub use config::ExportConfig;
pub use error::ReportwerkError;
pub use filename::{derive_filename, derive_filename_with_extension, sanitize_segment};
pub use types::*;
