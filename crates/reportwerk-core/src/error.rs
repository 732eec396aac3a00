// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Reportwerk.

use std::fmt;

use thiserror::Error;

use crate::types::ExportFormat;

/// Top-level error type for all export operations.
#[derive(Debug, Error)]
pub enum ReportwerkError {
    // -- Encoding errors --
    #[error("rasterization failed: {0}")]
    Rasterization(String),

    #[error("failed to generate PDF, please try again: {0}")]
    DocumentGeneration(String),

    #[error("failed to generate {format}, please try again: {detail}")]
    ImageGeneration { format: ExportFormat, detail: String },

    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    // -- Print errors --
    #[error("unable to open print window, please allow popups for this site")]
    PopupBlocked,

    #[error("print failed: {0}")]
    Print(String),

    // -- Delivery --
    #[error("download failed: {0}")]
    Download(String),

    // -- Batch --
    #[error("{0}")]
    Batch(BatchFailures),

    // -- Configuration / persistence --
    #[error("invalid export configuration: {0}")]
    InvalidConfig(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReportwerkError>;

/// One report that failed inside a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub report_number: String,
    pub message: String,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Report {}: {}", self.report_number, self.message)
    }
}

/// Every failure collected by a batch run, in item order.
///
/// Displays as one `Report <number>: <message>` line per failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchFailures(pub Vec<BatchFailure>);

impl BatchFailures {
    pub fn push(&mut self, report_number: impl Into<String>, message: impl Into<String>) {
        self.0.push(BatchFailure {
            report_number: report_number.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchFailure> {
        self.0.iter()
    }
}

impl fmt::Display for BatchFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, failure) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_failures_join_with_newlines() {
        let mut failures = BatchFailures::default();
        failures.push("101", "print failed: driver offline");
        failures.push("103", "unable to open print window");

        let err = ReportwerkError::Batch(failures);
        assert_eq!(
            err.to_string(),
            "Report 101: print failed: driver offline\nReport 103: unable to open print window"
        );
    }

    #[test]
    fn image_error_names_the_format() {
        let err = ReportwerkError::ImageGeneration {
            format: ExportFormat::Jpg,
            detail: "encoder returned no data".into(),
        };
        assert!(err.to_string().starts_with("failed to generate JPG"));
    }
}
