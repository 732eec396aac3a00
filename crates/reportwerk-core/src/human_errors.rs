// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Failure classes and plain-language messages for export errors.
//
// Every failed export produces exactly one message the UI can show. Batch
// failures keep their per-report lines so the user can see which reports
// need another attempt.

use crate::error::ReportwerkError;

/// Where a failure sits in the export error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The host refused something the export needs (e.g. popups blocked).
    /// Not retryable until the user changes a setting.
    Environment,
    /// Rasterisation or encoding produced nothing usable. Worth a manual retry.
    Encoding,
    /// A batch finished with some reports failed.
    PartialFailure,
    /// Configuration, I/O or delivery problems.
    Internal,
}

impl FailureClass {
    /// Whether retrying the same export unchanged may succeed.
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Encoding | Self::PartialFailure | Self::Internal)
    }
}

/// A user-facing message with a suggested next step.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub retriable: bool,
    pub class: FailureClass,
}

/// Map an error onto the export failure taxonomy.
pub fn classify_error(err: &ReportwerkError) -> FailureClass {
    match err {
        ReportwerkError::PopupBlocked => FailureClass::Environment,
        ReportwerkError::UnsupportedFormat(_) => FailureClass::Environment,

        ReportwerkError::Rasterization(_) => FailureClass::Encoding,
        ReportwerkError::DocumentGeneration(_) => FailureClass::Encoding,
        ReportwerkError::ImageGeneration { .. } => FailureClass::Encoding,

        ReportwerkError::Batch(_) => FailureClass::PartialFailure,

        ReportwerkError::Print(_)
        | ReportwerkError::Download(_)
        | ReportwerkError::InvalidConfig(_)
        | ReportwerkError::Io(_)
        | ReportwerkError::Serialization(_) => FailureClass::Internal,
    }
}

/// Convert an error into the single message shown for a failed export.
pub fn humanize_error(err: &ReportwerkError) -> HumanError {
    let class = classify_error(err);
    let (message, suggestion) = match err {
        ReportwerkError::PopupBlocked => (
            "The print window could not be opened.".to_string(),
            "Allow popups for this site in your browser settings, then print again.".to_string(),
        ),
        ReportwerkError::DocumentGeneration(_) => (
            "We couldn't create the PDF for this report.".to_string(),
            "Please try again. If it keeps failing, try a lower export scale.".to_string(),
        ),
        ReportwerkError::ImageGeneration { format, .. } => (
            format!("We couldn't create the {format} image for this report."),
            "Please try again, or export as PDF instead.".to_string(),
        ),
        ReportwerkError::UnsupportedFormat(format) => (
            format!("Reports can't be exported as {format} here."),
            "Choose PDF, PNG or JPG.".to_string(),
        ),
        ReportwerkError::Batch(failures) => (
            format!("{} report(s) could not be exported:\n{failures}", failures.len()),
            "Export the listed reports again individually.".to_string(),
        ),
        other => (
            format!("The export did not complete: {other}"),
            "Please try again.".to_string(),
        ),
    };

    HumanError {
        message,
        suggestion,
        retriable: class.retryable(),
        class,
    }
}
