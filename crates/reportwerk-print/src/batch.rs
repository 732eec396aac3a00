// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch orchestrator: native-print many reports strictly one after another.
//
// A failing report never stops the run. Every failure is collected as a
// `Report <number>: <message>` line and the whole set is raised once, after
// the last report has been attempted.

use reportwerk_bridge::traits::{PrintDriver, PrintHost, VisualSurface};
use reportwerk_core::error::{BatchFailures, ReportwerkError, Result};
use reportwerk_core::human_errors::classify_error;
use reportwerk_core::types::{ExportOptions, ReportExportMetadata};
use tracing::{debug, info, instrument, warn};

use crate::native::NativePrint;
use crate::pacing::PacingPolicy;

/// One report in a batch.
pub struct BatchItem<'a, S: ?Sized> {
    pub surface: &'a S,
    pub metadata: ReportExportMetadata,
}

impl<'a, S: ?Sized> BatchItem<'a, S> {
    pub fn new(surface: &'a S, metadata: ReportExportMetadata) -> Self {
        Self { surface, metadata }
    }
}

/// Result of a batch in which every report printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub exported: usize,
}

pub struct BatchExporter<H, D> {
    printer: NativePrint<H, D>,
    pacing: PacingPolicy,
}

impl<H: PrintHost, D: PrintDriver> BatchExporter<H, D> {
    pub fn new(printer: NativePrint<H, D>, pacing: PacingPolicy) -> Self {
        Self { printer, pacing }
    }

    pub fn printer(&self) -> &NativePrint<H, D> {
        &self.printer
    }

    /// Print every item in order, pausing between items per the pacing
    /// policy.
    ///
    /// Each report gets its own derived filename; a filename override in
    /// `options` is ignored so reports never share a name.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn export_batch<S: VisualSurface + ?Sized>(
        &self,
        items: &[BatchItem<'_, S>],
        options: &ExportOptions,
    ) -> Result<BatchSummary> {
        let item_options = ExportOptions {
            filename: None,
            ..options.clone()
        };

        let mut failures = BatchFailures::default();
        for (index, item) in items.iter().enumerate() {
            let delay = self.pacing.delay_before(index);
            if !delay.is_zero() {
                debug!(index, delay_ms = delay.as_millis() as u64, "pacing before next report");
                tokio::time::sleep(delay).await;
            }

            if let Err(err) = self
                .printer
                .export(item.surface, &item.metadata, &item_options)
                .await
            {
                warn!(
                    report = %item.metadata.report_number,
                    class = ?classify_error(&err),
                    error = %err,
                    "report failed, continuing batch"
                );
                failures.push(item.metadata.report_number.clone(), err.to_string());
            }
        }

        if failures.is_empty() {
            info!(exported = items.len(), "batch complete");
            Ok(BatchSummary {
                exported: items.len(),
            })
        } else {
            warn!(
                failed = failures.len(),
                total = items.len(),
                "batch finished with failures"
            );
            Err(ReportwerkError::Batch(failures))
        }
    }
}
