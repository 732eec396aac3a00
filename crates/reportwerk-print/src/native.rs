// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native print strategy.
//
// Opens a secondary context, writes a scrubbed clone of the report styled
// for one physical page, waits for its images, then hands it to the print
// driver. Only one secondary context is open at a time per `NativePrint`.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use reportwerk_bridge::traits::{PrintDriver, PrintHost, SecondaryContext, VisualSurface};
use reportwerk_core::config::ExportConfig;
use reportwerk_core::error::{ReportwerkError, Result};
use reportwerk_core::filename::resolve_filename;
use reportwerk_core::types::{ExportFormat, ExportOptions, ReportExportMetadata};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::settle::wait_for_images;
use crate::template::PrintTemplate;

/// Exports report views through the host's print facility.
pub struct NativePrint<H, D> {
    host: H,
    driver: D,
    template: PrintTemplate,
    settle_delay: Duration,
    image_timeout: Option<Duration>,
    /// Held for the whole export so concurrent callers queue up.
    slot: Mutex<()>,
}

impl<H: PrintHost, D: PrintDriver> NativePrint<H, D> {
    pub fn new(host: H, driver: D, config: &ExportConfig) -> Self {
        Self {
            host,
            driver,
            template: PrintTemplate::new(config.paper_size, config.content_inset_mm),
            settle_delay: config.print_settle_delay(),
            image_timeout: config.image_wait_timeout(),
            slot: Mutex::new(()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Print `surface`. The print job is titled after the resolved filename
    /// so hosts that save to file suggest the right name.
    ///
    /// Fails with [`ReportwerkError::PopupBlocked`] when the host refuses to
    /// open a secondary context.
    #[instrument(skip_all, fields(report = %metadata.report_number))]
    pub async fn export<S: VisualSurface + ?Sized>(
        &self,
        surface: &S,
        metadata: &ReportExportMetadata,
        options: &ExportOptions,
    ) -> Result<()> {
        let _slot = self.slot.lock().await;

        let filename = resolve_filename(options.filename.as_deref(), metadata, ExportFormat::Pdf);
        let title = filename
            .rsplit_once('.')
            .map_or(filename.as_str(), |(stem, _)| stem);

        let context = self
            .host
            .open_secondary()?
            .ok_or(ReportwerkError::PopupBlocked)?;
        let mut context = ContextGuard::new(context);

        let document = self
            .template
            .render(title, &surface.markup(), &surface.style_snapshot());
        context.write_document(&document)?;

        let report = wait_for_images(context.image_loads(), self.image_timeout).await;
        if report.failed > 0 {
            debug!(failed = report.failed, "printing without some images");
        }
        if report.pending > 0 {
            warn!(pending = report.pending, "printing before every image loaded");
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        self.driver.print_and_close(&mut *context).await?;
        info!(%filename, "print flow opened");
        Ok(())
    }
}

/// Closes a secondary context on every exit path.
struct ContextGuard<C: SecondaryContext> {
    inner: C,
}

impl<C: SecondaryContext> ContextGuard<C> {
    fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: SecondaryContext> Deref for ContextGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: SecondaryContext> DerefMut for ContextGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

impl<C: SecondaryContext> Drop for ContextGuard<C> {
    fn drop(&mut self) {
        if !self.inner.is_closed() {
            debug!("closing abandoned print context");
            self.inner.close();
        }
    }
}
