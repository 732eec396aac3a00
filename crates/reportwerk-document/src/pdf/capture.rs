// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster capture strategy: rasterise the report view once at an oversampled
// scale, window the bitmap across A4 pages, and save the PDF.
//
// Any failure before the save surfaces as `DocumentGeneration`, so the caller
// sees one "failed to generate PDF, try again" error and never a partial file.

use reportwerk_bridge::traits::{DownloadHost, RasterOptions, Rasterizer, VisualSurface};
use reportwerk_bridge::url::deliver;
use reportwerk_core::config::ExportConfig;
use reportwerk_core::error::{ReportwerkError, Result};
use reportwerk_core::filename::resolve_filename;
use reportwerk_core::types::{ExportArtifact, ExportFormat, ExportOptions, ReportExportMetadata};
use tracing::{info, instrument};

use crate::image::processor::BitmapProcessor;
use crate::pdf::writer::PdfWriter;

/// Exports report views as paginated raster PDFs.
pub struct RasterCapture<R, D> {
    rasterizer: R,
    downloads: D,
    config: ExportConfig,
}

impl<R: Rasterizer, D: DownloadHost> RasterCapture<R, D> {
    pub fn new(rasterizer: R, downloads: D, config: ExportConfig) -> Self {
        Self {
            rasterizer,
            downloads,
            config,
        }
    }

    pub fn downloads(&self) -> &D {
        &self.downloads
    }

    /// Capture `surface` into a multi-page PDF and trigger its download.
    #[instrument(skip_all, fields(report = %metadata.report_number))]
    pub async fn export(
        &self,
        surface: &R::Surface,
        metadata: &ReportExportMetadata,
        options: &ExportOptions,
    ) -> Result<ExportArtifact> {
        let filename = resolve_filename(options.filename.as_deref(), metadata, ExportFormat::Pdf);

        let (pdf, pages) = self
            .render(surface, options, &filename)
            .await
            .map_err(|err| match err {
                ReportwerkError::DocumentGeneration(_) => err,
                other => ReportwerkError::DocumentGeneration(other.to_string()),
            })?;

        let artifact = ExportArtifact::new(filename, ExportFormat::Pdf, &pdf, pages);
        deliver(&self.downloads, pdf, ExportFormat::Pdf.mime_type(), &artifact.filename)?;

        info!(
            filename = %artifact.filename,
            pages,
            bytes = artifact.byte_len,
            "PDF exported"
        );
        Ok(artifact)
    }

    async fn render(
        &self,
        surface: &R::Surface,
        options: &ExportOptions,
        filename: &str,
    ) -> Result<(Vec<u8>, usize)> {
        let size = surface.size();
        let scale = options.scale.unwrap_or(self.config.default_scale);
        info!(width = size.width, height = size.height, scale, "capturing surface");

        let bitmap = self
            .rasterizer
            .rasterize(surface, RasterOptions::on_white(scale))
            .await?;

        let quality = options.quality.unwrap_or(self.config.pdf_image_quality);
        let bitmap = BitmapProcessor::from_rgba(bitmap)
            .downsample(quality)
            .into_rgba();

        let mut writer = PdfWriter::new(self.config.paper_size);
        writer.set_title(filename.trim_end_matches(".pdf"));
        let (pdf, layout) = writer.create_from_bitmap(&bitmap)?;
        Ok((pdf, layout.page_count()))
    }
}
