// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image export strategy: rasterise the report view once and save it as a
// single PNG or JPG.

use reportwerk_bridge::traits::{DownloadHost, RasterOptions, Rasterizer};
use reportwerk_bridge::url::deliver;
use reportwerk_core::config::ExportConfig;
use reportwerk_core::error::{ReportwerkError, Result};
use reportwerk_core::filename::resolve_filename;
use reportwerk_core::types::{ExportArtifact, ExportFormat, ExportOptions, ReportExportMetadata};
use tracing::{info, instrument};

use crate::image::processor::BitmapProcessor;

/// Exports report views as single raster images.
pub struct ImageExporter<R, D> {
    rasterizer: R,
    downloads: D,
    config: ExportConfig,
}

impl<R: Rasterizer, D: DownloadHost> ImageExporter<R, D> {
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

    /// Rasterise `surface`, encode it as `options.format` (PNG by default)
    /// and trigger its download.
    #[instrument(skip_all, fields(report = %metadata.report_number))]
    pub async fn export(
        &self,
        surface: &R::Surface,
        metadata: &ReportExportMetadata,
        options: &ExportOptions,
    ) -> Result<ExportArtifact> {
        let format = options.format.unwrap_or(ExportFormat::Png);
        if format == ExportFormat::Pdf {
            return Err(ReportwerkError::UnsupportedFormat(
                "pdf exports go through the raster capture strategy".into(),
            ));
        }

        let filename = resolve_filename(options.filename.as_deref(), metadata, format);
        let scale = options.scale.unwrap_or(self.config.default_scale);
        let quality = options.quality.unwrap_or(self.config.default_image_quality);

        let encoded = self
            .render(surface, format, scale, quality)
            .await
            .map_err(|err| match err {
                ReportwerkError::ImageGeneration { .. } => err,
                other => ReportwerkError::ImageGeneration {
                    format,
                    detail: other.to_string(),
                },
            })?;

        let artifact = ExportArtifact::new(filename, format, &encoded, 1);
        deliver(&self.downloads, encoded, format.mime_type(), &artifact.filename)?;

        info!(
            filename = %artifact.filename,
            %format,
            bytes = artifact.byte_len,
            "image exported"
        );
        Ok(artifact)
    }

    async fn render(
        &self,
        surface: &R::Surface,
        format: ExportFormat,
        scale: f32,
        quality: f32,
    ) -> Result<Vec<u8>> {
        let bitmap = self
            .rasterizer
            .rasterize(surface, RasterOptions::on_white(scale))
            .await?;

        let encoded = BitmapProcessor::from_rgba(bitmap).encode(format, quality)?;
        if encoded.is_empty() {
            return Err(ReportwerkError::ImageGeneration {
                format,
                detail: "encoder returned no data".into(),
            });
        }
        Ok(encoded)
    }
}
