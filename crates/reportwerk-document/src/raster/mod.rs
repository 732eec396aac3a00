// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Snapshot rasterisation.
//
// A `SnapshotSurface` is a report view whose pixels were already captured by
// the host (a screenshot of the rendered report, at any device pixel ratio).
// `SnapshotRasterizer` resamples that capture to the requested oversampling
// factor and lays it over the export background.

use ::image::RgbaImage;
use reportwerk_bridge::traits::{RasterOptions, Rasterizer, VisualSurface};
use reportwerk_core::error::{ReportwerkError, Result};
use reportwerk_core::types::{StyleSnapshot, SurfaceSize};
use tracing::{debug, instrument};

use crate::image::processor::BitmapProcessor;

/// Longest side of a rasterised bitmap, matching the JPEG encoder's limit.
pub const MAX_BITMAP_SIDE: u32 = 65_535;

/// Total pixel budget of a rasterised bitmap (1 GiB of RGBA).
pub const MAX_BITMAP_PIXELS: u64 = 1 << 28;

/// A rendered report view backed by a captured bitmap.
#[derive(Debug, Clone)]
pub struct SnapshotSurface {
    size: SurfaceSize,
    capture: RgbaImage,
    markup: String,
    styles: StyleSnapshot,
}

impl SnapshotSurface {
    /// Wrap a capture taken at one bitmap pixel per CSS pixel.
    pub fn from_capture(capture: RgbaImage) -> Self {
        let size = SurfaceSize {
            width: capture.width(),
            height: capture.height(),
        };
        Self::with_size(capture, size)
    }

    /// Wrap a capture whose CSS size differs from its pixel size (HiDPI).
    pub fn with_size(capture: RgbaImage, size: SurfaceSize) -> Self {
        Self {
            size,
            capture,
            markup: String::new(),
            styles: StyleSnapshot::default(),
        }
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_styles(mut self, styles: StyleSnapshot) -> Self {
        self.styles = styles;
        self
    }

    pub fn capture(&self) -> &RgbaImage {
        &self.capture
    }
}

impl VisualSurface for SnapshotSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn markup(&self) -> String {
        self.markup.clone()
    }

    fn style_snapshot(&self) -> StyleSnapshot {
        self.styles.clone()
    }
}

/// Rasterises `SnapshotSurface`s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotRasterizer;

impl SnapshotRasterizer {
    /// Bitmap dimensions for a surface at the given oversampling.
    ///
    /// Fails with `Rasterization` when the result would exceed
    /// [`MAX_BITMAP_SIDE`] or [`MAX_BITMAP_PIXELS`].
    pub fn target_dimensions(size: SurfaceSize, scale: f32) -> Result<(u32, u32)> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ReportwerkError::Rasterization(format!(
                "scale must be positive, got {scale}"
            )));
        }
        if size.width == 0 || size.height == 0 {
            return Err(ReportwerkError::Rasterization(format!(
                "surface has no rendered area ({}x{})",
                size.width, size.height
            )));
        }
        let width = (size.width as f64 * scale as f64).round().max(1.0);
        let height = (size.height as f64 * scale as f64).round().max(1.0);
        if width > MAX_BITMAP_SIDE as f64
            || height > MAX_BITMAP_SIDE as f64
            || width * height > MAX_BITMAP_PIXELS as f64
        {
            return Err(ReportwerkError::Rasterization(format!(
                "{}x{} at scale {scale} needs a {width}x{height} bitmap, over the \
                 {MAX_BITMAP_SIDE} px side / {MAX_BITMAP_PIXELS} px budget",
                size.width, size.height
            )));
        }
        Ok((width as u32, height as u32))
    }
}

impl Rasterizer for SnapshotRasterizer {
    type Surface = SnapshotSurface;

    #[instrument(skip_all, fields(scale = options.scale))]
    async fn rasterize(
        &self,
        surface: &SnapshotSurface,
        options: RasterOptions,
    ) -> Result<RgbaImage> {
        if surface.capture.width() == 0 || surface.capture.height() == 0 {
            return Err(ReportwerkError::Rasterization("capture is empty".into()));
        }
        let (width, height) = Self::target_dimensions(surface.size, options.scale)?;

        let mut bitmap = BitmapProcessor::from_rgba(surface.capture.clone()).scale_to(width, height);
        if let Some(background) = options.background {
            bitmap = bitmap.flatten_onto(background);
        }

        debug!(width, height, "surface rasterised");
        Ok(bitmap.into_rgba())
    }
}
