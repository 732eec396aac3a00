// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bitmap processor: oversampling, background flattening, downsampling and
// encoding of captured report bitmaps, using the `image` crate.

use ::image::codecs::jpeg::JpegEncoder;
use ::image::imageops::FilterType;
use ::image::{DynamicImage, ImageFormat, RgbImage, Rgba, RgbaImage};
use reportwerk_core::error::{ReportwerkError, Result};
use reportwerk_core::types::ExportFormat;
use tracing::{debug, instrument};

/// Processing pipeline over one captured bitmap.
///
/// Each method consumes `self` and returns the transformed processor, so
/// steps chain:
///
/// ```ignore
/// let png = BitmapProcessor::from_rgba(capture)
///     .scale_to(1588, 2246)
///     .flatten_onto(Rgba([255, 255, 255, 255]))
///     .to_png_bytes()?;
/// ```
pub struct BitmapProcessor {
    image: RgbaImage,
}

impl BitmapProcessor {
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Resample to exactly `width` x `height`. Lanczos3 for quality; a no-op
    /// when the size already matches.
    #[instrument(skip(self))]
    pub fn scale_to(self, width: u32, height: u32) -> Self {
        if self.image.width() == width && self.image.height() == height {
            return self;
        }
        let resized = ::image::imageops::resize(&self.image, width, height, FilterType::Lanczos3);
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            "bitmap resampled"
        );
        Self { image: resized }
    }

    /// Shrink both dimensions by `factor`; factors of 1 or more are a no-op.
    /// Used to trade embedded resolution for PDF size.
    pub fn downsample(self, factor: f32) -> Self {
        if !(factor.is_finite() && factor > 0.0 && factor < 1.0) {
            return self;
        }
        let width = ((self.image.width() as f32 * factor).round() as u32).max(1);
        let height = ((self.image.height() as f32 * factor).round() as u32).max(1);
        self.scale_to(width, height)
    }

    /// Composite every pixel over an opaque `background`, leaving a fully
    /// opaque bitmap.
    pub fn flatten_onto(self, background: Rgba<u8>) -> Self {
        let mut image = self.image;
        for pixel in image.pixels_mut() {
            let Rgba([r, g, b, a]) = *pixel;
            if a == 255 {
                continue;
            }
            let alpha = a as u16;
            let blend = |fg: u8, bg: u8| -> u8 {
                ((fg as u16 * alpha + bg as u16 * (255 - alpha) + 127) / 255) as u8
            };
            *pixel = Rgba([
                blend(r, background[0]),
                blend(g, background[1]),
                blend(b, background[2]),
                255,
            ]);
        }
        Self { image }
    }

    // -- Output ---------------------------------------------------------------

    /// Packed RGB8 pixel rows, alpha dropped.
    pub fn to_rgb8_raw(&self) -> Vec<u8> {
        self.to_rgb8().into_raw()
    }

    fn to_rgb8(&self) -> RgbImage {
        DynamicImage::ImageRgba8(self.image.clone()).to_rgb8()
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| ReportwerkError::ImageGeneration {
                format: ExportFormat::Png,
                detail: format!("PNG encoding failed: {err}"),
            })?;
        Ok(buffer)
    }

    /// Encode as JPEG with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder)
            .map_err(|err| ReportwerkError::ImageGeneration {
                format: ExportFormat::Jpg,
                detail: format!("JPEG encoding failed: {err}"),
            })?;
        Ok(buffer)
    }

    /// Encode for an image export. `quality` is 0..=1 and only affects JPG.
    pub fn encode(&self, format: ExportFormat, quality: f32) -> Result<Vec<u8>> {
        match format {
            ExportFormat::Png => self.to_png_bytes(),
            ExportFormat::Jpg => self.to_jpeg_bytes(jpeg_quality(quality)),
            ExportFormat::Pdf => Err(ReportwerkError::UnsupportedFormat(
                "pdf is produced by the raster capture strategy".into(),
            )),
        }
    }
}

/// Map a 0..=1 quality onto the JPEG encoder's 1..=100 scale.
fn jpeg_quality(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 100;
    }
    ((quality.clamp(0.0, 1.0) * 100.0).round() as u8).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 0, 0, 0])
            }
        })
    }

    #[test]
    fn flatten_makes_every_pixel_opaque() {
        let flat = BitmapProcessor::from_rgba(checker(4, 4))
            .flatten_onto(Rgba([255, 255, 255, 255]))
            .into_rgba();
        assert!(flat.pixels().all(|p| p[3] == 255));
        // Fully transparent red becomes the white background.
        assert_eq!(*flat.get_pixel(1, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*flat.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn half_transparent_pixel_blends() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let flat = BitmapProcessor::from_rgba(img)
            .flatten_onto(Rgba([255, 255, 255, 255]))
            .into_rgba();
        let v = flat.get_pixel(0, 0)[0];
        assert!((126..=128).contains(&v), "blended channel {v}");
    }

    #[test]
    fn scale_and_downsample_change_dimensions() {
        let scaled = BitmapProcessor::from_rgba(checker(10, 20)).scale_to(20, 40);
        assert_eq!((scaled.width(), scaled.height()), (20, 40));

        let half = scaled.downsample(0.5);
        assert_eq!((half.width(), half.height()), (10, 20));

        let untouched = half.downsample(1.0);
        assert_eq!((untouched.width(), untouched.height()), (10, 20));
    }

    #[test]
    fn encodes_png_and_jpeg() {
        let proc = BitmapProcessor::from_rgba(checker(8, 8)).flatten_onto(Rgba([255; 4]));
        let png = proc.encode(ExportFormat::Png, 1.0).expect("png");
        assert_eq!(&png[..4], b"\x89PNG");
        let jpg = proc.encode(ExportFormat::Jpg, 0.8).expect("jpg");
        assert_eq!(&jpg[..2], &[0xFF, 0xD8]);
        assert!(proc.encode(ExportFormat::Pdf, 1.0).is_err());
    }

    #[test]
    fn rgb_raw_drops_alpha() {
        let proc = BitmapProcessor::from_rgba(RgbaImage::from_pixel(2, 1, Rgba([1, 2, 3, 4])));
        assert_eq!(proc.to_rgb8_raw(), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn rgb_raw_is_row_major() {
        let img = RgbaImage::from_fn(2, 2, |x, y| Rgba([x as u8, y as u8, 9, 255]));
        let raw = BitmapProcessor::from_rgba(img).to_rgb8_raw();
        assert_eq!(raw, vec![0, 0, 9, 1, 0, 9, 0, 1, 9, 1, 1, 9]);
    }

    #[test]
    fn jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(0.92), 92);
        assert_eq!(jpeg_quality(f32::NAN), 100);
    }
}
