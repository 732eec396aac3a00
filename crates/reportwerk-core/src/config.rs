// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ReportwerkError, Result};

/// Largest accepted `default_scale`. Beyond this the oversampled bitmap of a
/// long report outgrows what the encoders and the PDF writer handle.
pub const MAX_SCALE: f32 = 8.0;

/// Persistent export settings. Per-call `ExportOptions` override the
/// defaults held here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Physical page used for PDF pagination and the print stylesheet.
    pub paper_size: crate::PaperSize,
    /// Rasterisation oversampling (bitmap pixels per CSS pixel).
    pub default_scale: f32,
    /// Encoder quality for PNG/JPG exports, 0..=1.
    pub default_image_quality: f32,
    /// Resolution multiplier for bitmaps embedded in PDFs.
    pub pdf_image_quality: f32,
    /// Wait between the print document settling and the print call.
    pub print_settle_delay_ms: u64,
    /// Wait between the print call and closing the print context.
    pub print_close_delay_ms: u64,
    /// Pause between consecutive reports in a batch.
    pub batch_item_delay_ms: u64,
    /// Upper bound on waiting for print images. `None` waits indefinitely.
    pub image_wait_timeout_ms: Option<u64>,
    /// Uniform inset of the printed content box.
    pub content_inset_mm: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            paper_size: crate::PaperSize::A4,
            default_scale: 2.0,
            default_image_quality: 1.0,
            pdf_image_quality: 1.0,
            print_settle_delay_ms: 500,
            print_close_delay_ms: 100,
            batch_item_delay_ms: 1000,
            image_wait_timeout_ms: None,
            content_inset_mm: 10,
        }
    }
}

impl ExportConfig {
    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        info!(path = %path.as_ref().display(), "export configuration loaded");
        Ok(config)
    }

    /// Write settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        debug!(path = %path.as_ref().display(), "export configuration saved");
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.default_scale > 0.0 && self.default_scale <= MAX_SCALE) {
            return Err(ReportwerkError::InvalidConfig(format!(
                "default_scale must be within (0, {MAX_SCALE}], got {}",
                self.default_scale
            )));
        }
        for (name, value) in [
            ("default_image_quality", self.default_image_quality),
            ("pdf_image_quality", self.pdf_image_quality),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ReportwerkError::InvalidConfig(format!(
                    "{name} must be within (0, 1], got {value}"
                )));
            }
        }
        let (width_mm, height_mm) = self.paper_size.dimensions_mm();
        if self.content_inset_mm >= width_mm.min(height_mm).div_ceil(2) {
            return Err(ReportwerkError::InvalidConfig(format!(
                "content_inset_mm {} leaves no printable area on {:?}",
                self.content_inset_mm, self.paper_size
            )));
        }
        Ok(())
    }

    pub fn print_settle_delay(&self) -> Duration {
        Duration::from_millis(self.print_settle_delay_ms)
    }

    pub fn print_close_delay(&self) -> Duration {
        Duration::from_millis(self.print_close_delay_ms)
    }

    pub fn batch_item_delay(&self) -> Duration {
        Duration::from_millis(self.batch_item_delay_ms)
    }

    pub fn image_wait_timeout(&self) -> Option<Duration> {
        self.image_wait_timeout_ms.map(Duration::from_millis)
    }
}
