// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout for raster captures.
//
// The whole report is one bitmap scaled to the page width. Its proportional
// height is cut into page-height windows: every page embeds the same image,
// shifted up by the height already shown on earlier pages. Nothing is
// re-rasterised per page.

use reportwerk_core::PaperSize;
use reportwerk_core::error::{ReportwerkError, Result};

/// Remaining height below this (in mm) does not start a new page. Absorbs
/// floating-point noise when content is an exact multiple of the page height.
const PAGE_EPSILON_MM: f64 = 0.01;

/// Where the captured bitmap lands on each page.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    /// Height of the bitmap once scaled to the page width.
    pub image_height_mm: f64,
    /// Top edge of the image on each page, measured downward from the page
    /// top. Zero on the first page, negative afterwards.
    pub positions_mm: Vec<f64>,
}

impl RasterLayout {
    /// Plan pages for a bitmap of `bitmap_width` x `bitmap_height` pixels.
    pub fn plan(bitmap_width: u32, bitmap_height: u32, paper: PaperSize) -> Result<Self> {
        if bitmap_width == 0 || bitmap_height == 0 {
            return Err(ReportwerkError::DocumentGeneration(format!(
                "bitmap has no area ({bitmap_width}x{bitmap_height})"
            )));
        }

        let (width_mm, height_mm) = paper.dimensions_mm();
        let page_width_mm = width_mm as f64;
        let page_height_mm = height_mm as f64;
        let image_height_mm = bitmap_height as f64 * page_width_mm / bitmap_width as f64;

        let mut positions_mm = vec![0.0];
        let mut height_left = image_height_mm - page_height_mm;
        while height_left > PAGE_EPSILON_MM {
            positions_mm.push(height_left - image_height_mm);
            height_left -= page_height_mm;
        }

        Ok(Self {
            page_width_mm,
            page_height_mm,
            image_height_mm,
            positions_mm,
        })
    }

    pub fn page_count(&self) -> usize {
        self.positions_mm.len()
    }

    /// Distance from the page's bottom edge to the image's bottom edge, for
    /// PDF's bottom-up coordinate space.
    pub fn bottom_offset_mm(&self, page: usize) -> Option<f64> {
        self.positions_mm
            .get(page)
            .map(|top| self.page_height_mm - top - self.image_height_mm)
    }
}
