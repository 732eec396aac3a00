// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: assemble a paginated document from one captured bitmap using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: the bitmap is registered once as an
// image XObject, each `PdfPage` carries a `Vec<Op>` placing that XObject, and
// the document is serialised via `PdfDocument::save()`.

use ::image::RgbaImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use reportwerk_core::PaperSize;
use reportwerk_core::error::{ReportwerkError, Result};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::BitmapProcessor;
use crate::pdf::layout::RasterLayout;

/// Nominal resolution the XObject is declared at; the placement transform
/// rescales it to the page width regardless.
const EMBED_DPI: f32 = 300.0;

/// Builds PDFs from captured report bitmaps.
pub struct PdfWriter {
    paper_size: PaperSize,
    title: Option<String>,
}

impl PdfWriter {
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
        }
    }

    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn paper_size(&self) -> PaperSize {
        self.paper_size
    }

    /// Lay `bitmap` out across as many pages as its height needs and
    /// serialise the document.
    ///
    /// The bitmap must already be opaque; its alpha channel is dropped.
    #[instrument(skip(self, bitmap), fields(width = bitmap.width(), height = bitmap.height()))]
    pub fn create_from_bitmap(&self, bitmap: &RgbaImage) -> Result<(Vec<u8>, RasterLayout)> {
        let layout = RasterLayout::plan(bitmap.width(), bitmap.height(), self.paper_size)?;
        let title = self.title.as_deref().unwrap_or("Inspection Report");

        info!(
            paper = ?self.paper_size,
            title,
            pages = layout.page_count(),
            image_height_mm = layout.image_height_mm,
            "Creating raster PDF"
        );

        let raw = RawImage {
            pixels: RawImageData::U8(BitmapProcessor::from_rgba(bitmap.clone()).to_rgb8_raw()),
            width: bitmap.width() as usize,
            height: bitmap.height() as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        let page_w = Mm(layout.page_width_mm as f32);
        let page_h = Mm(layout.page_height_mm as f32);
        let natural_width_pt = bitmap.width() as f32 / EMBED_DPI * 72.0;
        let scale = page_w.into_pt().0 / natural_width_pt;

        let mut pages = Vec::with_capacity(layout.page_count());
        for page in 0..layout.page_count() {
            let bottom_mm = layout.bottom_offset_mm(page).ok_or_else(|| {
                ReportwerkError::DocumentGeneration(format!("no placement for page {page}"))
            })?;

            let ops = vec![Op::UseXobject {
                id: xobject_id.clone(),
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Mm(bottom_mm as f32).into_pt()),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    dpi: Some(EMBED_DPI),
                    rotate: None,
                },
            }];
            pages.push(PdfPage::new(page_w, page_h, ops));
        }
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "PDF serialisation reported warnings");
        }
        if output.is_empty() {
            return Err(ReportwerkError::DocumentGeneration(
                "PDF serialiser returned no data".into(),
            ));
        }

        debug!(bytes = output.len(), scale, "Raster PDF assembled");
        Ok((output, layout))
    }
}
