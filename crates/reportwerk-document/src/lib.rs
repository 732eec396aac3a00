// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// reportwerk-document: Bitmap-based export strategies.
//
// Provides rasterisation of report surfaces, the raster capture strategy
// (one oversized bitmap windowed across A4 pages of a PDF) and the image
// export strategy (one PNG or JPG).

pub mod image;
pub mod pdf;
pub mod raster;

// Re-export the primary structs so callers can use `reportwerk_document::RasterCapture` etc.
pub use crate::image::export::ImageExporter;
pub use crate::image::processor::BitmapProcessor;
pub use pdf::capture::RasterCapture;
pub use pdf::layout::RasterLayout;
pub use pdf::writer::PdfWriter;
pub use raster::{SnapshotRasterizer, SnapshotSurface};
