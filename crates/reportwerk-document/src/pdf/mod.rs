// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: page layout, document assembly, and the raster capture strategy.

pub mod capture;
pub mod layout;
pub mod writer;

pub use capture::RasterCapture;
pub use layout::RasterLayout;
pub use writer::PdfWriter;
