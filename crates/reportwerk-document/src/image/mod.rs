// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: bitmap scaling, flattening and encoding, plus the image
// export strategy.

pub mod export;
pub mod processor;

pub use export::ImageExporter;
pub use processor::BitmapProcessor;
