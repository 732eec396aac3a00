// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reportwerk Print: export through the host's own print facility.
//
// A report view is cloned with its style sheets into an isolated print
// context, pinned to one physical page size by a baseline stylesheet, and
// printed once its images have settled. The batch orchestrator drives that
// strategy over many reports strictly one at a time.

pub mod batch;
pub mod driver;
pub mod native;
pub mod pacing;
pub mod settle;
pub mod template;

#[cfg(test)]
mod testing;

pub use batch::{BatchExporter, BatchItem, BatchSummary};
pub use driver::HostPrintDriver;
pub use native::NativePrint;
pub use pacing::PacingPolicy;
pub use template::PrintTemplate;
