// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// reportwerk-bridge: Host capability abstractions.
//
// The export strategies never talk to a browser, window system or print
// spooler directly. They drive the traits defined here, so the same pipeline
// runs against a real user agent, the desktop implementations in `desktop`,
// or in-test mocks.

pub mod desktop;
pub mod traits;
pub mod url;

pub use desktop::{DirectoryDownloads, SpoolPrintHost};
pub use traits::*;
pub use url::{ObjectUrl, deliver};
