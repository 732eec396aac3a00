// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Production print driver.

use std::time::Duration;

use reportwerk_bridge::traits::{PrintDriver, SecondaryContext};
use reportwerk_core::error::Result;
use tracing::{debug, instrument};

/// Invokes the context's print facility, waits briefly, then closes the
/// context. The close happens even when the print call fails.
#[derive(Debug, Clone, Copy)]
pub struct HostPrintDriver {
    close_delay: Duration,
}

impl HostPrintDriver {
    pub fn new(close_delay: Duration) -> Self {
        Self { close_delay }
    }
}

impl Default for HostPrintDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl PrintDriver for HostPrintDriver {
    #[instrument(skip_all, fields(close_delay_ms = self.close_delay.as_millis() as u64))]
    async fn print_and_close<C: SecondaryContext>(&self, context: &mut C) -> Result<()> {
        let printed = context.print();
        if !self.close_delay.is_zero() {
            tokio::time::sleep(self.close_delay).await;
        }
        context.close();
        debug!(ok = printed.is_ok(), "print invoked, context closed");
        printed
    }
}
