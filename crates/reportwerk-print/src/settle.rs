// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Waiting for print images to settle.
//
// An image has settled once it loaded or failed; failures are tolerated and
// only logged. All loads are polled together, so the timeout bounds the whole
// set rather than the sum of each load. With no timeout the wait is unbounded,
// so one image that never settles stalls the export.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::join_all;
use reportwerk_bridge::traits::{ImageLoad, ImageSettle};
use tracing::{debug, warn};

/// Outcome of waiting on a context's images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    pub loaded: usize,
    pub failed: usize,
    /// Still loading when the timeout expired.
    pub pending: usize,
}

/// Wait until every image has settled, or until `timeout` expires.
///
/// Resolves immediately when `loads` is empty.
pub async fn wait_for_images(loads: Vec<ImageLoad>, timeout: Option<Duration>) -> SettleReport {
    let total = loads.len();
    if total == 0 {
        return SettleReport::default();
    }

    let loaded = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let (loaded_count, failed_count) = (&loaded, &failed);
    let all_settled = join_all(loads.into_iter().map(move |load| {
        async move {
            match load.await {
                ImageSettle::Loaded => {
                    loaded_count.fetch_add(1, Ordering::Relaxed);
                }
                ImageSettle::Failed => {
                    failed_count.fetch_add(1, Ordering::Relaxed);
                    warn!("print image failed to load, continuing without it");
                }
            }
        }
    }));

    match timeout {
        None => {
            all_settled.await;
        }
        Some(limit) => {
            if tokio::time::timeout(limit, all_settled).await.is_err() {
                warn!(
                    timeout_ms = limit.as_millis() as u64,
                    "gave up waiting for print images"
                );
            }
        }
    }

    let loaded = loaded.into_inner();
    let failed = failed.into_inner();
    let report = SettleReport {
        loaded,
        failed,
        pending: total - loaded - failed,
    };
    debug!(?report, "print images settled");
    report
}
