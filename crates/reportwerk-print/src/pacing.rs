// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pacing between batch items.
//
// Consecutive print dialogs opened back to back confuse some hosts, so the
// batch orchestrator pauses before every item except the first.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reportwerk_core::config::ExportConfig;

type DelayFn = dyn Fn(usize) -> Duration + Send + Sync;

/// Delay inserted before the item at a given 0-based batch index.
#[derive(Clone)]
pub struct PacingPolicy {
    delay: Arc<DelayFn>,
}

impl PacingPolicy {
    /// The same pause before every item after the first.
    pub fn fixed(delay: Duration) -> Self {
        Self::from_fn(move |_| delay)
    }

    /// No pauses at all.
    pub fn none() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// Pause chosen per index. Only called for indices of 1 and up.
    pub fn from_fn(delay: impl Fn(usize) -> Duration + Send + Sync + 'static) -> Self {
        Self {
            delay: Arc::new(delay),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::fixed(config.batch_item_delay())
    }

    /// Pause before item `index`. Always zero for the first item.
    pub fn delay_before(&self, index: usize) -> Duration {
        if index == 0 {
            Duration::ZERO
        } else {
            (self.delay)(index)
        }
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(1))
    }
}

impl fmt::Debug for PacingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacingPolicy")
            .field("second_item_delay", &self.delay_before(1))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_item_never_waits() {
        let policy = PacingPolicy::fixed(Duration::from_secs(5));
        assert_eq!(policy.delay_before(0), Duration::ZERO);
        assert_eq!(policy.delay_before(1), Duration::from_secs(5));
        assert_eq!(policy.delay_before(7), Duration::from_secs(5));
    }

    #[test]
    fn default_matches_config_default() {
        let from_config = PacingPolicy::from_config(&ExportConfig::default());
        assert_eq!(
            from_config.delay_before(1),
            PacingPolicy::default().delay_before(1)
        );
        assert_eq!(PacingPolicy::none().delay_before(3), Duration::ZERO);
    }

    #[test]
    fn custom_fn_sees_index() {
        let policy = PacingPolicy::from_fn(|i| Duration::from_millis(i as u64 * 10));
        assert_eq!(policy.delay_before(0), Duration::ZERO);
        assert_eq!(policy.delay_before(3), Duration::from_millis(30));
    }
}
