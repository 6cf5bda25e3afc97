//! Time-bounded anonymous previews for Mob House.
//!
//! An anonymous viewer may listen to a mix for a fixed window (five
//! minutes by default) before the site insists they sign in. This crate
//! holds the pieces of that rule that don't involve identity changes:
//!
//! - [`PreviewConfig`] — how long the window is.
//! - [`PreviewSession`] — one preview attempt and its state.
//! - [`PreviewRegistry`] — the single slot: at most one Active preview,
//!   restart-on-replay, supersede-on-other-item.
//! - [`PreviewTimer`] — one cancellable deadline keyed by content id and
//!   generation.
//!
//! # Integration
//!
//! The timer is designed to sit inside the gate actor's `tokio::select!`
//! loop, next to the command channel:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         biased;
//!         Some(cmd) = cmd_rx.recv() => { /* sign-ins, stops, starts */ }
//!         deadline = timer.wait_for_deadline() => {
//!             registry.expire(&deadline.content_id, deadline.generation, Instant::now());
//!         }
//!     }
//! }
//! ```

mod error;
mod registry;
mod timer;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use error::PreviewError;
pub use registry::{PreviewRegistry, PreviewSession, Started};
pub use timer::{Deadline, PreviewTimer};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for anonymous previews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Length of the preview window in seconds. Default: 300 (5 minutes).
    pub window_secs: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            window_secs: Self::DEFAULT_WINDOW_SECS,
        }
    }
}

impl PreviewConfig {
    /// Five minutes.
    pub const DEFAULT_WINDOW_SECS: u64 = 5 * 60;

    /// Longest window accepted: one day.
    pub const MAX_WINDOW_SECS: u64 = 24 * 60 * 60;

    /// Create a config with a specific window length.
    pub fn with_window_secs(window_secs: u64) -> Self {
        Self { window_secs }
    }

    /// Fix out-of-range values so the config is safe to use.
    ///
    /// A zero-length window would expire every preview the instant it
    /// starts; it is raised to one second. Anything past
    /// [`MAX_WINDOW_SECS`](Self::MAX_WINDOW_SECS) is lowered to it.
    pub fn validated(mut self) -> Self {
        if self.window_secs == 0 {
            warn!("preview window of 0s is not usable, raising to 1s");
            self.window_secs = 1;
        } else if self.window_secs > Self::MAX_WINDOW_SECS {
            warn!(
                window_secs = self.window_secs,
                max = Self::MAX_WINDOW_SECS,
                "preview window too long, clamping"
            );
            self.window_secs = Self::MAX_WINDOW_SECS;
        }
        self
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn window_ms(&self) -> u64 {
        self.window_secs.saturating_mul(1_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_five_minutes() {
        let config = PreviewConfig::default();
        assert_eq!(config.window(), Duration::from_secs(300));
    }

    #[test]
    fn test_validated_raises_zero_window() {
        let config = PreviewConfig::with_window_secs(0).validated();
        assert_eq!(config.window_secs, 1);
    }

    #[test]
    fn test_validated_clamps_huge_window_to_one_day() {
        let config = PreviewConfig::with_window_secs(u64::MAX / 10).validated();
        assert_eq!(config.window_secs, PreviewConfig::MAX_WINDOW_SECS);
        assert_eq!(config.window_ms(), 86_400_000);
    }

    #[test]
    fn test_window_ms_saturates_on_unvalidated_config() {
        let config = PreviewConfig::with_window_secs(u64::MAX);
        assert_eq!(config.window_ms(), u64::MAX);
    }

    #[test]
    fn test_validated_keeps_sane_window() {
        let config = PreviewConfig::with_window_secs(30).validated();
        assert_eq!(config.window_secs, 30);
    }
}
