//! Gate configuration and playback state.

use mobhouse_preview::PreviewConfig;
use mobhouse_protocol::ContentId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GateConfig
// ---------------------------------------------------------------------------

/// Configuration for a session gate instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Anonymous preview window.
    pub preview: PreviewConfig,

    /// Capacity of the gate's command channel. Callers wait when it is
    /// full.
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
}

fn default_command_buffer() -> usize {
    GateConfig::DEFAULT_COMMAND_BUFFER
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            preview: PreviewConfig::default(),
            command_buffer: Self::DEFAULT_COMMAND_BUFFER,
        }
    }
}

impl GateConfig {
    pub const DEFAULT_COMMAND_BUFFER: usize = 64;

    /// A config with the given preview window and default everything else.
    pub fn with_preview_window_secs(window_secs: u64) -> Self {
        Self {
            preview: PreviewConfig::with_window_secs(window_secs),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// How an item is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Signed-in viewer, no time limit.
    Unrestricted,
    /// Anonymous viewer inside the preview window.
    Preview,
}

/// The item currently playing, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub content_id: ContentId,
    pub mode: PlaybackMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_config_default() {
        let config = GateConfig::default();
        assert_eq!(config.command_buffer, 64);
        assert_eq!(config.preview.window_secs, 300);
    }

    #[test]
    fn test_with_preview_window_secs_keeps_buffer_default() {
        let config = GateConfig::with_preview_window_secs(10);
        assert_eq!(config.preview.window_secs, 10);
        assert_eq!(config.command_buffer, GateConfig::DEFAULT_COMMAND_BUFFER);
    }
}
