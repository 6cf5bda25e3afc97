//! The session gate for Mob House.
//!
//! The gate runs as an isolated Tokio task (actor model) and owns the
//! two pieces of state every content component depends on: who the
//! viewer is, and which anonymous preview (if any) is running.
//!
//! # Key types
//!
//! - [`GateHandle`] — send commands to the running gate
//! - [`AuthPrompt`] — why the sign-in dialog should open
//! - [`Playback`] — what "play" turned into
//! - [`GateConfig`] — preview window and channel sizing
//!
//! # Guarantees
//!
//! - Privileged actions are allowed only for a signed-in viewer. A
//!   denial always asks for the sign-in prompt.
//! - At most one preview is active. Replaying the same item restarts its
//!   window, starting another cancels the first.
//! - Signing in cancels the active preview without a prompt, even when
//!   its deadline is already due.

mod config;
mod error;
mod gate;

pub use config::{GateConfig, NowPlaying, PlaybackMode};
pub use error::GateError;
pub use gate::{spawn_gate, AuthPrompt, GateEvents, GateHandle, Playback, PromptHook};
