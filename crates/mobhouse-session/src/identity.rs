//! Identity state: the two-state machine behind "who is signed in".

use std::time::Duration;

use mobhouse_protocol::Identity;
use serde::{Deserialize, Serialize};

use crate::Profile;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for the authentication round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long (in milliseconds) the demo authenticator takes to answer.
    ///
    /// Default: 1000, the delay the sign-in dialog shows "Signing In..."
    /// for. Set to 0 for tests.
    pub auth_latency_ms: u64,
}

impl SessionConfig {
    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auth_latency_ms: 1_000,
        }
    }
}

// ---------------------------------------------------------------------------
// IdentityState
// ---------------------------------------------------------------------------

/// Holds the current [`Identity`] and enforces its transitions.
///
/// ```text
///   Anonymous ──(sign_in)──→ Authenticated
///       ↑                         │  ↺ sign_in (replaces profile)
///       └────────(sign_out)───────┘
/// ```
///
/// There is no terminal state. Nothing is persisted: a fresh
/// `IdentityState` is always anonymous.
#[derive(Debug, Default)]
pub struct IdentityState {
    current: Identity,
}

impl IdentityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful authentication. Works from either state;
    /// signing in while already signed in replaces the profile.
    pub fn sign_in(&mut self, profile: Profile) -> &Identity {
        let viewer_id = profile.viewer_id;
        let was_authenticated = self.current.is_authenticated();
        self.current = profile.into();

        tracing::info!(%viewer_id, was_authenticated, "viewer signed in");
        &self.current
    }

    /// Returns to anonymous. Returns `false` if nobody was signed in.
    pub fn sign_out(&mut self) -> bool {
        let Some(viewer_id) = self.current.viewer_id() else {
            return false;
        };
        self.current = Identity::Anonymous;

        tracing::info!(%viewer_id, "viewer signed out");
        true
    }

    pub fn identity(&self) -> &Identity {
        &self.current
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_authenticated()
    }
}
