//! Core types shared by the gate, the preview player and the site.
//!
//! Everything here is plain data: it derives `Serialize`/`Deserialize` so
//! the presentational layer can receive it as JSON, and it carries no
//! behavior beyond small queries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identifier newtypes
// ---------------------------------------------------------------------------

/// A unique identifier for a signed-in viewer.
///
/// Assigned by the authenticator when a sign-in succeeds. Anonymous
/// viewers have no id at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerId(pub u64);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V-{}", self.0)
    }
}

/// Identifier of a mix in the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MixId(pub u32);

impl fmt::Display for MixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mix-{}", self.0)
    }
}

/// Identifier of a ticketed event in the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub u32);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event-{}", self.0)
    }
}

/// Identifier of a DJ profile in the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DjId(pub u32);

impl fmt::Display for DjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dj-{}", self.0)
    }
}

/// Identifier of a playable content item.
///
/// The gate doesn't care what the content is, only which one. Mixes
/// convert into `mix-N`; a host can gate anything else by using its own
/// string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Parses a content id, rejecting empty or blank strings.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] for a blank id.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProtocolError::InvalidMessage(
                "content id must not be empty".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<MixId> for ContentId {
    fn from(id: MixId) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ContentId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Who is currently looking at the site.
///
/// Modelled as an enum rather than a flag plus an optional name: a
/// display name only exists inside the `Authenticated` variant, so
/// "has a name" and "is signed in" can never disagree.
///
/// ```text
///   Anonymous ──(authenticate)──→ Authenticated
///       ↑                               │
///       └───────────(logout)────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Identity {
    /// Nobody has signed in. The starting state after every reload.
    #[default]
    Anonymous,

    /// A viewer signed in (or signed up) successfully.
    Authenticated {
        viewer_id: ViewerId,
        display_name: String,
        email: String,
    },
}

impl Identity {
    /// `true` for a signed-in viewer.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The name shown in the header ("Welcome, …"). `None` when anonymous.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { display_name, .. } => Some(display_name),
        }
    }

    /// The viewer id, if signed in.
    pub fn viewer_id(&self) -> Option<ViewerId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { viewer_id, .. } => Some(*viewer_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Gating
// ---------------------------------------------------------------------------

/// An action that requires a signed-in viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrivilegedAction {
    /// Buying a ticket for an event.
    PurchaseTicket,
    /// Downloading a mix.
    DownloadContent,
    /// Listening past the anonymous preview window.
    PlayBeyondPreview,
}

impl fmt::Display for PrivilegedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PurchaseTicket => write!(f, "purchase_ticket"),
            Self::DownloadContent => write!(f, "download_content"),
            Self::PlayBeyondPreview => write!(f, "play_beyond_preview"),
        }
    }
}

/// The outcome of a gating decision.
///
/// `Denied` is a normal answer, not an error: the gate has already asked
/// the UI to show the sign-in prompt by the time the caller sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    Allowed,
    Denied,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

// ---------------------------------------------------------------------------
// Previews
// ---------------------------------------------------------------------------

/// Lifecycle of one anonymous preview.
///
/// ```text
///   Active ──(deadline, still anonymous)──→ Expired
///     │
///     └──(sign-in, stop, pause, other item, logout)──→ Cancelled
/// ```
///
/// `Expired` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewState {
    Active,
    Expired,
    Cancelled,
}

impl PreviewState {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for PreviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Expired => write!(f, "Expired"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Why an active preview was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelReason {
    /// The viewer signed in; playback continues unrestricted.
    Authenticated,
    /// Explicit stop for this content item.
    Stopped,
    /// The viewer hit pause.
    Paused,
    /// A preview of a different item started.
    Superseded,
    /// The viewer signed out.
    Logout,
    /// The gate is being torn down (navigation away).
    Shutdown,
}

/// A serialisable view of a preview session at some instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSnapshot {
    pub content_id: ContentId,
    pub state: PreviewState,
    /// Length of the preview window.
    pub window_ms: u64,
    /// Time left before expiry; 0 once the session is no longer active.
    pub remaining_ms: u64,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Notifications the gate pushes to the presentational layer.
///
/// Internally tagged: `{ "type": "PreviewExpired", "content_id": "mix-1" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GateEvent {
    /// The viewer signed in or out. Header, mix list and event list
    /// re-render from this.
    IdentityChanged { identity: Identity },

    /// A privileged action was refused; open the sign-in dialog.
    AuthPromptRequested {
        action: PrivilegedAction,
        content_id: Option<ContentId>,
    },

    /// An anonymous preview began.
    PreviewStarted {
        content_id: ContentId,
        window_ms: u64,
    },

    /// "Play" was pressed again on the item already previewing; the
    /// deadline was pushed back rather than doubled up.
    PreviewRestarted {
        content_id: ContentId,
        window_ms: u64,
    },

    /// The preview window ran out; playback must halt.
    PreviewExpired { content_id: ContentId },

    /// The preview ended early.
    PreviewCancelled {
        content_id: ContentId,
        reason: CancelReason,
    },
}
