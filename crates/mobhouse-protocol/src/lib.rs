//! Shared vocabulary for Mob House.
//!
//! Every other crate in the workspace speaks in these types:
//!
//! - **Identity** ([`Identity`], [`ViewerId`]) — who is looking at the site.
//! - **Gating** ([`PrivilegedAction`], [`Access`]) — what a viewer asked to
//!   do and whether they may.
//! - **Previews** ([`ContentId`], [`PreviewState`], [`CancelReason`],
//!   [`PreviewSnapshot`]) — the bounded anonymous listening window.
//! - **Notifications** ([`GateEvent`]) — what the gate tells the
//!   presentational layer.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how notifications are
//!   handed across a UI bridge as bytes.
//!
//! ```text
//! Site / UI bridge (above)  ← renders identity, opens the sign-in prompt
//!     ↕
//! Gate (SessionGate actor)  ← owns identity and the preview slot
//!     ↕
//! Protocol (this crate)     ← plain data, no behavior
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Access, CancelReason, ContentId, DjId, EventId, GateEvent, Identity,
    MixId, PreviewSnapshot, PreviewState, PrivilegedAction, ViewerId,
};
