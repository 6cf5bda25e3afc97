//! # Mob House
//!
//! The backend half of the Mob House DJs site: a session gate that
//! decides what an anonymous viewer may do, five-minute mix previews
//! that end in a sign-in prompt, and the catalog of DJs, mixes and
//! events.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mobhouse::prelude::*;
//!
//! # async fn run() -> Result<(), MobHouseError> {
//! mobhouse::init_tracing();
//!
//! let site = Site::builder().build_demo();
//!
//! // Anonymous: the mix plays as a preview, downloads need a sign-in.
//! site.play_mix(MixId(1)).await?;
//! assert!(!site.download_mix(MixId(1)).await?.is_granted());
//!
//! site.sign_in(&SignInForm {
//!     email: "selector@mobhouse.example".into(),
//!     password: "hunter2".into(),
//! })
//! .await?;
//! assert!(site.download_mix(MixId(1)).await?.is_granted());
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod site;

pub use config::{SiteBuilder, SiteConfig};
pub use error::MobHouseError;
pub use site::{DownloadTicket, Gated, Site, TicketRequest};

/// Installs a `tracing` subscriber that honours `RUST_LOG`, defaulting to
/// `info`. Calling it again is a no-op.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub mod prelude {
    pub use crate::{
        DownloadTicket, Gated, MobHouseError, Site, SiteBuilder, SiteConfig, TicketRequest,
    };
    pub use mobhouse_catalog::{
        Catalog, CatalogError, CatalogStats, Dj, Event, EventStatus, Genre, Mix, MixLength,
        NewDj, NewEvent, NewMix,
    };
    pub use mobhouse_gate::{
        AuthPrompt, GateConfig, GateError, GateEvents, GateHandle, NowPlaying, Playback,
        PlaybackMode,
    };
    pub use mobhouse_preview::{PreviewConfig, PreviewSession};
    pub use mobhouse_protocol::{
        Access, CancelReason, Codec, ContentId, DjId, EventId, GateEvent, Identity, JsonCodec,
        MixId, PreviewSnapshot, PreviewState, PrivilegedAction, ViewerId,
    };
    pub use mobhouse_session::{
        AuthOutcome, Authenticator, Credentials, DemoAuthenticator, Profile, SessionConfig,
        SessionError, SignInForm, SignUpForm,
    };
}
