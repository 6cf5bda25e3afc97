//! The `Site` facade: what the page's buttons call.
//!
//! Each content component (the mix player, the download button, the
//! ticket button, the sign-in dialog) goes through here. `Site` asks the
//! session gate before doing anything privileged and keeps the catalog
//! in step with what was played.

use mobhouse_catalog::Catalog;
use mobhouse_gate::{GateConfig, GateHandle, NowPlaying, Playback};
use mobhouse_protocol::{
    Access, ContentId, EventId, Identity, MixId, PrivilegedAction, ViewerId,
};
use mobhouse_session::{Authenticator, DemoAuthenticator, SignInForm, SignUpForm};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use crate::{MobHouseError, SiteBuilder};

/// The result of a privileged request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gated<T> {
    /// The viewer is signed in; here is what they asked for.
    Granted(T),
    /// The viewer is anonymous. The sign-in prompt has been requested and
    /// nothing else happened.
    PromptedForAuth,
}

impl<T> Gated<T> {
    pub fn is_granted(&self) -> bool {
        matches!(self, Gated::Granted(_))
    }

    pub fn granted(self) -> Option<T> {
        match self {
            Gated::Granted(value) => Some(value),
            Gated::PromptedForAuth => None,
        }
    }
}

/// A download the viewer is entitled to. Describes the file; nothing is
/// transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTicket {
    pub mix_id: MixId,
    pub viewer_id: ViewerId,
    pub title: String,
    pub file_name: String,
}

/// A ticket purchase ready for checkout. No payment is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRequest {
    pub event_id: EventId,
    pub viewer_id: ViewerId,
    pub title: String,
    pub price_kes: u32,
}

/// A running Mob House site: one session gate plus the catalog.
pub struct Site<A: Authenticator> {
    gate: GateHandle<A>,
    catalog: Mutex<Catalog>,
}

impl Site<DemoAuthenticator> {
    /// Creates a new builder. Finish it with
    /// [`build_demo`](SiteBuilder::build_demo), or with
    /// [`build`](SiteBuilder::build) to plug in another authenticator.
    pub fn builder() -> SiteBuilder {
        SiteBuilder::new()
    }
}

impl<A: Authenticator> Site<A> {
    pub(crate) fn start(config: GateConfig, auth: A, catalog: Catalog) -> Self {
        tracing::info!(
            preview_window_secs = config.preview.window_secs,
            mixes = catalog.stats().mix_count,
            events = catalog.stats().event_count,
            "site starting"
        );
        Self {
            gate: GateHandle::spawn(config, auth),
            catalog: Mutex::new(catalog),
        }
    }

    /// The session gate, for subscribing to events or registering a
    /// prompt hook.
    pub fn gate(&self) -> &GateHandle<A> {
        &self.gate
    }

    pub fn identity(&self) -> Identity {
        self.gate.current_identity()
    }

    /// Locks the catalog for reading or admin edits.
    pub async fn catalog(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().await
    }

    // -- identity ---------------------------------------------------------

    /// Validates the "Sign In" tab and signs the viewer in.
    ///
    /// # Errors
    /// - `Session(InvalidCredentials)` — the form is incomplete; the
    ///   gate is never asked
    /// - `Gate(Rejected)` — the authenticator refused
    pub async fn sign_in(&self, form: &SignInForm) -> Result<Identity, MobHouseError> {
        let credentials = form.validate()?;
        Ok(self.gate.authenticate(&credentials).await?)
    }

    /// Validates the "Sign Up" tab and signs the new viewer in.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<Identity, MobHouseError> {
        let credentials = form.validate()?;
        Ok(self.gate.authenticate(&credentials).await?)
    }

    /// Returns `false` if nobody was signed in.
    pub async fn sign_out(&self) -> Result<bool, MobHouseError> {
        Ok(self.gate.logout().await?)
    }

    // -- mixes ------------------------------------------------------------

    /// Plays a mix: in full for a signed-in viewer, as a preview
    /// otherwise. Counts a play either way.
    pub async fn play_mix(&self, id: MixId) -> Result<Playback, MobHouseError> {
        self.catalog.lock().await.mix(id)?;

        let playback = self.gate.play(ContentId::from(id)).await?;

        let plays = self.catalog.lock().await.record_play(id)?;
        tracing::debug!(%id, plays, "mix played");
        Ok(playback)
    }

    /// Pauses whatever is playing. An anonymous preview is cancelled.
    pub async fn pause(&self) -> Result<Option<NowPlaying>, MobHouseError> {
        Ok(self.gate.pause().await?)
    }

    pub async fn now_playing(&self) -> Result<Option<NowPlaying>, MobHouseError> {
        Ok(self.gate.now_playing().await?)
    }

    /// Downloads a mix, or asks the viewer to sign in first.
    pub async fn download_mix(&self, id: MixId) -> Result<Gated<DownloadTicket>, MobHouseError> {
        let title = self.catalog.lock().await.mix(id)?.title.clone();

        let access = self
            .gate
            .require_privilege_for(PrivilegedAction::DownloadContent, Some(ContentId::from(id)))
            .await?;
        let Some(viewer_id) = self.granted_viewer(access) else {
            return Ok(Gated::PromptedForAuth);
        };

        tracing::info!(%id, %viewer_id, "download granted");
        Ok(Gated::Granted(DownloadTicket {
            mix_id: id,
            viewer_id,
            file_name: format!("{}.mp3", slug(&title)),
            title,
        }))
    }

    // -- events -----------------------------------------------------------

    /// Starts a ticket purchase, or asks the viewer to sign in first.
    ///
    /// # Errors
    /// `Catalog(SoldOut)` when no tickets are left, before any prompt.
    pub async fn buy_ticket(&self, id: EventId) -> Result<Gated<TicketRequest>, MobHouseError> {
        let (title, price_kes) = {
            let catalog = self.catalog.lock().await;
            let event = catalog.on_sale(id)?;
            (event.title.clone(), event.price_kes)
        };

        let access = self
            .gate
            .require_privilege(PrivilegedAction::PurchaseTicket)
            .await?;
        let Some(viewer_id) = self.granted_viewer(access) else {
            return Ok(Gated::PromptedForAuth);
        };

        tracing::info!(%id, %viewer_id, price_kes, "ticket purchase started");
        Ok(Gated::Granted(TicketRequest {
            event_id: id,
            viewer_id,
            title,
            price_kes,
        }))
    }

    /// Stops the session gate. The catalog stays readable.
    pub async fn shutdown(&self) -> Result<(), MobHouseError> {
        Ok(self.gate.shutdown().await?)
    }

    /// The signed-in viewer, if the gate allowed the action.
    fn granted_viewer(&self, access: Access) -> Option<ViewerId> {
        if !access.is_allowed() {
            return None;
        }
        // A sign-out can land between the check and this read.
        let viewer_id = self.gate.current_identity().viewer_id();
        if viewer_id.is_none() {
            tracing::debug!("viewer signed out after the privilege check");
        }
        viewer_id
    }
}

/// `"Sunset Vibes"` → `"sunset-vibes"`.
fn slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_lowercases_and_joins_words() {
        assert_eq!(slug("Sunset Vibes"), "sunset-vibes");
        assert_eq!(slug("  Karen  Sessions!! "), "karen-sessions");
    }

    #[test]
    fn test_gated_granted_unwraps_value() {
        assert_eq!(Gated::Granted(5).granted(), Some(5));
        assert_eq!(Gated::<u8>::PromptedForAuth.granted(), None);
        assert!(!Gated::<u8>::PromptedForAuth.is_granted());
    }
}
