//! Session gate actor: an isolated Tokio task that owns the viewer's
//! identity and the preview slot.
//!
//! Content components never touch that state directly. They hold a
//! [`GateHandle`] and send commands through an mpsc channel; the actor
//! applies them one at a time. The only other thing the actor waits on
//! is the preview deadline, and the `select!` is biased towards
//! commands, so a sign-in that is already queued when the deadline comes
//! due always wins.

use std::sync::Arc;

use mobhouse_preview::{PreviewRegistry, PreviewSession, PreviewTimer};
use mobhouse_protocol::{
    Access, CancelReason, ContentId, GateEvent, Identity, PreviewSnapshot, PrivilegedAction,
};
use mobhouse_session::{AuthOutcome, Authenticator, Credentials, IdentityState, Profile};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

use crate::{GateConfig, GateError, NowPlaying, PlaybackMode};

/// Receiving end of a gate event subscription.
pub type GateEvents = mpsc::UnboundedReceiver<GateEvent>;

type EventSender = mpsc::UnboundedSender<GateEvent>;

/// Callback invoked whenever the gate wants the sign-in prompt shown.
pub type PromptHook = Box<dyn Fn(&AuthPrompt) + Send + 'static>;

/// Why the sign-in prompt is being requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPrompt {
    pub action: PrivilegedAction,
    /// The item involved, when the action concerns one.
    pub content_id: Option<ContentId>,
}

/// What happened when "play" was pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Playback {
    /// Signed-in viewer: full playback.
    Unrestricted(ContentId),
    /// Anonymous viewer: a preview is running.
    Preview(PreviewSession),
}

/// Commands sent to the gate actor through its channel.
///
/// Variants with a `reply` are request/response; the caller awaits the
/// oneshot.
enum GateCommand {
    SignedIn {
        profile: Profile,
        reply: oneshot::Sender<Identity>,
    },
    Logout {
        reply: oneshot::Sender<bool>,
    },
    RequirePrivilege {
        action: PrivilegedAction,
        content_id: Option<ContentId>,
        reply: oneshot::Sender<Access>,
    },
    StartPreview {
        content_id: ContentId,
        reply: oneshot::Sender<Result<PreviewSession, GateError>>,
    },
    StopPreview {
        content_id: ContentId,
        reply: oneshot::Sender<Option<PreviewSession>>,
    },
    Play {
        content_id: ContentId,
        reply: oneshot::Sender<Result<Playback, GateError>>,
    },
    Pause {
        reply: oneshot::Sender<Option<NowPlaying>>,
    },
    GetPreview {
        content_id: ContentId,
        reply: oneshot::Sender<Option<PreviewSession>>,
    },
    ActivePreview {
        reply: oneshot::Sender<Option<PreviewSession>>,
    },
    PreviewSnapshot {
        reply: oneshot::Sender<Option<PreviewSnapshot>>,
    },
    NowPlaying {
        reply: oneshot::Sender<Option<NowPlaying>>,
    },
    Subscribe {
        sender: EventSender,
    },
    OnAuthPrompt {
        hook: PromptHook,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

// ---------------------------------------------------------------------------
// GateHandle
// ---------------------------------------------------------------------------

/// Handle to a running session gate. Cheap to clone; every content
/// component gets its own copy.
pub struct GateHandle<A: Authenticator> {
    sender: mpsc::Sender<GateCommand>,
    identity: watch::Receiver<Identity>,
    auth: Arc<A>,
}

impl<A: Authenticator> Clone for GateHandle<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            identity: self.identity.clone(),
            auth: Arc::clone(&self.auth),
        }
    }
}

impl<A: Authenticator> GateHandle<A> {
    /// Spawns a gate actor with the given config and authenticator.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn spawn(config: GateConfig, auth: A) -> Self {
        spawn_gate(config, auth)
    }

    /// Checks credentials with the authenticator, then records the new
    /// identity. Any active preview is cancelled without a prompt.
    ///
    /// The authenticator runs in the caller's task, so a slow provider
    /// never blocks the gate.
    ///
    /// # Errors
    /// - [`GateError::Rejected`] — the authenticator refused; identity unchanged
    /// - [`GateError::Session`] — the authenticator failed
    /// - [`GateError::Unavailable`] — the gate has shut down
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, GateError> {
        match self.auth.authenticate(credentials).await? {
            AuthOutcome::Authenticated(profile) => {
                self.request(|reply| GateCommand::SignedIn { profile, reply })
                    .await
            }
            AuthOutcome::Rejected { reason } => {
                tracing::warn!(email = credentials.email(), %reason, "sign-in rejected");
                Err(GateError::Rejected(reason))
            }
        }
    }

    /// Returns to anonymous. Returns `false` if nobody was signed in.
    pub async fn logout(&self) -> Result<bool, GateError> {
        self.request(|reply| GateCommand::Logout { reply }).await
    }

    /// Decides whether the viewer may perform `action`.
    ///
    /// `Denied` also asks the UI to show the sign-in prompt.
    pub async fn require_privilege(&self, action: PrivilegedAction) -> Result<Access, GateError> {
        self.require_privilege_for(action, None).await
    }

    /// Like [`require_privilege`](Self::require_privilege), naming the
    /// item the action concerns so the prompt can mention it.
    pub async fn require_privilege_for(
        &self,
        action: PrivilegedAction,
        content_id: Option<ContentId>,
    ) -> Result<Access, GateError> {
        self.request(|reply| GateCommand::RequirePrivilege {
            action,
            content_id,
            reply,
        })
        .await
    }

    /// Snapshot of the current identity. Never waits on the actor.
    pub fn current_identity(&self) -> Identity {
        self.identity.borrow().clone()
    }

    /// A receiver that changes whenever the identity does.
    pub fn watch_identity(&self) -> watch::Receiver<Identity> {
        self.identity.clone()
    }

    /// Subscribes to every [`GateEvent`] from now on.
    pub async fn subscribe(&self) -> Result<GateEvents, GateError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.send(GateCommand::Subscribe { sender: tx }).await?;
        Ok(rx)
    }

    /// Registers a callback for "show the sign-in prompt".
    pub async fn on_auth_prompt(
        &self,
        hook: impl Fn(&AuthPrompt) + Send + 'static,
    ) -> Result<(), GateError> {
        self.send(GateCommand::OnAuthPrompt {
            hook: Box::new(hook),
        })
        .await
    }

    /// Starts an anonymous preview of `content_id`.
    ///
    /// Cancels any other active preview first. Starting the item that is
    /// already previewing restarts its deadline.
    ///
    /// # Errors
    /// [`GateError::AlreadyAuthenticated`] for a signed-in viewer.
    pub async fn start_preview(&self, content_id: ContentId) -> Result<PreviewSession, GateError> {
        self.request(|reply| GateCommand::StartPreview { content_id, reply })
            .await?
    }

    /// Cancels the preview of `content_id` if it is active. Returns the
    /// cancelled session, or `None` when there was nothing to stop.
    pub async fn stop_preview(
        &self,
        content_id: ContentId,
    ) -> Result<Option<PreviewSession>, GateError> {
        self.request(|reply| GateCommand::StopPreview { content_id, reply })
            .await
    }

    /// "Play" on a content item: unrestricted for a signed-in viewer,
    /// otherwise a preview.
    pub async fn play(&self, content_id: ContentId) -> Result<Playback, GateError> {
        self.request(|reply| GateCommand::Play { content_id, reply })
            .await?
    }

    /// "Pause": stops whatever is playing and cancels its preview.
    /// Returns what was playing.
    pub async fn pause(&self) -> Result<Option<NowPlaying>, GateError> {
        self.request(|reply| GateCommand::Pause { reply }).await
    }

    /// The latest preview session for `content_id`, in any state.
    pub async fn preview(&self, content_id: ContentId) -> Result<Option<PreviewSession>, GateError> {
        self.request(|reply| GateCommand::GetPreview { content_id, reply })
            .await
    }

    /// The active preview, if any.
    pub async fn active_preview(&self) -> Result<Option<PreviewSession>, GateError> {
        self.request(|reply| GateCommand::ActivePreview { reply })
            .await
    }

    /// The active preview as the player's countdown shows it, read at
    /// the gate's current instant.
    pub async fn preview_snapshot(&self) -> Result<Option<PreviewSnapshot>, GateError> {
        self.request(|reply| GateCommand::PreviewSnapshot { reply })
            .await
    }

    /// The item currently playing, if any.
    pub async fn now_playing(&self) -> Result<Option<NowPlaying>, GateError> {
        self.request(|reply| GateCommand::NowPlaying { reply })
            .await
    }

    /// Tears the gate down: cancels any active preview and stops the
    /// actor. Later calls on any handle return
    /// [`GateError::Unavailable`].
    pub async fn shutdown(&self) -> Result<(), GateError> {
        self.request(|reply| GateCommand::Shutdown { reply }).await
    }

    async fn send(&self, cmd: GateCommand) -> Result<(), GateError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| GateError::Unavailable)
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> GateCommand,
    ) -> Result<T, GateError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(make(reply_tx)).await?;
        reply_rx.await.map_err(|_| GateError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// SessionGate actor
// ---------------------------------------------------------------------------

/// The internal gate state. Runs inside a Tokio task.
struct SessionGate {
    identity: IdentityState,
    identity_tx: watch::Sender<Identity>,
    previews: PreviewRegistry,
    timer: PreviewTimer,
    now_playing: Option<NowPlaying>,
    listeners: Vec<EventSender>,
    prompt_hooks: Vec<PromptHook>,
    receiver: mpsc::Receiver<GateCommand>,
}

impl SessionGate {
    /// Runs the actor loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        tracing::info!("session gate started");

        loop {
            tokio::select! {
                biased;

                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else {
                        self.teardown();
                        break;
                    };
                    if self.handle_command(cmd) {
                        break;
                    }
                }
                deadline = self.timer.wait_for_deadline() => {
                    self.handle_deadline(&deadline.content_id, deadline.generation);
                }
            }
        }

        tracing::info!("session gate stopped");
    }

    /// Applies one command. Returns `true` when the actor should stop.
    fn handle_command(&mut self, cmd: GateCommand) -> bool {
        match cmd {
            GateCommand::SignedIn { profile, reply } => {
                let identity = self.handle_signed_in(profile);
                let _ = reply.send(identity);
            }
            GateCommand::Logout { reply } => {
                let _ = reply.send(self.handle_logout());
            }
            GateCommand::RequirePrivilege {
                action,
                content_id,
                reply,
            } => {
                let _ = reply.send(self.require_privilege(action, content_id));
            }
            GateCommand::StartPreview { content_id, reply } => {
                let _ = reply.send(self.handle_start_preview(content_id));
            }
            GateCommand::StopPreview { content_id, reply } => {
                let _ = reply.send(self.handle_stop_preview(&content_id));
            }
            GateCommand::Play { content_id, reply } => {
                let _ = reply.send(self.handle_play(content_id));
            }
            GateCommand::Pause { reply } => {
                let _ = reply.send(self.handle_pause());
            }
            GateCommand::GetPreview { content_id, reply } => {
                let _ = reply.send(self.previews.get(&content_id).cloned());
            }
            GateCommand::ActivePreview { reply } => {
                let _ = reply.send(self.previews.active().cloned());
            }
            GateCommand::PreviewSnapshot { reply } => {
                let now = Instant::now();
                let _ = reply.send(self.previews.active().map(|s| s.snapshot(now)));
            }
            GateCommand::NowPlaying { reply } => {
                let _ = reply.send(self.now_playing.clone());
            }
            GateCommand::Subscribe { sender } => {
                self.listeners.push(sender);
            }
            GateCommand::OnAuthPrompt { hook } => {
                self.prompt_hooks.push(hook);
            }
            GateCommand::Shutdown { reply } => {
                self.teardown();
                let _ = reply.send(());
                return true;
            }
        }
        false
    }

    fn handle_signed_in(&mut self, profile: Profile) -> Identity {
        let identity = self.identity.sign_in(profile).clone();
        self.publish_identity();

        // The viewer satisfied the gate: the preview ends quietly and
        // whatever was previewing keeps playing in full.
        if self.cancel_preview(CancelReason::Authenticated).is_some() {
            if let Some(playing) = &mut self.now_playing {
                playing.mode = PlaybackMode::Unrestricted;
            }
        }

        identity
    }

    fn handle_logout(&mut self) -> bool {
        self.cancel_preview(CancelReason::Logout);
        let changed = self.identity.sign_out();
        if changed {
            self.publish_identity();
        }
        changed
    }

    fn require_privilege(
        &mut self,
        action: PrivilegedAction,
        content_id: Option<ContentId>,
    ) -> Access {
        if self.identity.is_authenticated() {
            tracing::debug!(%action, "privilege allowed");
            return Access::Allowed;
        }

        tracing::debug!(%action, "privilege denied, prompting for sign-in");
        let prompt = AuthPrompt { action, content_id };
        for hook in &self.prompt_hooks {
            hook(&prompt);
        }
        self.emit(GateEvent::AuthPromptRequested {
            action: prompt.action,
            content_id: prompt.content_id,
        });
        Access::Denied
    }

    fn handle_start_preview(&mut self, content_id: ContentId) -> Result<PreviewSession, GateError> {
        let started = self
            .previews
            .start(content_id, self.identity.identity(), Instant::now())?;

        if let Some(old) = &started.superseded {
            if self
                .now_playing
                .as_ref()
                .is_some_and(|p| &p.content_id == old.content_id())
            {
                self.now_playing = None;
            }
            self.emit(GateEvent::PreviewCancelled {
                content_id: old.content_id().clone(),
                reason: CancelReason::Superseded,
            });
        }

        // Arming replaces any earlier deadline, so a restart or a
        // superseded preview leaves exactly one timer behind.
        let session = started.session;
        self.timer.arm(session.deadline(), session.expires_at());

        let window_ms = self.previews.config().window_ms();
        let content_id = session.content_id().clone();
        self.emit(if started.restarted {
            GateEvent::PreviewRestarted {
                content_id,
                window_ms,
            }
        } else {
            GateEvent::PreviewStarted {
                content_id,
                window_ms,
            }
        });

        Ok(session)
    }

    fn handle_stop_preview(&mut self, content_id: &ContentId) -> Option<PreviewSession> {
        let stopped = self.previews.stop(content_id)?;
        self.timer.disarm();
        if self
            .now_playing
            .as_ref()
            .is_some_and(|p| &p.content_id == content_id)
        {
            self.now_playing = None;
        }
        self.emit(GateEvent::PreviewCancelled {
            content_id: content_id.clone(),
            reason: CancelReason::Stopped,
        });
        Some(stopped)
    }

    fn handle_play(&mut self, content_id: ContentId) -> Result<Playback, GateError> {
        if self.identity.is_authenticated() {
            tracing::debug!(%content_id, "unrestricted playback");
            self.now_playing = Some(NowPlaying {
                content_id: content_id.clone(),
                mode: PlaybackMode::Unrestricted,
            });
            return Ok(Playback::Unrestricted(content_id));
        }

        let session = self.handle_start_preview(content_id)?;
        self.now_playing = Some(NowPlaying {
            content_id: session.content_id().clone(),
            mode: PlaybackMode::Preview,
        });
        Ok(Playback::Preview(session))
    }

    fn handle_pause(&mut self) -> Option<NowPlaying> {
        self.cancel_preview(CancelReason::Paused);
        self.now_playing.take()
    }

    fn handle_deadline(&mut self, content_id: &ContentId, generation: u64) {
        let Some(_expired) = self.previews.expire(content_id, generation, Instant::now()) else {
            tracing::warn!(%content_id, generation, "stale preview deadline ignored");
            return;
        };

        if self
            .now_playing
            .as_ref()
            .is_some_and(|p| &p.content_id == content_id)
        {
            self.now_playing = None;
        }
        self.emit(GateEvent::PreviewExpired {
            content_id: content_id.clone(),
        });
        self.require_privilege(PrivilegedAction::PlayBeyondPreview, Some(content_id.clone()));
    }

    /// Cancels the active preview (if any), disarms its deadline and
    /// tells listeners.
    fn cancel_preview(&mut self, reason: CancelReason) -> Option<PreviewSession> {
        let cancelled = self.previews.cancel_active(reason)?;
        self.timer.disarm();
        self.emit(GateEvent::PreviewCancelled {
            content_id: cancelled.content_id().clone(),
            reason,
        });
        Some(cancelled)
    }

    fn teardown(&mut self) {
        self.cancel_preview(CancelReason::Shutdown);
        self.timer.disarm();
        self.now_playing = None;
        tracing::info!("session gate shutting down");
    }

    fn publish_identity(&mut self) {
        let identity = self.identity.identity().clone();
        self.identity_tx.send_replace(identity.clone());
        self.emit(GateEvent::IdentityChanged { identity });
    }

    /// Delivers an event to every subscriber, forgetting subscribers
    /// whose receiver is gone.
    fn emit(&mut self, event: GateEvent) {
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Spawns a gate actor task and returns a handle to it.
pub fn spawn_gate<A: Authenticator>(config: GateConfig, auth: A) -> GateHandle<A> {
    let (tx, rx) = mpsc::channel(config.command_buffer.max(1));
    let (identity_tx, identity_rx) = watch::channel(Identity::Anonymous);

    let gate = SessionGate {
        identity: IdentityState::new(),
        identity_tx,
        previews: PreviewRegistry::new(config.preview),
        timer: PreviewTimer::new(),
        now_playing: None,
        listeners: Vec::new(),
        prompt_hooks: Vec::new(),
        receiver: rx,
    };

    tokio::spawn(gate.run());

    GateHandle {
        sender: tx,
        identity: identity_rx,
        auth: Arc::new(auth),
    }
}
