//! Preview sessions and the single-slot registry that owns them.
//!
//! The registry is plain synchronous state: it never sleeps and never
//! spawns. Whoever owns it (the gate actor) decides when time has
//! passed and feeds that in as `now`.

use std::collections::HashMap;

use mobhouse_protocol::{CancelReason, ContentId, Identity, PreviewSnapshot, PreviewState};
use tokio::time::Instant;

use crate::{Deadline, PreviewConfig, PreviewError};

// ---------------------------------------------------------------------------
// PreviewSession
// ---------------------------------------------------------------------------

/// One anonymous attempt to listen to one content item.
///
/// Fields are read-only from outside the crate; only the registry moves
/// a session between states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSession {
    content_id: ContentId,
    started_at: Instant,
    expires_at: Instant,
    state: PreviewState,
    generation: u64,
    cancel_reason: Option<CancelReason>,
}

impl PreviewSession {
    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Always `started_at + window`.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Bumped on every start and restart.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set once the session is `Cancelled`.
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        self.cancel_reason
    }

    /// The deadline a timer should be armed with for this session.
    pub fn deadline(&self) -> Deadline {
        Deadline {
            content_id: self.content_id.clone(),
            generation: self.generation,
        }
    }

    /// Time left in the window; zero when not active.
    pub fn remaining(&self, now: Instant) -> std::time::Duration {
        if self.is_active() {
            self.expires_at.saturating_duration_since(now)
        } else {
            std::time::Duration::ZERO
        }
    }

    pub fn snapshot(&self, now: Instant) -> PreviewSnapshot {
        PreviewSnapshot {
            content_id: self.content_id.clone(),
            state: self.state,
            window_ms: millis(self.expires_at - self.started_at),
            remaining_ms: millis(self.remaining(now)),
        }
    }

    fn cancel(&mut self, reason: CancelReason) {
        self.state = PreviewState::Cancelled;
        self.cancel_reason = Some(reason);
    }
}

fn millis(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Started
// ---------------------------------------------------------------------------

/// What [`PreviewRegistry::start`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Started {
    /// The now-active session.
    pub session: PreviewSession,
    /// `true` if the same item was already previewing and only its
    /// deadline moved.
    pub restarted: bool,
    /// A preview of a different item that this start cancelled.
    pub superseded: Option<PreviewSession>,
}

// ---------------------------------------------------------------------------
// PreviewRegistry
// ---------------------------------------------------------------------------

/// Tracks the latest preview per content item, with at most one Active.
///
/// ```text
/// start(a) ──→ [a: Active]
/// start(a) ──→ [a: Active, new deadline]            (restart)
/// start(b) ──→ [a: Cancelled(Superseded), b: Active]
/// expire(b) ─→ [b: Expired]
/// ```
#[derive(Debug)]
pub struct PreviewRegistry {
    config: PreviewConfig,
    /// Latest session per content item, in any state.
    sessions: HashMap<ContentId, PreviewSession>,
    /// The one item whose session is Active, if any.
    active: Option<ContentId>,
    next_generation: u64,
}

impl PreviewRegistry {
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config: config.validated(),
            sessions: HashMap::new(),
            active: None,
            next_generation: 1,
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Starts (or restarts) a preview of `content_id` for an anonymous
    /// viewer.
    ///
    /// - Same item already Active → the deadline is pushed back to
    ///   `now + window`; no second session is created.
    /// - Another item Active → that session is cancelled with
    ///   [`CancelReason::Superseded`] first.
    ///
    /// # Errors
    /// Returns [`PreviewError::AlreadyAuthenticated`] for a signed-in
    /// viewer.
    pub fn start(
        &mut self,
        content_id: ContentId,
        identity: &Identity,
        now: Instant,
    ) -> Result<Started, PreviewError> {
        if identity.is_authenticated() {
            return Err(PreviewError::AlreadyAuthenticated);
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        let expires_at = now + self.config.window();

        let restarted = self.active.as_ref() == Some(&content_id);
        let superseded = if restarted {
            None
        } else {
            self.cancel_active(CancelReason::Superseded)
        };

        let session = PreviewSession {
            content_id: content_id.clone(),
            started_at: now,
            expires_at,
            state: PreviewState::Active,
            generation,
            cancel_reason: None,
        };
        self.sessions.insert(content_id.clone(), session.clone());
        self.active = Some(content_id);

        if restarted {
            tracing::info!(content_id = %session.content_id, generation, "preview restarted");
        } else {
            tracing::info!(
                content_id = %session.content_id,
                generation,
                window_secs = self.config.window_secs,
                "preview started"
            );
        }

        Ok(Started {
            session,
            restarted,
            superseded,
        })
    }

    /// Cancels the preview of `content_id` if it is the Active one.
    ///
    /// Returns `None` (and changes nothing) when the item isn't
    /// previewing: already expired, already cancelled, or never started.
    pub fn stop(&mut self, content_id: &ContentId) -> Option<PreviewSession> {
        if self.active.as_ref() != Some(content_id) {
            return None;
        }
        self.cancel_active(CancelReason::Stopped)
    }

    /// Cancels whatever preview is Active, for the given reason.
    pub fn cancel_active(&mut self, reason: CancelReason) -> Option<PreviewSession> {
        let content_id = self.active.take()?;
        let session = self.sessions.get_mut(&content_id)?;
        session.cancel(reason);

        tracing::info!(%content_id, ?reason, "preview cancelled");
        Some(session.clone())
    }

    /// Expires the preview a deadline refers to.
    ///
    /// Only acts if the session is still Active, belongs to the same
    /// generation (no restart since the deadline was armed), and its
    /// window has actually elapsed. Anything else is a stale wake-up and
    /// returns `None`.
    pub fn expire(
        &mut self,
        content_id: &ContentId,
        generation: u64,
        now: Instant,
    ) -> Option<PreviewSession> {
        if self.active.as_ref() != Some(content_id) {
            return None;
        }
        let session = self.sessions.get_mut(content_id)?;
        if session.generation != generation || now < session.expires_at {
            return None;
        }

        session.state = PreviewState::Expired;
        self.active = None;

        tracing::info!(%content_id, generation, "preview expired");
        Some(session.clone())
    }

    /// The Active session, if any.
    pub fn active(&self) -> Option<&PreviewSession> {
        self.active.as_ref().and_then(|id| self.sessions.get(id))
    }

    /// The latest session for `content_id`, in any state.
    pub fn get(&self, content_id: &ContentId) -> Option<&PreviewSession> {
        self.sessions.get(content_id)
    }

    /// Number of sessions with state Active. Never more than one.
    pub fn active_count(&self) -> usize {
        self.sessions.values().filter(|s| s.is_active()).count()
    }
}

impl Default for PreviewRegistry {
    fn default() -> Self {
        Self::new(PreviewConfig::default())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for `PreviewRegistry`.
    //!
    //! Time is passed in explicitly, so these tests build instants by
    //! adding durations to a fixed `now` rather than sleeping.

    use std::time::Duration;

    use mobhouse_protocol::ViewerId;

    use super::*;

    fn registry() -> PreviewRegistry {
        PreviewRegistry::new(PreviewConfig::default())
    }

    fn cid(raw: &str) -> ContentId {
        ContentId::from(raw)
    }

    fn signed_in() -> Identity {
        Identity::Authenticated {
            viewer_id: ViewerId(1),
            display_name: "kipchoge".into(),
            email: "kipchoge@example.com".into(),
        }
    }

    const WINDOW: Duration = Duration::from_secs(300);

    // =====================================================================
    // start()
    // =====================================================================

    #[test]
    fn test_start_anonymous_creates_active_session() {
        let mut reg = registry();
        let now = Instant::now();

        let started = reg.start(cid("mix-1"), &Identity::Anonymous, now).unwrap();

        assert!(!started.restarted);
        assert!(started.superseded.is_none());
        assert_eq!(started.session.state(), PreviewState::Active);
        assert_eq!(started.session.expires_at(), now + WINDOW);
        assert_eq!(reg.active().map(|s| s.content_id()), Some(&cid("mix-1")));
    }

    #[test]
    fn test_start_authenticated_returns_already_authenticated() {
        let mut reg = registry();

        let result = reg.start(cid("mix-1"), &signed_in(), Instant::now());

        assert_eq!(result, Err(PreviewError::AlreadyAuthenticated));
        assert!(reg.active().is_none());
    }

    #[test]
    fn test_start_other_item_supersedes_active() {
        let mut reg = registry();
        let now = Instant::now();
        reg.start(cid("mix-1"), &Identity::Anonymous, now).unwrap();

        let started = reg.start(cid("mix-2"), &Identity::Anonymous, now).unwrap();

        let old = started.superseded.expect("mix-1 should be superseded");
        assert_eq!(old.content_id(), &cid("mix-1"));
        assert_eq!(old.state(), PreviewState::Cancelled);
        assert_eq!(old.cancel_reason(), Some(CancelReason::Superseded));
        assert_eq!(reg.get(&cid("mix-1")).unwrap().state(), PreviewState::Cancelled);
        assert_eq!(reg.active_count(), 1);
    }

    #[test]
    fn test_start_same_item_restarts_deadline() {
        let mut reg = registry();
        let t0 = Instant::now();
        let first = reg.start(cid("mix-1"), &Identity::Anonymous, t0).unwrap();

        let t1 = t0 + Duration::from_secs(120);
        let second = reg.start(cid("mix-1"), &Identity::Anonymous, t1).unwrap();

        assert!(second.restarted);
        assert!(second.superseded.is_none());
        assert_eq!(second.session.expires_at(), t1 + WINDOW);
        assert!(second.session.generation() > first.session.generation());
        assert_eq!(reg.active_count(), 1);
    }

    #[test]
    fn test_start_many_interleavings_keep_single_active() {
        let mut reg = registry();
        let now = Instant::now();
        let order = ["mix-1", "mix-2", "mix-2", "mix-3", "mix-1", "mix-4", "mix-4"];

        for raw in order {
            reg.start(cid(raw), &Identity::Anonymous, now).unwrap();
            assert_eq!(reg.active_count(), 1, "after starting {raw}");
        }
        assert_eq!(reg.active().unwrap().content_id(), &cid("mix-4"));
    }

    // =====================================================================
    // stop()
    // =====================================================================

    #[test]
    fn test_stop_active_item_cancels() {
        let mut reg = registry();
        reg.start(cid("mix-1"), &Identity::Anonymous, Instant::now()).unwrap();

        let stopped = reg.stop(&cid("mix-1")).expect("should cancel");

        assert_eq!(stopped.state(), PreviewState::Cancelled);
        assert_eq!(stopped.cancel_reason(), Some(CancelReason::Stopped));
        assert!(reg.active().is_none());
    }

    #[test]
    fn test_stop_mismatched_item_is_noop() {
        let mut reg = registry();
        reg.start(cid("mix-1"), &Identity::Anonymous, Instant::now()).unwrap();

        assert!(reg.stop(&cid("mix-2")).is_none());
        assert!(reg.active().is_some());
    }

    #[test]
    fn test_stop_already_cancelled_is_noop() {
        let mut reg = registry();
        reg.start(cid("mix-1"), &Identity::Anonymous, Instant::now()).unwrap();
        reg.stop(&cid("mix-1"));

        assert!(reg.stop(&cid("mix-1")).is_none());
        assert_eq!(reg.get(&cid("mix-1")).unwrap().cancel_reason(), Some(CancelReason::Stopped));
    }

    #[test]
    fn test_stop_already_expired_is_noop() {
        let mut reg = registry();
        let t0 = Instant::now();
        let started = reg.start(cid("mix-1"), &Identity::Anonymous, t0).unwrap();
        reg.expire(&cid("mix-1"), started.session.generation(), t0 + WINDOW);

        assert!(reg.stop(&cid("mix-1")).is_none());
        assert_eq!(reg.get(&cid("mix-1")).unwrap().state(), PreviewState::Expired);
    }

    // =====================================================================
    // expire()
    // =====================================================================

    #[test]
    fn test_expire_after_window_marks_expired() {
        let mut reg = registry();
        let t0 = Instant::now();
        let started = reg.start(cid("mix-1"), &Identity::Anonymous, t0).unwrap();

        let expired = reg.expire(&cid("mix-1"), started.session.generation(), t0 + WINDOW);

        assert_eq!(expired.unwrap().state(), PreviewState::Expired);
        assert!(reg.active().is_none());
    }

    #[test]
    fn test_expire_before_window_is_ignored() {
        let mut reg = registry();
        let t0 = Instant::now();
        let started = reg.start(cid("mix-1"), &Identity::Anonymous, t0).unwrap();

        let expired = reg.expire(
            &cid("mix-1"),
            started.session.generation(),
            t0 + Duration::from_secs(10),
        );

        assert!(expired.is_none());
        assert!(reg.active().is_some());
    }

    #[test]
    fn test_expire_stale_generation_is_ignored() {
        let mut reg = registry();
        let t0 = Instant::now();
        let first = reg.start(cid("mix-1"), &Identity::Anonymous, t0).unwrap();
        reg.start(cid("mix-1"), &Identity::Anonymous, t0 + Duration::from_secs(60))
            .unwrap();

        // The first run's deadline arrives; the restart moved it.
        let expired = reg.expire(&cid("mix-1"), first.session.generation(), t0 + WINDOW);

        assert!(expired.is_none());
        assert!(reg.active().is_some());
    }

    #[test]
    fn test_expire_cancelled_session_is_ignored() {
        let mut reg = registry();
        let t0 = Instant::now();
        let started = reg.start(cid("mix-1"), &Identity::Anonymous, t0).unwrap();
        reg.cancel_active(CancelReason::Authenticated);

        let expired = reg.expire(&cid("mix-1"), started.session.generation(), t0 + WINDOW);

        assert!(expired.is_none());
        assert_eq!(reg.get(&cid("mix-1")).unwrap().state(), PreviewState::Cancelled);
    }

    #[test]
    fn test_expire_twice_only_first_takes_effect() {
        let mut reg = registry();
        let t0 = Instant::now();
        let started = reg.start(cid("mix-1"), &Identity::Anonymous, t0).unwrap();
        let generation = started.session.generation();

        assert!(reg.expire(&cid("mix-1"), generation, t0 + WINDOW).is_some());
        assert!(reg.expire(&cid("mix-1"), generation, t0 + WINDOW).is_none());
    }

    // =====================================================================
    // snapshots
    // =====================================================================

    #[test]
    fn test_snapshot_reports_remaining_time() {
        let mut reg = registry();
        let t0 = Instant::now();
        let started = reg.start(cid("mix-1"), &Identity::Anonymous, t0).unwrap();

        let snap = started.session.snapshot(t0 + Duration::from_secs(60));

        assert_eq!(snap.window_ms, 300_000);
        assert_eq!(snap.remaining_ms, 240_000);
        assert_eq!(snap.state, PreviewState::Active);
    }

    #[test]
    fn test_snapshot_of_cancelled_session_has_no_time_left() {
        let mut reg = registry();
        let t0 = Instant::now();
        reg.start(cid("mix-1"), &Identity::Anonymous, t0).unwrap();
        let cancelled = reg.stop(&cid("mix-1")).unwrap();

        assert_eq!(cancelled.snapshot(t0).remaining_ms, 0);
    }
}
