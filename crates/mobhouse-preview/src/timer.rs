//! A single cancellable deadline for the active preview.

use mobhouse_protocol::ContentId;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

/// Identifies which preview a deadline belongs to.
///
/// The generation changes on every start or restart, so a deadline from
/// an earlier run of the same mix can never expire a later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadline {
    pub content_id: ContentId,
    pub generation: u64,
}

/// Holds at most one armed deadline.
///
/// Arming replaces whatever was armed before and disarming drops it, so
/// a cancelled preview has no timer left that could fire later.
#[derive(Debug, Default)]
pub struct PreviewTimer {
    armed: Option<(Deadline, Instant)>,
}

impl PreviewTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire at `at`, replacing any earlier deadline.
    pub fn arm(&mut self, deadline: Deadline, at: Instant) {
        if let Some((previous, _)) = &self.armed {
            debug!(
                content_id = %previous.content_id,
                generation = previous.generation,
                "replacing armed preview deadline"
            );
        }
        debug!(
            content_id = %deadline.content_id,
            generation = deadline.generation,
            "preview deadline armed"
        );
        self.armed = Some((deadline, at));
    }

    /// Drop the armed deadline, if any, and return it.
    pub fn disarm(&mut self) -> Option<Deadline> {
        let (deadline, _) = self.armed.take()?;
        trace!(content_id = %deadline.content_id, "preview deadline disarmed");
        Some(deadline)
    }

    /// The currently armed deadline.
    pub fn armed(&self) -> Option<&Deadline> {
        self.armed.as_ref().map(|(deadline, _)| deadline)
    }

    /// When the armed deadline is due.
    pub fn due_at(&self) -> Option<Instant> {
        self.armed.as_ref().map(|(_, at)| *at)
    }

    /// Wait until the armed deadline is due and return it, leaving the
    /// timer disarmed.
    ///
    /// With nothing armed this future pends forever, so it can sit in a
    /// `tokio::select!` branch without ever firing. Dropping the future
    /// before it completes leaves the deadline armed.
    pub async fn wait_for_deadline(&mut self) -> Deadline {
        loop {
            let Some(at) = self.due_at() else {
                return std::future::pending().await;
            };

            time::sleep_until(at).await;

            if let Some((deadline, _)) = self.armed.take() {
                trace!(content_id = %deadline.content_id, "preview deadline fired");
                return deadline;
            }
        }
    }
}
