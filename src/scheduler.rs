//! # Redraw Scheduler
//!
//! Keeps exactly one wake pending while the face is visible and interactive, and none
//! otherwise. Deadlines are aligned to the update interval (one second by default) so
//! redraws land on the wall-clock tick no matter how long the previous frame took:
//!
//! ```text
//! deadline = now + (interval - now mod interval)
//! ```
//!
//! Every fired wake recomputes the next deadline from the *current* time rather than
//! the previous deadline, so late timers self-correct instead of accumulating drift.
//! [`RedrawScheduler::reconcile`] always cancels before deciding whether to re-arm; it
//! can be called any number of times and never leaves two wakes pending.

use crate::host::{Host, ScheduledWake, SessionId, WakeToken};

/// Next interval-aligned deadline strictly after `now_ms`.
///
/// The result is in `(now_ms, now_ms + interval_ms]` and a multiple of `interval_ms`.
///
/// # Example
/// ```
/// use watch_face_lib::scheduler::next_deadline;
///
/// assert_eq!(next_deadline(12_345, 1000), 13_000);
/// assert_eq!(next_deadline(13_000, 1000), 14_000);
/// ```
pub fn next_deadline(now_ms: i64, interval_ms: i64) -> i64 {
    let interval_ms = interval_ms.max(1);
    now_ms + (interval_ms - now_ms.rem_euclid(interval_ms))
}

#[derive(Debug)]
pub struct RedrawScheduler {
    session: SessionId,
    interval_ms: i64,
    generation: u64,
    pending: Option<ScheduledWake>,
}

impl RedrawScheduler {
    pub fn new(session: SessionId, interval_ms: i64) -> Self {
        RedrawScheduler {
            session,
            interval_ms: interval_ms.max(1),
            generation: 0,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<&ScheduledWake> {
        self.pending.as_ref()
    }

    /// Cancel any pending wake, then arm a fresh one if `should_run`.
    pub fn reconcile<H: Host>(&mut self, should_run: bool, host: &mut H) {
        self.cancel(host);
        if should_run {
            self.arm(host);
        }
    }

    /// Cancel the pending wake, if any.
    pub fn cancel<H: Host>(&mut self, host: &mut H) {
        if let Some(wake) = self.pending.take() {
            log::debug!("Cancelling wake {:?}", wake.token);
            host.cancel_scheduled_wake();
        }
    }

    /// Handle a fired wake. Returns `false` for stale tokens, which are ignored.
    ///
    /// A live wake requests a redraw and, if `should_run` still holds, re-arms from the
    /// host's current time.
    pub fn on_fired<H: Host>(&mut self, token: WakeToken, should_run: bool, host: &mut H) -> bool {
        match self.pending {
            Some(wake) if wake.token == token => {
                self.pending = None;
            }
            _ => {
                log::debug!("Ignoring stale wake {:?}", token);
                return false;
            }
        }

        host.request_redraw();
        if should_run {
            self.arm(host);
        }
        true
    }

    fn arm<H: Host>(&mut self, host: &mut H) {
        if !host.supports_scheduled_wake() {
            log::debug!("Host has no timer facility, staying on event-driven redraws");
            return;
        }

        self.generation += 1;
        let wake = ScheduledWake {
            deadline_ms: next_deadline(host.now_millis(), self.interval_ms),
            token: WakeToken {
                session: self.session,
                generation: self.generation,
            },
        };
        log::debug!("Arming wake at {} ({:?})", wake.deadline_ms, wake.token);
        self.pending = Some(wake);
        host.schedule_wake_at(wake);
    }
}
