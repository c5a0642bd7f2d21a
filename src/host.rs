//! # Host Boundary
//!
//! The engine is driven by a host runtime it never owns. Everything it needs from that
//! runtime goes through [`Host`]: the clock, the device timezone, redraw requests, the
//! single scheduled wake and the timezone-change listener.
//!
//! ## Scheduled wakes
//! A wake is an absolute deadline plus a [`WakeToken`]. When the host's timer fires it
//! hands the token back in [`crate::HostEvent::TimerFired`]; the engine drops any fire
//! whose token is not the live pending one. Stale timers from a cancelled wake or from
//! a torn-down session therefore cannot trigger a redraw, and the host never has to
//! hold a reference to the engine.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one watch-face session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocate an id no other session in this process has used.
    pub fn next() -> Self {
        SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifies one armed wake within one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WakeToken {
    pub session: SessionId,
    pub generation: u64,
}

/// A pending redraw deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledWake {
    /// Absolute deadline in epoch milliseconds
    pub deadline_ms: i64,
    pub token: WakeToken,
}

/// Calls the engine makes into its host.
///
/// All methods are invoked on the host's event thread from inside an engine callback.
pub trait Host {
    /// Current wall-clock time in epoch milliseconds.
    fn now_millis(&self) -> i64;

    /// The device's current IANA timezone id.
    fn current_time_zone(&self) -> String;

    /// Ask for a new frame; the host calls back into the engine's draw later.
    fn request_redraw(&mut self);

    /// Arm the single wake timer. The engine cancels before every re-arm.
    fn schedule_wake_at(&mut self, wake: ScheduledWake);

    /// Disarm the wake timer, if armed.
    fn cancel_scheduled_wake(&mut self);

    /// Whether the host has a timer facility at all. Without one the face only
    /// redraws on explicit events.
    fn supports_scheduled_wake(&self) -> bool {
        true
    }

    /// Start delivering timezone-change events.
    fn subscribe_time_zone_changes(&mut self) {}

    /// Stop delivering timezone-change events.
    fn unsubscribe_time_zone_changes(&mut self) {}
}

/// Scoped registration for timezone-change events.
///
/// Acquired when the face becomes visible, released when it becomes invisible or is
/// torn down. Both operations are idempotent.
#[derive(Debug, Default)]
pub struct TimeZoneListener {
    registered: bool,
}

impl TimeZoneListener {
    pub fn acquire<H: Host>(&mut self, host: &mut H) {
        if self.registered {
            return;
        }
        self.registered = true;
        host.subscribe_time_zone_changes();
    }

    pub fn release<H: Host>(&mut self, host: &mut H) {
        if !self.registered {
            return;
        }
        self.registered = false;
        host.unsubscribe_time_zone_changes();
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

/// Test double that records every call the engine makes.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct RecordingHost {
    pub now_ms: i64,
    pub time_zone: String,
    pub redraws: usize,
    pub pending: Option<ScheduledWake>,
    pub armed: Vec<ScheduledWake>,
    pub cancels: usize,
    pub subscribed: bool,
    pub subscribe_calls: usize,
    pub timer_available: bool,
    pub log: Vec<&'static str>,
}

#[cfg(test)]
impl RecordingHost {
    pub fn new(now_ms: i64) -> Self {
        RecordingHost {
            now_ms,
            time_zone: "UTC".to_string(),
            redraws: 0,
            pending: None,
            armed: Vec::new(),
            cancels: 0,
            subscribed: false,
            subscribe_calls: 0,
            timer_available: true,
            log: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Host for RecordingHost {
    fn now_millis(&self) -> i64 {
        self.now_ms
    }

    fn current_time_zone(&self) -> String {
        self.time_zone.clone()
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
        self.log.push("redraw");
    }

    fn schedule_wake_at(&mut self, wake: ScheduledWake) {
        assert!(
            self.pending.is_none(),
            "wake armed while another is pending: {:?}",
            self.pending
        );
        self.pending = Some(wake);
        self.armed.push(wake);
        self.log.push("schedule");
    }

    fn cancel_scheduled_wake(&mut self) {
        self.pending = None;
        self.cancels += 1;
        self.log.push("cancel");
    }

    fn supports_scheduled_wake(&self) -> bool {
        self.timer_available
    }

    fn subscribe_time_zone_changes(&mut self) {
        self.subscribed = true;
        self.subscribe_calls += 1;
        self.log.push("subscribe");
    }

    fn unsubscribe_time_zone_changes(&mut self) {
        self.subscribed = false;
        self.log.push("unsubscribe");
    }
}
