//! # Interaction Handler
//!
//! Tap gestures and timezone changes. A completed tap flips the interactive background
//! between its two variants; timezone updates only change which wall clock the next
//! frame reads.

use crate::host::Host;
use crate::session::SessionState;
use crate::TapPhase;

/// Record a new device timezone. Takes effect on the next frame; no redraw is forced.
pub fn on_time_zone_changed(session: &mut SessionState, time_zone_id: impl Into<String>) {
    session.time_zone_id = time_zone_id.into();
    log::debug!("Timezone -> {}", session.time_zone_id);
}

/// Re-read the device timezone (it may have changed while nobody was looking) and
/// request a fresh frame.
pub fn on_became_visible<H: Host>(session: &mut SessionState, host: &mut H) {
    on_time_zone_changed(session, host.current_time_zone());
    host.request_redraw();
}

/// Handle one tap phase. Returns whether the tap completed.
pub fn on_tap<H: Host>(session: &mut SessionState, host: &mut H, phase: TapPhase) -> bool {
    match phase {
        // Reserved for touch feedback
        TapPhase::Down | TapPhase::Cancel => false,
        TapPhase::Up => {
            session.tap_count = session.tap_count.wrapping_add(1);
            log::debug!(
                "Tap #{} -> {:?} background",
                session.tap_count,
                session.background_variant()
            );
            host.request_redraw();
            true
        }
    }
}
