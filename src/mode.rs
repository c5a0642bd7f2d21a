//! # Mode Controller
//!
//! Owns the interactive/ambient state and the reduced-color capability flag.
//!
//! Reduced-color panels cannot render smooth edges in ambient mode; text paints lose
//! anti-aliasing for as long as the face stays ambient on such a panel. Every real
//! mode transition requests a redraw and reconciles the scheduled wake; repeating the
//! current mode does nothing at all.

use crate::host::Host;
use crate::scheduler::RedrawScheduler;
use crate::session::SessionState;
use crate::Mode;

/// Apply an ambient-mode change. Returns whether the mode actually changed.
pub fn on_ambient_mode_changed<H: Host>(
    session: &mut SessionState,
    scheduler: &mut RedrawScheduler,
    host: &mut H,
    is_ambient: bool,
) -> bool {
    let mode = Mode::from_ambient(is_ambient);
    if session.mode == mode {
        return false;
    }

    session.mode = mode;
    refresh_anti_alias(session);
    log::info!(
        "Mode -> {:?} (text anti-aliasing {})",
        mode,
        if session.text_anti_alias { "on" } else { "off" }
    );

    host.request_redraw();
    scheduler.reconcile(session.wants_periodic_redraw(), host);
    true
}

/// Record the host's display capabilities. Only the first call takes effect.
pub fn on_properties_discovered(session: &mut SessionState, reduced_color_display: bool) -> bool {
    if let Some(current) = session.reduced_color_display {
        log::warn!(
            "Display properties already discovered (reduced color = {}), ignoring {}",
            current,
            reduced_color_display
        );
        return false;
    }

    session.reduced_color_display = Some(reduced_color_display);
    refresh_anti_alias(session);
    log::info!("Reduced-color display: {}", reduced_color_display);
    true
}

fn refresh_anti_alias(session: &mut SessionState) {
    session.text_anti_alias = !(session.is_reduced_color() && session.mode.is_ambient());
}
