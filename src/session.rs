//! Per-session mutable state.
//!
//! One [`SessionState`] exists per active watch face. Only the mode controller, the
//! interaction handler and the redraw scheduler mutate it, always synchronously inside
//! a single host callback.

use crate::{Mode, WeatherSnapshot};

/// Interactive background selected by tap parity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundVariant {
    /// Even number of completed taps
    Primary,
    /// Odd number of completed taps
    Alternate,
}

impl BackgroundVariant {
    pub fn for_tap_count(tap_count: u64) -> Self {
        if tap_count % 2 == 0 {
            BackgroundVariant::Primary
        } else {
            BackgroundVariant::Alternate
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub mode: Mode,
    /// Host capability; `None` until properties are discovered
    pub reduced_color_display: Option<bool>,
    pub visible: bool,
    /// Completed taps; only parity is meaningful
    pub tap_count: u64,
    pub time_zone_id: String,
    pub weather: Option<WeatherSnapshot>,
    /// Cleared while ambient on reduced-color panels
    pub text_anti_alias: bool,
}

impl SessionState {
    pub fn new(time_zone_id: impl Into<String>) -> Self {
        SessionState {
            mode: Mode::Interactive,
            reduced_color_display: None,
            visible: false,
            tap_count: 0,
            time_zone_id: time_zone_id.into(),
            weather: None,
            text_anti_alias: true,
        }
    }

    /// Reduced-color capability, assuming a full-color panel until told otherwise.
    pub fn is_reduced_color(&self) -> bool {
        self.reduced_color_display.unwrap_or(false)
    }

    pub fn background_variant(&self) -> BackgroundVariant {
        BackgroundVariant::for_tap_count(self.tap_count)
    }

    /// Whether a per-second wake should be pending.
    pub fn wants_periodic_redraw(&self) -> bool {
        self.visible && self.mode == Mode::Interactive
    }
}
