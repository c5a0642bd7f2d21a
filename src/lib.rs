//! # Sunshine Watch Face Core Library
//!
//! This library holds the rendering and scheduling engine for the Sunshine digital
//! watch face: the time, the date and the latest cached weather reading, drawn on a
//! small wearable display that alternates between two power regimes.
//!
//! ## Design Philosophy
//!
//! ### Power Regimes
//! - **Interactive**: the wearer is looking at the watch. The face redraws once per
//!   wall-clock second and the hour/minute separator blinks on even seconds.
//! - **Ambient**: always-on, low power. No per-second timer runs; the host's minute tick
//!   is the only cadence. Reduced-color panels also lose anti-aliasing.
//!
//! ### Host Boundary
//! The engine never owns a display, a timer or an event pump. It is driven through
//! [`engine::HostEvent`]s and talks back through the narrow [`host::Host`] trait
//! (`request_redraw`, `schedule_wake_at`, `cancel_scheduled_wake`). Everything that
//! decides *what* to draw lives in [`layout`] and is a pure function of its inputs.
//!
//! ### Data Flow
//! 1. **Events**: host callbacks → [`mode`] / [`interaction`] mutate the session
//! 2. **Cadence**: [`scheduler`] decides whether another frame is due
//! 3. **Layout**: [`layout::compose`] turns session + bounds + time into primitives
//! 4. **Output**: the host (or [`compositor`]) paints the primitive list
//!
//! ## Core Types
//!
//! - [`Mode`]: interactive or ambient
//! - [`TapPhase`]: phases of a tap gesture as reported by the host
//! - [`WeatherSnapshot`]: the last weather reading pushed from the phone

use serde::{Deserialize, Serialize};

// Module declarations
pub mod align;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod host;
pub mod interaction;
pub mod layout;
pub mod mode;
pub mod paint;
pub mod scheduler;
pub mod session;


pub use engine::{HostEvent, WatchFaceEngine};
pub use layout::Primitive;

/// Display power regime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Full-power, actively viewed; redraws every second
    #[default]
    Interactive,
    /// Low-power always-on display
    Ambient,
}

impl Mode {
    pub fn from_ambient(is_ambient: bool) -> Self {
        if is_ambient {
            Mode::Ambient
        } else {
            Mode::Interactive
        }
    }

    pub fn is_ambient(self) -> bool {
        self == Mode::Ambient
    }
}

/// Phase of a tap gesture.
///
/// Only [`TapPhase::Up`] completes a tap. `Down` and `Cancel` are delivered by the host
/// but leave the session untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapPhase {
    /// The wearer started touching the screen
    Down,
    /// The gesture turned into something else (swipe, long press)
    Cancel,
    /// The wearer completed the tap
    Up,
}

/// Latest weather reading synced from the paired phone.
///
/// The engine never fetches weather; it renders whatever snapshot it was last handed.
/// Field names follow the data map the phone pushes, so a snapshot deserializes
/// straight from that payload.
///
/// # Example
/// ```
/// use watch_face_lib::WeatherSnapshot;
///
/// let snapshot = WeatherSnapshot {
///     weather_id: 800,
///     high_temp_c: 31.0,
///     low_temp_c: 20.0,
///     location: "Mountain View".to_string(),
/// };
///
/// assert!(snapshot.high_temp_c >= snapshot.low_temp_c);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Provider condition code (e.g. 800 = clear sky)
    pub weather_id: i32,
    /// Forecast high in degrees Celsius
    #[serde(alias = "max_temp")]
    pub high_temp_c: f64,
    /// Forecast low in degrees Celsius
    #[serde(alias = "min_temp")]
    pub low_temp_c: f64,
    /// Human-readable location label
    #[serde(default)]
    pub location: String,
}
