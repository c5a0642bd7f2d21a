//! # Watch Face Engine
//!
//! One [`WatchFaceEngine`] per active watch-face session. The host feeds it
//! [`HostEvent`]s and asks it for frames; the engine routes each event to the mode
//! controller, interaction handler or redraw scheduler, and keeps the scheduled wake
//! consistent with the session after every event:
//!
//! > a wake is pending **iff** the face is visible and interactive.
//!
//! Callbacks are assumed to be serialized by the host and never re-entrant.
//!
//! ## Lifecycle
//! ```text
//! new ─► PropertiesDiscovered ─► VisibilityChanged(true) ─► TimerFired … ─► Teardown
//!                                    │                          ▲
//!                                    └─ AmbientModeChanged ─────┘
//! ```
//! Teardown cancels the pending wake first and only then releases the timezone
//! listener. After teardown every event is ignored.

use crate::config::Config;
use crate::host::{Host, ScheduledWake, SessionId, TimeZoneListener, WakeToken};
use crate::layout::{self, Primitive};
use crate::paint::PaintSet;
use crate::scheduler::RedrawScheduler;
use crate::session::SessionState;
use crate::{clock, interaction, mode, TapPhase, WeatherSnapshot};
use embedded_graphics::geometry::Size;

/// Events the host delivers to the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    VisibilityChanged(bool),
    AmbientModeChanged(bool),
    PropertiesDiscovered { reduced_color_display: bool },
    Tap {
        phase: TapPhase,
        x: i32,
        y: i32,
        timestamp_ms: i64,
    },
    TimezoneChanged(String),
    TimerFired(WakeToken),
    /// Once-per-minute tick the host delivers in ambient mode
    TimeTick,
    /// New snapshot from the sync channel, or `None` when it was cleared
    WeatherUpdated(Option<WeatherSnapshot>),
    Teardown,
}

pub struct WatchFaceEngine<H: Host> {
    host: H,
    config: Config,
    session: SessionState,
    scheduler: RedrawScheduler,
    time_zone_listener: TimeZoneListener,
    torn_down: bool,
}

impl<H: Host> WatchFaceEngine<H> {
    pub fn new(config: Config, host: H) -> Self {
        let session_id = SessionId::next();
        let session = SessionState::new(host.current_time_zone());
        let scheduler = RedrawScheduler::new(session_id, config.schedule.interval_ms());
        log::debug!("Created watch face session {:?}", session_id);

        WatchFaceEngine {
            host,
            config,
            session,
            scheduler,
            time_zone_listener: TimeZoneListener::default(),
            torn_down: false,
        }
    }

    /// Dispatch one host event.
    pub fn handle(&mut self, event: HostEvent) {
        if self.torn_down {
            log::debug!("Session torn down, dropping {:?}", event);
            return;
        }

        match event {
            HostEvent::VisibilityChanged(visible) => self.on_visibility_changed(visible),
            HostEvent::AmbientModeChanged(is_ambient) => {
                mode::on_ambient_mode_changed(
                    &mut self.session,
                    &mut self.scheduler,
                    &mut self.host,
                    is_ambient,
                );
            }
            HostEvent::PropertiesDiscovered {
                reduced_color_display,
            } => {
                mode::on_properties_discovered(&mut self.session, reduced_color_display);
            }
            HostEvent::Tap { phase, x, y, .. } => {
                log::trace!("Tap {:?} at ({}, {})", phase, x, y);
                interaction::on_tap(&mut self.session, &mut self.host, phase);
            }
            HostEvent::TimezoneChanged(id) => {
                interaction::on_time_zone_changed(&mut self.session, id);
            }
            HostEvent::TimerFired(token) => {
                let should_run = self.session.wants_periodic_redraw();
                self.scheduler.on_fired(token, should_run, &mut self.host);
            }
            HostEvent::TimeTick => self.host.request_redraw(),
            HostEvent::WeatherUpdated(snapshot) => self.on_weather_updated(snapshot),
            HostEvent::Teardown => self.teardown(),
        }
    }

    /// Re-derive whether a wake should be pending and (re)arm it.
    pub fn reconcile(&mut self) {
        if self.torn_down {
            return;
        }
        let should_run = self.session.wants_periodic_redraw();
        self.scheduler.reconcile(should_run, &mut self.host);
    }

    /// Compose the frame for the current time.
    pub fn draw(&self, bounds: Size) -> Vec<Primitive> {
        let local_time = clock::local_time(self.host.now_millis(), &self.session.time_zone_id);
        layout::compose(&self.config, &self.session, bounds, local_time)
    }

    /// Paints matching the primitives [`WatchFaceEngine::draw`] returns right now.
    pub fn paints(&self) -> PaintSet {
        PaintSet::new(&self.config, self.session.text_anti_alias)
    }

    /// Cancel the pending wake, then release the timezone listener. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.scheduler.cancel(&mut self.host);
        self.time_zone_listener.release(&mut self.host);
        self.torn_down = true;
        log::debug!("Watch face session torn down");
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn pending_wake(&self) -> Option<&ScheduledWake> {
        self.scheduler.pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn on_visibility_changed(&mut self, visible: bool) {
        self.session.visible = visible;
        if visible {
            self.time_zone_listener.acquire(&mut self.host);
            interaction::on_became_visible(&mut self.session, &mut self.host);
        } else {
            self.time_zone_listener.release(&mut self.host);
        }
        self.reconcile();
    }

    fn on_weather_updated(&mut self, snapshot: Option<WeatherSnapshot>) {
        match &snapshot {
            Some(weather) => log::debug!(
                "Weather {} high {} low {} ({})",
                weather.weather_id,
                weather.high_temp_c,
                weather.low_temp_c,
                weather.location
            ),
            None => log::debug!("Weather cleared"),
        }
        self.session.weather = snapshot;
        if self.session.visible {
            self.host.request_redraw();
        }
    }
}

impl<H: Host> Drop for WatchFaceEngine<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
