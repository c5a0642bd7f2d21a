//! # Sunshine Watch Face Simulator
//!
//! Hosts the watch face engine on a desktop: a tokio timer stands in for the wearable's
//! wake alarm and frames are printed to the terminal as ASCII art (or as the raw
//! primitive list with `--json`).
//!
//! Flags:
//! - `--config <path>`: load this config instead of `watchface-config.toml`
//! - `--frames <n>`: number of frames to present before tearing down (default 3)
//! - `--ambient`: switch to ambient mode after becoming visible (frames then follow the
//!   minute tick)
//! - `--json`: print primitives as JSON instead of ASCII art
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=debug`).

use anyhow::Context;
use embedded_graphics::geometry::Size;
use std::env;
use std::time::Duration;
use watch_face_lib::{
    clock,
    compositor::{render, FrameBuffer},
    config::Config,
    host::{Host, ScheduledWake},
    scheduler::next_deadline,
    HostEvent, WatchFaceEngine,
};

/// Ambient frames follow the host's minute tick.
const AMBIENT_TICK_MS: i64 = 60_000;

/// Terminal preview width in characters.
const PREVIEW_COLUMNS: u32 = 80;

struct Options {
    config_path: Option<String>,
    frames: usize,
    ambient: bool,
    json: bool,
}

impl Options {
    fn parse() -> anyhow::Result<Self> {
        let args: Vec<String> = env::args().skip(1).collect();
        let value_of = |flag: &str| {
            args.iter()
                .position(|arg| arg == flag)
                .and_then(|i| args.get(i + 1))
                .cloned()
        };

        let frames = match value_of("--frames") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("--frames expects a number, got {:?}", raw))?,
            None => 3,
        };

        Ok(Options {
            config_path: value_of("--config"),
            frames,
            ambient: args.iter().any(|arg| arg == "--ambient"),
            json: args.iter().any(|arg| arg == "--json"),
        })
    }
}

/// Desktop host: real clock, timer deadlines polled by the simulation loop.
struct SimulatorHost {
    time_zone: String,
    redraw_requested: bool,
    wake: Option<ScheduledWake>,
}

impl SimulatorHost {
    fn new(time_zone: String) -> Self {
        SimulatorHost {
            time_zone,
            redraw_requested: false,
            wake: None,
        }
    }

    fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}

impl Host for SimulatorHost {
    fn now_millis(&self) -> i64 {
        clock::now_millis()
    }

    fn current_time_zone(&self) -> String {
        self.time_zone.clone()
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    fn schedule_wake_at(&mut self, wake: ScheduledWake) {
        self.wake = Some(wake);
    }

    fn cancel_scheduled_wake(&mut self) {
        self.wake = None;
    }

    fn subscribe_time_zone_changes(&mut self) {
        log::debug!("Listening for timezone changes");
    }

    fn unsubscribe_time_zone_changes(&mut self) {
        log::debug!("Stopped listening for timezone changes");
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let options = Options::parse()?;

    let config = match &options.config_path {
        Some(path) => Config::try_load_from_path(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => Config::load(),
    };

    // Create Tokio runtime for the wake timer
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(simulate(config, &options))
}

async fn simulate(config: Config, options: &Options) -> anyhow::Result<()> {
    let bounds = Size::new(config.display.width, config.display.height);
    let reduced_color_display = config.display.reduced_color;
    let weather = config.weather.clone();
    let host = SimulatorHost::new(config.display.time_zone.clone());
    let mut engine = WatchFaceEngine::new(config, host);

    log::info!(
        "Simulating {}x{} face in {}",
        bounds.width,
        bounds.height,
        engine.session().time_zone_id
    );

    engine.handle(HostEvent::PropertiesDiscovered {
        reduced_color_display,
    });
    engine.handle(HostEvent::WeatherUpdated(weather));
    engine.handle(HostEvent::VisibilityChanged(true));
    if options.ambient {
        engine.handle(HostEvent::AmbientModeChanged(true));
    }

    let mut presented = 0;
    while presented < options.frames {
        if engine.host_mut().take_redraw() {
            present(&engine, bounds, options.json)?;
            presented += 1;
            continue;
        }

        match engine.host_mut().wake.take() {
            Some(wake) => {
                sleep_until(wake.deadline_ms).await;
                engine.handle(HostEvent::TimerFired(wake.token));
            }
            None => {
                sleep_until(next_deadline(clock::now_millis(), AMBIENT_TICK_MS)).await;
                engine.handle(HostEvent::TimeTick);
            }
        }
    }

    engine.handle(HostEvent::Teardown);
    Ok(())
}

async fn sleep_until(deadline_ms: i64) {
    let remaining = (deadline_ms - clock::now_millis()).max(0) as u64;
    tokio::time::sleep(Duration::from_millis(remaining)).await;
}

fn present(
    engine: &WatchFaceEngine<SimulatorHost>,
    bounds: Size,
    json: bool,
) -> anyhow::Result<()> {
    let primitives = engine.draw(bounds);

    if json {
        println!("{}", serde_json::to_string(&primitives)?);
        return Ok(());
    }

    let mut buffer = FrameBuffer::new(bounds.width, bounds.height).with_context(|| {
        format!("{}x{} display is too large to simulate", bounds.width, bounds.height)
    })?;
    render(&primitives, &engine.paints(), &mut buffer)?;

    let labels: Vec<&str> = primitives.iter().filter_map(|p| p.text()).collect();
    println!("{}", labels.join("  "));
    print!("{}", buffer.to_ascii(PREVIEW_COLUMNS));
    println!();
    Ok(())
}
