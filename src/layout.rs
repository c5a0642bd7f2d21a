//! # Layout & Draw Engine
//!
//! Pure function from session state, display bounds and local time to an ordered list
//! of draw primitives. Nothing here mutates state or caches metrics: every call
//! measures from scratch, so identical inputs always produce identical output and a
//! change of bounds can never leave stale geometry behind.
//!
//! ## Face Layout
//!
//! ```text
//! ┌──────────────────────────────┐
//! │                              │
//! │           14 : 07            │  hour right-aligned | separator | minute left-aligned
//! │       THU, OCT 15 2026       │  date, centered
//! │  ─ ─ ─ ─ ─ ──────── ─ ─ ─ ─  │  divider, middle quarter of the width (at H/2)
//! │     31°              20°     │  high / low, centered in left / right halves
//! │                              │
//! └──────────────────────────────┘
//! ```
//!
//! The separator is fixed-width: its slot is reserved even on frames where it is
//! hidden, so the digits never shift while it blinks.

use crate::align::{aligned_origin, text_bounds, HAlign, VAlign};
use crate::config::Config;
use crate::paint::{PaintId, PaintSet};
use crate::session::{BackgroundVariant, SessionState};
use crate::{Mode, WeatherSnapshot};
use chrono::{NaiveDateTime, Timelike};
use embedded_graphics::{prelude::*, primitives::Rectangle};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// One draw command, consumed in order by the host compositor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Primitive {
    /// Filled rectangle covering `[x0, x1) × [y0, y1)`
    Rect {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        paint: PaintId,
    },
    /// Text placed so `anchor` lands on the requested edge; `origin` is the resolved
    /// alphabetic-baseline start point to draw from
    Text {
        anchor_x: i32,
        anchor_y: i32,
        h_align: HAlign,
        v_align: VAlign,
        text: String,
        paint: PaintId,
        origin_x: i32,
        origin_y: i32,
    },
}

impl Primitive {
    pub fn paint(&self) -> PaintId {
        match self {
            Primitive::Rect { paint, .. } | Primitive::Text { paint, .. } => *paint,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Primitive::Text { text, .. } => Some(text),
            Primitive::Rect { .. } => None,
        }
    }
}

/// Whether the hour/minute separator is drawn on this frame.
///
/// Always on in ambient mode; in interactive mode it blinks with wall-clock second
/// parity, visible on even seconds.
pub fn separator_visible(mode: Mode, second: u32) -> bool {
    mode.is_ambient() || second % 2 == 0
}

/// Compose the face for one frame.
///
/// Returns an empty list for bounds with no area or too large for `i32` coordinates.
pub fn compose(
    config: &Config,
    session: &SessionState,
    bounds: Size,
    local_time: NaiveDateTime,
) -> Vec<Primitive> {
    let (width, height) = match (i32::try_from(bounds.width), i32::try_from(bounds.height)) {
        (Ok(width), Ok(height)) if width > 0 && height > 0 => (width, height),
        _ => {
            log::debug!("Nothing to compose for {}x{} bounds", bounds.width, bounds.height);
            return Vec::new();
        }
    };

    let paints = PaintSet::new(config, session.text_anti_alias);
    let ctx = Composer {
        config,
        paints: &paints,
        width,
        height,
    };
    let ambient = session.mode.is_ambient();

    let mut primitives = Vec::with_capacity(8);

    // 1. Background
    let background = if ambient {
        PaintId::BackgroundAmbient
    } else {
        match session.background_variant() {
            BackgroundVariant::Primary => PaintId::Background,
            BackgroundVariant::Alternate => PaintId::BackgroundAlt,
        }
    };
    primitives.push(Primitive::Rect {
        x0: 0,
        y0: 0,
        x1: ctx.width,
        y1: ctx.height,
        paint: background,
    });

    let center_x = ctx.width / 2;
    let mid_y = ctx.height / 2;
    let leading = config.layout.leading;

    // 2. Date, one leading-scaled line above the midpoint
    let date_paint = if ambient {
        PaintId::DateAmbient
    } else {
        PaintId::Date
    };
    let date_height = ctx.line_height(date_paint);
    let date_text = format_time(local_time, &config.format.date).to_uppercase();
    primitives.push(ctx.text(
        Point::new(center_x, mid_y - scale(date_height, leading)),
        HAlign::Center,
        VAlign::Top,
        date_text,
        date_paint,
    ));

    // 3. Hour and minute straddling the separator slot
    let time_height = ctx.line_height(PaintId::Minute);
    let time_top = mid_y - date_height - scale(time_height, leading);
    let separator_width = ctx.measure(&config.format.separator, PaintId::Separator).size.width as i32;
    let separator_left = center_x - separator_width / 2;
    let separator_right = separator_left + separator_width;

    primitives.push(ctx.text(
        Point::new(separator_left, time_top),
        HAlign::Right,
        VAlign::Top,
        format_time(local_time, &config.format.hour),
        PaintId::Hour,
    ));
    primitives.push(ctx.text(
        Point::new(separator_right, time_top),
        HAlign::Left,
        VAlign::Top,
        format_time(local_time, &config.format.minute),
        PaintId::Minute,
    ));

    // 4. Blinking separator
    if separator_visible(session.mode, local_time.second()) {
        primitives.push(ctx.text(
            Point::new(center_x, time_top + time_height / 2),
            HAlign::Center,
            VAlign::Middle,
            config.format.separator.clone(),
            PaintId::Separator,
        ));
    }

    // 5. Divider across the middle quarter
    let thickness = i32::try_from(config.layout.divider_thickness)
        .unwrap_or(i32::MAX)
        .clamp(1, ctx.height);
    let divider_top = mid_y - thickness / 2;
    primitives.push(Primitive::Rect {
        x0: eighths(ctx.width, 3),
        y0: divider_top,
        x1: eighths(ctx.width, 5),
        y1: divider_top + thickness,
        paint: PaintId::Divider,
    });

    // 6. Temperatures, only when a snapshot exists
    if let Some(weather) = session.weather.as_ref().filter(|w| has_readable_temperatures(w)) {
        primitives.extend(ctx.temperatures(weather, mid_y + scale(date_height, leading - 1.0)));
    }

    primitives
}

/// NaN or infinite readings would render as `NaN°`/`inf°`; such a snapshot draws no
/// temperature block.
fn has_readable_temperatures(weather: &WeatherSnapshot) -> bool {
    let readable = weather.high_temp_c.is_finite() && weather.low_temp_c.is_finite();
    if !readable {
        log::warn!(
            "Skipping temperatures {} / {}",
            weather.high_temp_c, weather.low_temp_c
        );
    }
    readable
}

/// `parts / 8` of `length`, computed without overflowing for any positive `i32`.
fn eighths(length: i32, parts: i64) -> i32 {
    (i64::from(length) * parts / 8) as i32
}

/// Round a temperature and append the configured unit, e.g. `31°`.
pub fn format_temperature(celsius: f64, unit: &str) -> String {
    let rounded = celsius.round();
    // -0.4 rounds to -0; show it as 0
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.0}{}", rounded, unit)
}

/// Format a local time with a strftime pattern, yielding an empty string for a
/// malformed pattern instead of panicking.
fn format_time(time: NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", time.format(pattern)).is_err() {
        log::warn!("Invalid time format {:?}", pattern);
        out.clear();
    }
    out
}

/// Offsets stay within a quarter of the `i32` range so anchors built from them
/// cannot overflow for any valid bounds and any configured leading.
fn scale(length: i32, factor: f32) -> i32 {
    const LIMIT: f32 = (i32::MAX / 4) as f32;
    (length as f32 * factor).round().clamp(-LIMIT, LIMIT) as i32
}

struct Composer<'a> {
    config: &'a Config,
    paints: &'a PaintSet,
    width: i32,
    height: i32,
}

impl Composer<'_> {
    fn measure(&self, text: &str, paint: PaintId) -> Rectangle {
        self.paints
            .get(paint)
            .text_style()
            .map(|style| text_bounds(text, &style))
            .unwrap_or_else(Rectangle::zero)
    }

    /// Glyph cell height of a text paint's font.
    fn line_height(&self, paint: PaintId) -> i32 {
        self.paints
            .get(paint)
            .font
            .map(|font| font.mono_font().character_size.height as i32)
            .unwrap_or(0)
    }

    fn text(
        &self,
        anchor: Point,
        h_align: HAlign,
        v_align: VAlign,
        text: String,
        paint: PaintId,
    ) -> Primitive {
        let bounds = self.measure(&text, paint);
        let origin = aligned_origin(anchor, bounds, h_align, v_align);
        Primitive::Text {
            anchor_x: anchor.x,
            anchor_y: anchor.y,
            h_align,
            v_align,
            text,
            paint,
            origin_x: origin.x,
            origin_y: origin.y,
        }
    }

    /// High in the left half, low in the right half, each centered in its column.
    fn temperatures(&self, weather: &WeatherSnapshot, top: i32) -> [Primitive; 2] {
        let unit = &self.config.format.temperature_unit;
        let column = self.width / 2;
        [
            self.text(
                Point::new(column / 2, top),
                HAlign::Center,
                VAlign::Top,
                format_temperature(weather.high_temp_c, unit),
                PaintId::HighTemperature,
            ),
            self.text(
                Point::new(column + column / 2, top),
                HAlign::Center,
                VAlign::Top,
                format_temperature(weather.low_temp_c, unit),
                PaintId::LowTemperature,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 15)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn weather(high: f64, low: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            weather_id: 800,
            high_temp_c: high,
            low_temp_c: low,
            location: "Lisbon".to_string(),
        }
    }

    fn texts(primitives: &[Primitive]) -> Vec<&str> {
        primitives.iter().filter_map(Primitive::text).collect()
    }

    fn count_paint(primitives: &[Primitive], paint: PaintId) -> usize {
        primitives.iter().filter(|p| p.paint() == paint).count()
    }

    #[test]
    fn test_scenario_no_weather() {
        let config = Config::default();
        let session = SessionState::new("UTC");
        let primitives = compose(&config, &session, Size::new(320, 320), at(14, 7, 32));

        assert_eq!(
            texts(&primitives),
            vec!["THU, OCT 15 2026", "14", "07", ":"],
            "date, hour, minute and separator (32 is even)"
        );
        assert_eq!(count_paint(&primitives, PaintId::HighTemperature), 0);
        assert_eq!(count_paint(&primitives, PaintId::LowTemperature), 0);
        assert_eq!(primitives.len(), 6);
    }

    #[test]
    fn test_draw_order() {
        let config = Config::default();
        let mut session = SessionState::new("UTC");
        session.weather = Some(weather(31.0, 20.0));
        let primitives = compose(&config, &session, Size::new(320, 320), at(14, 7, 32));

        let order: Vec<PaintId> = primitives.iter().map(Primitive::paint).collect();
        assert_eq!(
            order,
            vec![
                PaintId::Background,
                PaintId::Date,
                PaintId::Hour,
                PaintId::Minute,
                PaintId::Separator,
                PaintId::Divider,
                PaintId::HighTemperature,
                PaintId::LowTemperature,
            ]
        );
    }

    #[test]
    fn test_background_covers_bounds() {
        let config = Config::default();
        let session = SessionState::new("UTC");
        let primitives = compose(&config, &session, Size::new(390, 280), at(9, 0, 0));

        assert_eq!(
            primitives[0],
            Primitive::Rect {
                x0: 0,
                y0: 0,
                x1: 390,
                y1: 280,
                paint: PaintId::Background
            }
        );
    }

    #[test]
    fn test_scenario_weather_halves() {
        let config = Config::default();
        let mut session = SessionState::new("UTC");
        session.weather = Some(weather(31.0, 20.0));
        let primitives = compose(&config, &session, Size::new(320, 320), at(14, 7, 32));

        let temps: Vec<&Primitive> = primitives
            .iter()
            .filter(|p| {
                matches!(
                    p.paint(),
                    PaintId::HighTemperature | PaintId::LowTemperature
                )
            })
            .collect();
        assert_eq!(temps.len(), 2);

        let (divider_x0, divider_x1) = primitives
            .iter()
            .find_map(|p| match p {
                Primitive::Rect {
                    x0,
                    x1,
                    paint: PaintId::Divider,
                    ..
                } => Some((*x0, *x1)),
                _ => None,
            })
            .expect("divider should be drawn");

        match (temps[0], temps[1]) {
            (
                Primitive::Text {
                    anchor_x: high_x,
                    text: high,
                    ..
                },
                Primitive::Text {
                    anchor_x: low_x,
                    text: low,
                    ..
                },
            ) => {
                assert_eq!(high, "31°");
                assert_eq!(low, "20°");
                assert!(*high_x < 160, "high should sit in the left half");
                assert!(*low_x >= 160, "low should sit in the right half");
                assert!(*high_x < divider_x0 && divider_x1 < *low_x);
            }
            other => panic!("expected two text primitives, got {:?}", other),
        }
    }

    #[test]
    fn test_separator_blinks_with_second_parity() {
        let config = Config::default();
        let mut session = SessionState::new("UTC");

        for second in 0..60 {
            let primitives = compose(&config, &session, Size::new(320, 320), at(8, 30, second));
            let drawn = count_paint(&primitives, PaintId::Separator) == 1;
            assert_eq!(drawn, second % 2 == 0, "interactive second {}", second);
        }

        session.mode = Mode::Ambient;
        for second in 0..60 {
            let primitives = compose(&config, &session, Size::new(320, 320), at(8, 30, second));
            assert_eq!(
                count_paint(&primitives, PaintId::Separator),
                1,
                "ambient second {}",
                second
            );
        }
    }

    #[test]
    fn test_digits_do_not_move_when_separator_hides() {
        let config = Config::default();
        let session = SessionState::new("UTC");
        let even = compose(&config, &session, Size::new(320, 320), at(8, 30, 10));
        let odd = compose(&config, &session, Size::new(320, 320), at(8, 30, 11));

        let digits = |primitives: &[Primitive]| -> Vec<Primitive> {
            primitives
                .iter()
                .filter(|p| matches!(p.paint(), PaintId::Hour | PaintId::Minute))
                .cloned()
                .collect()
        };
        assert_eq!(digits(&even), digits(&odd));
    }

    #[test]
    fn test_hour_and_minute_straddle_center() {
        let config = Config::default();
        let session = SessionState::new("UTC");
        let primitives = compose(&config, &session, Size::new(320, 320), at(14, 7, 32));

        for primitive in &primitives {
            if let Primitive::Text {
                anchor_x,
                h_align,
                paint,
                ..
            } = primitive
            {
                match paint {
                    PaintId::Hour => {
                        assert_eq!(*h_align, HAlign::Right);
                        assert!(*anchor_x <= 160);
                    }
                    PaintId::Minute => {
                        assert_eq!(*h_align, HAlign::Left);
                        assert!(*anchor_x >= 160);
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_ambient_paints() {
        let config = Config::default();
        let mut session = SessionState::new("UTC");
        session.mode = Mode::Ambient;
        session.tap_count = 1;
        let primitives = compose(&config, &session, Size::new(320, 320), at(14, 7, 33));

        assert_eq!(primitives[0].paint(), PaintId::BackgroundAmbient);
        assert_eq!(count_paint(&primitives, PaintId::DateAmbient), 1);
        assert_eq!(count_paint(&primitives, PaintId::Date), 0);
    }

    #[test]
    fn test_tap_parity_selects_background() {
        let config = Config::default();
        let mut session = SessionState::new("UTC");
        for taps in 0..8u64 {
            session.tap_count = taps;
            let primitives = compose(&config, &session, Size::new(320, 320), at(1, 2, 3));
            let expected = if taps % 2 == 0 {
                PaintId::Background
            } else {
                PaintId::BackgroundAlt
            };
            assert_eq!(primitives[0].paint(), expected);
        }
    }

    #[test]
    fn test_compose_is_idempotent() {
        let config = Config::default();
        let mut session = SessionState::new("UTC");
        session.weather = Some(weather(-3.4, -11.6));
        let first = compose(&config, &session, Size::new(454, 454), at(23, 59, 58));
        let second = compose(&config, &session, Size::new(454, 454), at(23, 59, 58));

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_zero_bounds_yield_nothing() {
        let config = Config::default();
        let mut session = SessionState::new("UTC");
        session.weather = Some(weather(31.0, 20.0));

        assert!(compose(&config, &session, Size::new(0, 320), at(14, 7, 32)).is_empty());
        assert!(compose(&config, &session, Size::new(320, 0), at(14, 7, 32)).is_empty());
        assert!(compose(&config, &session, Size::zero(), at(14, 7, 32)).is_empty());
    }

    #[test]
    fn test_bounds_beyond_i32_yield_nothing() {
        let config = Config::default();
        let session = SessionState::new("UTC");

        assert!(compose(&config, &session, Size::new(u32::MAX, 1), at(14, 7, 32)).is_empty());
        assert!(compose(&config, &session, Size::new(320, u32::MAX), at(14, 7, 32)).is_empty());
    }

    #[test]
    fn test_huge_bounds_keep_divider_in_middle_quarter() {
        let config = Config::default();
        let mut session = SessionState::new("UTC");
        session.weather = Some(weather(31.0, 20.0));
        let primitives = compose(&config, &session, Size::new(1 << 30, 320), at(14, 7, 32));

        let divider = primitives
            .iter()
            .find(|p| p.paint() == PaintId::Divider)
            .expect("divider should be drawn");
        match divider {
            Primitive::Rect { x0, x1, .. } => {
                assert_eq!(*x0, 3 << 27);
                assert_eq!(*x1, 5 << 27);
            }
            other => panic!("divider should be a rect, got {:?}", other),
        }
        assert_eq!(count_paint(&primitives, PaintId::HighTemperature), 1);
    }

    #[test]
    fn test_extreme_leading_and_thickness_do_not_overflow() {
        let mut config = Config::default();
        config.layout.leading = f32::MAX;
        config.layout.divider_thickness = u32::MAX;
        let mut session = SessionState::new("UTC");
        session.weather = Some(weather(31.0, 20.0));

        let primitives = compose(&config, &session, Size::new(i32::MAX as u32, 320), at(14, 7, 32));
        assert_eq!(texts(&primitives).len(), 6);

        config.layout.leading = f32::MIN;
        let primitives = compose(&config, &session, Size::new(320, 320), at(14, 7, 32));
        assert_eq!(texts(&primitives).len(), 6);
    }

    #[test]
    fn test_non_finite_temperatures_are_not_drawn() {
        let config = Config::default();
        let mut session = SessionState::new("UTC");

        for (high, low) in [(f64::NAN, 20.0), (31.0, f64::INFINITY), (f64::NEG_INFINITY, f64::NAN)] {
            session.weather = Some(weather(high, low));
            let primitives = compose(&config, &session, Size::new(320, 320), at(14, 7, 32));

            assert_eq!(count_paint(&primitives, PaintId::HighTemperature), 0);
            assert_eq!(count_paint(&primitives, PaintId::LowTemperature), 0);
            assert!(texts(&primitives).iter().all(|t| !t.contains("NaN") && !t.contains("inf")));
        }
    }

    #[test]
    fn test_invalid_format_renders_empty_text() {
        let mut config = Config::default();
        config.format.date = "%Q %".to_string();
        let session = SessionState::new("UTC");
        let primitives = compose(&config, &session, Size::new(320, 320), at(14, 7, 32));

        assert_eq!(primitives[1].text(), Some(""));
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(31.0, "°"), "31°");
        assert_eq!(format_temperature(19.6, "°"), "20°");
        assert_eq!(format_temperature(-0.4, "°"), "0°");
        assert_eq!(format_temperature(-7.5, "C"), "-8C");
    }
}
