//! Paints referenced by draw primitives.
//!
//! Primitives only carry a [`PaintId`]. The matching [`Paint`] (color, font,
//! anti-aliasing) is resolved from the config palette and the current session through
//! [`PaintSet`], so the layout never has to know about colors.

use crate::config::{Config, FontChoice};
use embedded_graphics::mono_font::{iso_8859_1, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use serde::{Deserialize, Serialize};

/// Identifies a paint in a [`PaintSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaintId {
    Background,
    BackgroundAlt,
    BackgroundAmbient,
    Date,
    DateAmbient,
    Hour,
    Minute,
    Separator,
    Divider,
    HighTemperature,
    LowTemperature,
}

impl PaintId {
    /// Paints used to draw text; these follow the session's anti-aliasing flag.
    pub const TEXT: [PaintId; 7] = [
        PaintId::Date,
        PaintId::DateAmbient,
        PaintId::Hour,
        PaintId::Minute,
        PaintId::Separator,
        PaintId::HighTemperature,
        PaintId::LowTemperature,
    ];

    pub fn is_text(self) -> bool {
        Self::TEXT.contains(&self)
    }
}

/// A resolved paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Rgb888,
    /// Font for text paints, `None` for fills
    pub font: Option<FontChoice>,
    pub anti_alias: bool,
}

impl Paint {
    fn fill(color: Rgb888) -> Self {
        Paint {
            color,
            font: None,
            anti_alias: false,
        }
    }

    fn text(color: Rgb888, font: FontChoice, anti_alias: bool) -> Self {
        Paint {
            color,
            font: Some(font),
            anti_alias,
        }
    }

    /// Character style for drawing and measuring, if this is a text paint.
    pub fn text_style(&self) -> Option<MonoTextStyle<'static, Rgb888>> {
        self.font
            .map(|font| MonoTextStyle::new(font.mono_font(), self.color))
    }
}

impl FontChoice {
    /// Bundled Latin-1 font for this choice (Latin-1 so the degree sign renders).
    pub fn mono_font(self) -> &'static MonoFont<'static> {
        match self {
            FontChoice::Small => &iso_8859_1::FONT_6X10,
            FontChoice::Medium => &iso_8859_1::FONT_9X15,
            FontChoice::MediumBold => &iso_8859_1::FONT_9X15_BOLD,
            FontChoice::Large => &iso_8859_1::FONT_10X20,
            FontChoice::LargeBold => &iso_8859_1::FONT_9X18_BOLD,
        }
    }
}

/// Convert a `0xRRGGBB` value into a color.
pub fn rgb(hex: u32) -> Rgb888 {
    Rgb888::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Every paint the face uses, resolved for one anti-aliasing state.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintSet {
    background: Paint,
    background_alt: Paint,
    background_ambient: Paint,
    date: Paint,
    date_ambient: Paint,
    hour: Paint,
    minute: Paint,
    divider: Paint,
    high_temperature: Paint,
    low_temperature: Paint,
}

impl PaintSet {
    pub fn new(config: &Config, text_anti_alias: bool) -> Self {
        let palette = &config.palette;
        let fonts = &config.fonts;
        let text = rgb(palette.text);
        let dim = rgb(palette.text_dim);

        PaintSet {
            background: Paint::fill(rgb(palette.background)),
            background_alt: Paint::fill(rgb(palette.background_alt)),
            background_ambient: Paint::fill(rgb(palette.background_ambient)),
            date: Paint::text(text, fonts.date, text_anti_alias),
            date_ambient: Paint::text(dim, fonts.date, text_anti_alias),
            hour: Paint::text(text, fonts.hour, text_anti_alias),
            minute: Paint::text(text, fonts.minute, text_anti_alias),
            divider: Paint::fill(dim),
            high_temperature: Paint::text(text, fonts.temperature, text_anti_alias),
            low_temperature: Paint::text(dim, fonts.temperature, text_anti_alias),
        }
    }

    pub fn get(&self, id: PaintId) -> &Paint {
        match id {
            PaintId::Background => &self.background,
            PaintId::BackgroundAlt => &self.background_alt,
            PaintId::BackgroundAmbient => &self.background_ambient,
            PaintId::Date => &self.date,
            PaintId::DateAmbient => &self.date_ambient,
            PaintId::Hour => &self.hour,
            // The separator is measured and drawn with the minute paint
            PaintId::Minute | PaintId::Separator => &self.minute,
            PaintId::Divider => &self.divider,
            PaintId::HighTemperature => &self.high_temperature,
            PaintId::LowTemperature => &self.low_temperature,
        }
    }
}
