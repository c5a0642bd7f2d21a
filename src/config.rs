//! # Configuration Management
//!
//! This module handles loading and parsing the watch face configuration from
//! `watchface-config.toml`. Colors, fonts, format strings and layout constants all live
//! here and are handed to the engine once at construction; nothing in the engine reads
//! process-wide style state.

use crate::WeatherSnapshot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Default config file name, resolved relative to the working directory
pub const CONFIG_FILE: &str = "watchface-config.toml";

/// Errors raised while reading or writing the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config IO: {0}")]
    Io(#[from] io::Error),

    /// File contents are not a valid config
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// File parsed but holds a value the face cannot run with
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Watch face configuration loaded from `watchface-config.toml`.
///
/// Every section has defaults, so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Face colors
    pub palette: PaletteConfig,
    /// Font per text role
    pub fonts: FontConfig,
    /// Date/time/temperature formatting
    pub format: FormatConfig,
    /// Layout constants
    pub layout: LayoutConfig,
    /// Redraw cadence
    pub schedule: ScheduleConfig,
    /// Simulator display settings
    pub display: DisplayConfig,
    /// Optional weather snapshot the simulator feeds to the engine
    pub weather: Option<WeatherSnapshot>,
}

/// Face colors as 24-bit `0xRRGGBB` values.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Interactive background after an even number of taps
    pub background: u32,
    /// Interactive background after an odd number of taps
    pub background_alt: u32,
    /// Ambient background; keep this dark
    pub background_ambient: u32,
    /// Primary text
    pub text: u32,
    /// Dimmed text (ambient date, low temperature, divider)
    pub text_dim: u32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        PaletteConfig {
            background: 0x03A9F4,
            background_alt: 0x0288D1,
            background_ambient: 0x000000,
            text: 0xFFFFFF,
            text_dim: 0xB3E5FC,
        }
    }
}

/// Bundled mono fonts a text role can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontChoice {
    /// 6x10
    Small,
    /// 9x15
    Medium,
    /// 9x15 bold
    MediumBold,
    /// 10x20
    Large,
    /// 9x18 bold
    LargeBold,
}

/// Font per text role.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FontConfig {
    pub date: FontChoice,
    pub hour: FontChoice,
    pub minute: FontChoice,
    pub temperature: FontChoice,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            date: FontChoice::Small,
            hour: FontChoice::LargeBold,
            minute: FontChoice::Large,
            temperature: FontChoice::Medium,
        }
    }
}

/// Format strings (chrono `strftime` syntax for date and time fields).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Date line, upper-cased before drawing (e.g. "WED, OCT 15 2026")
    pub date: String,
    pub hour: String,
    pub minute: String,
    /// Glyph between hour and minute
    pub separator: String,
    /// Appended to rounded temperatures
    pub temperature_unit: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            date: "%a, %b %d %Y".to_string(),
            hour: "%H".to_string(),
            minute: "%M".to_string(),
            separator: ":".to_string(),
            temperature_unit: "°".to_string(),
        }
    }
}

/// Layout constants.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Line spacing as a multiple of the date line's glyph height
    pub leading: f32,
    /// Divider thickness in pixels
    pub divider_thickness: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            leading: 1.8,
            divider_thickness: 2,
        }
    }
}

/// Redraw cadence while interactive and visible.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Interactive redraw interval in milliseconds; deadlines align to multiples of it.
    /// Only [`ScheduleConfig::REDRAW_INTERVAL_MS`] is accepted: the separator blinks on
    /// second parity and needs one redraw per wall-clock second.
    pub interactive_update_ms: i64,
}

impl ScheduleConfig {
    pub const REDRAW_INTERVAL_MS: i64 = 1000;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interactive_update_ms != Self::REDRAW_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "schedule.interactive_update_ms must be {}, got {}",
                Self::REDRAW_INTERVAL_MS,
                self.interactive_update_ms
            )));
        }
        Ok(())
    }

    /// Interval the scheduler should run at; a rejected value falls back to the default.
    pub fn interval_ms(&self) -> i64 {
        match self.validate() {
            Ok(()) => self.interactive_update_ms,
            Err(e) => {
                log::warn!("{}, using {} ms", e, Self::REDRAW_INTERVAL_MS);
                Self::REDRAW_INTERVAL_MS
            }
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            interactive_update_ms: Self::REDRAW_INTERVAL_MS,
        }
    }
}

/// Simulator display settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Display width in pixels
    pub width: u32,
    /// Display height in pixels
    pub height: u32,
    /// Whether the simulated panel is a reduced-color (low-bit) ambient display
    pub reduced_color: bool,
    /// IANA timezone the simulated device reports
    pub time_zone: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 320,
            height: 320,
            reduced_color: false,
            time_zone: "UTC".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `watchface-config.toml`.
    /// Falls back to the default configuration if the file is missing or invalid.
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from the given path.
    /// Falls back to the default configuration if the file is missing or invalid.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_path(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.as_ref().display());
                config
            }
            Err(ConfigError::Io(_)) => {
                log::info!("No config file found, using default configuration");
                Self::default()
            }
            Err(e) => {
                log::warn!("Invalid config file format: {}", e);
                log::warn!("Using default configuration");
                Self::default()
            }
        }
    }

    /// Load configuration from the given path, surfacing every failure.
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str::<Config>(&contents)?;
        config.schedule.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty TOML.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.format.hour, "%H");
        assert_eq!(config.format.separator, ":");
        assert_eq!(config.schedule.interactive_update_ms, 1000);
        assert_eq!(config.layout.leading, 1.8);
        assert_eq!(config.palette.background_ambient, 0x000000);
        assert!(config.weather.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.weather = Some(WeatherSnapshot {
            weather_id: 500,
            high_temp_c: 31.0,
            low_temp_c: 20.0,
            location: "Lisbon".to_string(),
        });
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str(
            r#"
[display]
width = 390
time_zone = "Europe/Lisbon"

[fonts]
hour = "medium_bold"
"#,
        )
        .unwrap();

        assert_eq!(parsed.display.width, 390);
        assert_eq!(parsed.display.height, 320);
        assert_eq!(parsed.display.time_zone, "Europe/Lisbon");
        assert_eq!(parsed.fonts.hour, FontChoice::MediumBold);
        assert_eq!(parsed.fonts.minute, FontChoice::Large);
        assert_eq!(parsed.format, FormatConfig::default());
    }

    #[test]
    fn test_weather_section_accepts_phone_keys() {
        let parsed: Config = toml::from_str(
            r#"
[weather]
weather_id = 800
max_temp = 31.0
min_temp = 20.0
location = "Mountain View"
"#,
        )
        .unwrap();

        let weather = parsed.weather.expect("weather section should parse");
        assert_eq!(weather.weather_id, 800);
        assert_eq!(weather.high_temp_c, 31.0);
        assert_eq!(weather.low_temp_c, 20.0);
    }

    #[test]
    fn test_redraw_interval_other_than_one_second_is_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[schedule]\ninteractive_update_ms = 2000").unwrap();

        let result = Config::try_load_from_path(temp_file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))), "got {:?}", result);

        let fallback = Config::load_from_path(temp_file.path());
        assert_eq!(fallback, Config::default());
    }

    #[test]
    fn test_interval_ms_ignores_rejected_value() {
        let schedule = ScheduleConfig {
            interactive_update_ms: 2000,
        };
        assert_eq!(schedule.interval_ms(), 1000);
        assert_eq!(ScheduleConfig::default().interval_ms(), 1000);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.display.reduced_color = true;
        config.palette.background = 0x123456;

        config.save_to_path(temp_file.path()).unwrap();
        let reloaded = Config::try_load_from_path(temp_file.path()).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[display\nwidth = ").unwrap();

        assert!(matches!(
            Config::try_load_from_path(temp_file.path()),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(Config::load_from_path(temp_file.path()), Config::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }
}
