//! Session options, loadable from TOML.
//!
//! Every key is optional; a missing key keeps its default. Timezones are
//! checked against the IANA database when options are loaded, so a session
//! never has to handle an unknown zone later.

use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{DistanceError, Result};
use crate::vocabulary::{Direction, DurationUnit};

/// Options a [`crate::DistanceDates`] session starts from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DistanceDatesOptions {
    pub default_direction: Direction,
    pub default_unit: DurationUnit,
    /// Initial locale, and the fallback for formatting when a range has none.
    pub locale: String,
    /// IANA zone "today" and "now" are read in.
    pub timezone: String,
    pub calendar: CalendarLinkOptions,
    pub logging: LoggingOptions,
}

impl Default for DistanceDatesOptions {
    fn default() -> Self {
        Self {
            default_direction: Direction::Future,
            default_unit: DurationUnit::Days,
            locale: "en-CA".into(),
            timezone: "America/Toronto".into(),
            calendar: CalendarLinkOptions::default(),
            logging: LoggingOptions::default(),
        }
    }
}

/// How calendar-event links are built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarLinkOptions {
    pub base_url: String,
    /// Value of the `ctz` parameter.
    pub ctz: String,
    /// Value of the `text` parameter (the event title).
    pub text: String,
    /// Slot start, `HHMMSS`.
    pub start_time: String,
    /// Slot end, `HHMMSS`.
    pub end_time: String,
}

impl Default for CalendarLinkOptions {
    fn default() -> Self {
        Self {
            base_url: "https://calendar.google.com/calendar/render".into(),
            ctz: "America/Toronto".into(),
            text: "Rappel".into(),
            start_time: "190000".into(),
            end_time: "200000".into(),
        }
    }
}

/// Log level and output format for front ends that install a subscriber.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingOptions {
    pub level: String,
    pub format: String,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl DistanceDatesOptions {
    /// Parse options from TOML text and validate them.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::Config`] for malformed TOML or unknown keys,
    /// and [`DistanceError::InvalidTimezone`] for an unknown zone.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let options: Self =
            toml::from_str(text).map_err(|e| DistanceError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Read and parse an options file.
    ///
    /// # Errors
    ///
    /// Same as [`DistanceDatesOptions::from_toml_str`], plus
    /// [`DistanceError::Config`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DistanceError::Config(format!("'{}': {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Check the timezones and the calendar slot times.
    ///
    /// # Errors
    ///
    /// See [`DistanceDatesOptions::from_toml_str`].
    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        parse_timezone(&self.calendar.ctz)?;
        for (key, value) in [
            ("calendar.start_time", &self.calendar.start_time),
            ("calendar.end_time", &self.calendar.end_time),
        ] {
            if chrono::NaiveTime::parse_from_str(value, "%H%M%S").is_err() {
                return Err(DistanceError::Config(format!(
                    "{key} must be HHMMSS, got '{value}'"
                )));
            }
        }
        Ok(())
    }

    /// The session timezone.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::InvalidTimezone`] if `timezone` is not an IANA name.
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}

/// Parse an IANA timezone string into `Tz`.
pub(crate) fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| DistanceError::InvalidTimezone(format!("'{}'", s)))
}

// ── Tests ───────────────────────────────────────────────────────────────────
