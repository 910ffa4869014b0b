//! A distance-dates session: the range state, its mutation engine and its
//! derived duration.
//!
//! "Today" is captured once when the session is created and never
//! re-evaluated; anchors pin bounds to that date. The duration is computed
//! on read and cached until a write touches one of its inputs (`min`,
//! `max`, `unit`, `locale`), so every read after a write sees the new value.

use std::cell::Cell;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::json;
use url::Url;

use crate::artifact::{format_calendar_event_text, format_calendar_link};
use crate::calendar::{length_in, parse_iso, LocalizedDate};
use crate::config::DistanceDatesOptions;
use crate::error::Result;
use crate::relative::{create_date_time, RelativeDateRangeCalculate};
use crate::sequence::{date_sequence, DateSequence};
use crate::sink::{DiagnosticsSink, NoOpSink};
use crate::state::{Anchor, RangeField, RangeState, RANGE_FIELDS};
use crate::vocabulary::{assert_direction, Direction, DurationUnit};

/// `ceil` of the real-valued length of `[min, max)` in `unit`.
///
/// Rounds toward positive infinity, so `-1.2` becomes `-1`.
///
/// # Errors
///
/// Returns [`crate::DistanceError::DateParse`] if either bound is not an ISO date.
pub fn derive_duration(min: &str, max: &str, unit: DurationUnit) -> Result<i64> {
    let min = parse_iso(min)?;
    let max = parse_iso(max)?;
    Ok(length_in(min, max, unit)?.ceil() as i64)
}

pub struct DistanceDates {
    options: DistanceDatesOptions,
    tz: Tz,
    today: NaiveDate,
    state: RangeState,
    duration: Cell<Option<i64>>,
    sink: Box<dyn DiagnosticsSink>,
}

impl std::fmt::Debug for DistanceDates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceDates")
            .field("today", &self.today)
            .field("state", &self.state)
            .field("duration", &self.duration.get())
            .finish_non_exhaustive()
    }
}

impl DistanceDates {
    /// Start a session at `now` with diagnostics discarded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DistanceError::InvalidTimezone`] if the options name
    /// an unknown zone, and [`crate::DistanceError::Config`] if a calendar
    /// slot time is not `HHMMSS`.
    pub fn new(options: DistanceDatesOptions, now: DateTime<Utc>) -> Result<Self> {
        Self::with_sink(options, now, Box::new(NoOpSink))
    }

    /// Start a session at `now`, reporting to `sink`.
    ///
    /// # Errors
    ///
    /// See [`DistanceDates::new`].
    pub fn with_sink(
        options: DistanceDatesOptions,
        now: DateTime<Utc>,
        sink: Box<dyn DiagnosticsSink>,
    ) -> Result<Self> {
        options.validate()?;
        let tz = options.tz()?;
        let today = now.with_timezone(&tz).date_naive();
        let state = RangeState::new(
            options.default_direction,
            &today.format("%Y-%m-%d").to_string(),
            options.default_unit,
            options.locale.clone(),
        );

        sink.debug(
            "distance-dates: startup",
            Some(&json!({ "today": today.to_string(), "state": state.snapshot() })),
        );

        Ok(Self {
            options,
            tz,
            today,
            state,
            duration: Cell::new(None),
            sink,
        })
    }

    pub fn state(&self) -> &RangeState {
        &self.state
    }

    pub fn options(&self) -> &DistanceDatesOptions {
        &self.options
    }

    /// The date captured when the session started.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Set the direction, ignoring (and logging) anything but `FUTURE`/`PAST`.
    pub fn change_direction(&mut self, direction: &str) {
        self.sink
            .info(&format!("distance-dates: change_direction({direction})"), None);
        match assert_direction(direction) {
            Ok(direction) => self.state.set_direction(direction),
            Err(error) => self.sink.warn(
                &format!(
                    "distance-dates: change_direction({direction}): invalid direction: {error}"
                ),
                Some(&json!({ "direction": direction })),
            ),
        }
    }

    /// Apply a partial update.
    ///
    /// Unknown keys are skipped. Values that do not fit their field (an
    /// anchor other than `false`/`max`/`min`, an unknown direction or unit)
    /// are logged and skipped without affecting the rest of the changeset.
    /// Bounds and locale are stored verbatim. A valid `max`/`min` anchor in
    /// the changeset is resolved last, so it overrides an explicit bound in
    /// the same changeset.
    pub fn mutate<I, K, V>(&mut self, changeset: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let before = self.state.clone();
        let mut requested_anchor = None;

        for (key, value) in changeset {
            let Some(field) = RangeField::from_key(key.as_ref()) else {
                continue;
            };
            let value = value.as_ref();
            let applied = match field {
                RangeField::Direction => value
                    .parse::<Direction>()
                    .map(|d| self.state.set_direction(d)),
                RangeField::Unit => value
                    .parse::<DurationUnit>()
                    .map(|u| self.state.set_unit(u)),
                RangeField::Locale => {
                    self.state.set_locale(value);
                    Ok(())
                }
                RangeField::Min => {
                    self.state.set_min(value);
                    Ok(())
                }
                RangeField::Max => {
                    self.state.set_max(value);
                    Ok(())
                }
                RangeField::Anchor => Anchor::parse(value).map(|anchor| {
                    self.state.set_anchor(anchor);
                    requested_anchor = Some(anchor);
                }),
            };
            if let Err(error) = applied {
                self.sink.warn(
                    &format!("distance-dates: mutate: {error}"),
                    Some(&json!({ "field": field.as_str(), "value": value })),
                );
            }
        }

        let today = self.today.format("%Y-%m-%d").to_string();
        match requested_anchor.and_then(|anchor| anchor.field()) {
            Some(RangeField::Max) => self.state.set_max(today),
            Some(RangeField::Min) => self.state.set_min(today),
            _ => {}
        }

        if duration_inputs_changed(&before, &self.state) {
            self.duration.set(None);
        }

        self.sink.debug(
            "distance-dates: mutate",
            Some(&json!({ "before": before.snapshot(), "after": self.state.snapshot() })),
        );
    }

    /// The range's length in its unit, rounded up.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DistanceError::DateParse`] if a bound is not an ISO
    /// date. Failures are not cached.
    pub fn duration(&self) -> Result<i64> {
        if let Some(duration) = self.duration.get() {
            return Ok(duration);
        }
        let duration = derive_duration(self.state.min(), self.state.max(), self.state.unit())?;
        self.duration.set(Some(duration));
        self.sink.debug(
            "distance-dates: duration",
            Some(&json!({
                "duration": duration,
                "min": self.state.min(),
                "max": self.state.max(),
                "unit": self.state.unit(),
            })),
        );
        Ok(duration)
    }

    /// Candidate dates inside the range, `count` units apart, starting no
    /// earlier than the session's today.
    ///
    /// # Errors
    ///
    /// See [`date_sequence`].
    pub fn date_sequence(&self, count: u32, day_offset: i64) -> Result<DateSequence> {
        date_sequence(
            self.state.min(),
            self.state.max(),
            self.state.unit(),
            count,
            self.state.locale(),
            day_offset,
            self.today,
        )
    }

    /// Offset `now` (read in the session timezone) per `calculate`.
    ///
    /// # Errors
    ///
    /// See [`create_date_time`].
    pub fn relative_date(
        &self,
        now: DateTime<Utc>,
        calculate: &RelativeDateRangeCalculate,
    ) -> Result<LocalizedDate> {
        let local = now.with_timezone(&self.tz).naive_local();
        create_date_time(local, self.state.locale(), calculate)
    }

    /// See [`format_calendar_event_text`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::DistanceError::DateParse`] if a bound is not an ISO date.
    pub fn calendar_event_text(&self, date: NaiveDate) -> Result<String> {
        format_calendar_event_text(&self.state, date, &self.options)
    }

    /// See [`format_calendar_link`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::DistanceError::DateParse`] for a bad bound and
    /// [`crate::DistanceError::InvalidUrl`] for a bad base URL.
    pub fn calendar_link(&self, date: NaiveDate) -> Result<Url> {
        format_calendar_link(&self.state, date, &self.options)
    }
}

fn duration_inputs_changed(before: &RangeState, after: &RangeState) -> bool {
    RANGE_FIELDS
        .into_iter()
        .filter(RangeField::affects_duration)
        .any(|field| before.differs_in(after, field))
}

// ── Tests ───────────────────────────────────────────────────────────────────
