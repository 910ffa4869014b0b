//! Calendar-event artifacts derived from a range and a chosen date.
//!
//! - [`verbalize_duration_text`]: French phrase for an interval ("2 annés, 3 jours")
//! - [`format_calendar_event_text`]: the event description block
//! - [`format_calendar_link`]: the event-creation URL

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use url::Url;

use crate::calendar::{breakdown, format_long, parse_iso};
use crate::config::DistanceDatesOptions;
use crate::error::Result;
use crate::state::RangeState;
use crate::vocabulary::DurationUnit;

/// Units shown by default when verbalizing an interval.
pub const DEFAULT_VERBAL_UNITS: [DurationUnit; 3] =
    [DurationUnit::Years, DurationUnit::Months, DurationUnit::Days];

/// French (singular, plural) labels.
fn french_label(unit: DurationUnit) -> (&'static str, &'static str) {
    match unit {
        DurationUnit::Years => ("année", "annés"),
        DurationUnit::Quarters => ("trimestre", "trimestres"),
        DurationUnit::Months => ("mois", "mois"),
        DurationUnit::Weeks => ("semaine", "semaines"),
        DurationUnit::Days => ("jour", "jours"),
        DurationUnit::Hours => ("heure", "heures"),
        DurationUnit::Minutes => ("minute", "minutes"),
        DurationUnit::Seconds => ("seconde", "secondes"),
    }
}

fn french_quantity(n: i64, unit: DurationUnit) -> String {
    let (singular, plural) = french_label(unit);
    let label = if n.abs() == 1 { singular } else { plural };
    format!("{n} {label}")
}

/// Render `[start, end)` in the requested units, largest first.
///
/// Each component is rounded up; zero components are left out. When every
/// component is zero the smallest unit is shown as `0`, so the text is
/// never empty unless `units` is.
///
/// # Errors
///
/// Propagates [`crate::DistanceError::OutOfRange`] from the breakdown.
pub fn verbalize_duration_text(
    start: NaiveDateTime,
    end: NaiveDateTime,
    units: &[DurationUnit],
) -> Result<String> {
    let parts = breakdown(start, end, units)?;
    let Some(&(smallest, _)) = parts.last() else {
        return Ok(String::new());
    };

    let shown: Vec<String> = parts
        .into_iter()
        .map(|(unit, value)| (unit, value.ceil() as i64))
        .filter(|(_, n)| *n != 0)
        .map(|(unit, n)| french_quantity(n, unit))
        .collect();

    if shown.is_empty() {
        return Ok(french_quantity(0, smallest));
    }
    Ok(shown.join(", "))
}

/// The event description: the range's bounds in long form and how far
/// `date` is from the range's start.
///
/// Bounds are formatted under the range's locale, or `options.locale` when
/// the range's locale is empty or unknown.
///
/// # Errors
///
/// Returns [`crate::DistanceError::DateParse`] if a bound is not an ISO date.
pub fn format_calendar_event_text(
    range: &RangeState,
    date: NaiveDate,
    options: &DistanceDatesOptions,
) -> Result<String> {
    let min = parse_iso(range.min())?;
    let max = parse_iso(range.max())?;
    let target = date.and_time(NaiveTime::MIN);

    let start = format_long(&min, range.locale(), &options.locale);
    let end = format_long(&max, range.locale(), &options.locale);
    let elapsed = verbalize_duration_text(min, target, &DEFAULT_VERBAL_UNITS)?;

    Ok(format!("Début: {start}\nFin: {end}\nDepuis le début: {elapsed}"))
}

/// The `dates` parameter: a fixed evening slot on `date`.
pub fn calendar_slot(date: NaiveDate, options: &DistanceDatesOptions) -> String {
    let day = date.format("%Y%m%d");
    format!(
        "{day}T{}/{day}T{}",
        options.calendar.start_time, options.calendar.end_time
    )
}

/// Event-creation URL for `date`, described by [`format_calendar_event_text`].
///
/// # Errors
///
/// Returns [`crate::DistanceError::InvalidUrl`] if the configured base URL
/// does not parse, or the errors of [`format_calendar_event_text`].
pub fn format_calendar_link(
    range: &RangeState,
    date: NaiveDate,
    options: &DistanceDatesOptions,
) -> Result<Url> {
    let details = format_calendar_event_text(range, date, options)?;
    let dates = calendar_slot(date, options);
    let url = Url::parse_with_params(
        &options.calendar.base_url,
        &[
            ("action", "TEMPLATE"),
            ("ctz", options.calendar.ctz.as_str()),
            ("text", options.calendar.text.as_str()),
            ("details", details.as_str()),
            ("dates", dates.as_str()),
        ],
    )?;
    Ok(url)
}

// ── Tests ───────────────────────────────────────────────────────────────────
