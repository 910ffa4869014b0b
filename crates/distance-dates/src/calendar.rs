//! Calendar primitives the rest of the crate is built on.
//!
//! Every date in a range is a local wall-clock [`NaiveDateTime`]: bounds are
//! ISO 8601 dates (midnight) or datetimes without an offset, so arithmetic
//! here never crosses a DST transition. Timezones only enter when "today" or
//! "now" is read from a clock, which callers do before reaching this module.
//!
//! # Functions
//!
//! - [`parse_iso`]: ISO date or datetime string → [`NaiveDateTime`]
//! - [`add_units`]: add a signed count of a [`DurationUnit`]
//! - [`length_in`]: real-valued interval length in a unit
//! - [`breakdown`]: split an interval into several units
//! - [`format_long`]: long, locale-aware date text

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::error::{DistanceError, Result};
use crate::vocabulary::DurationUnit;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

// ── parse_iso ───────────────────────────────────────────────────────────────

/// Parse an ISO 8601 date (`2020-01-31`) or local datetime (`2020-01-31T18:30`).
///
/// A bare date resolves to midnight.
///
/// # Errors
///
/// Returns [`DistanceError::DateParse`] if `value` matches none of the
/// accepted shapes or names an impossible calendar date.
pub fn parse_iso(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| DistanceError::DateParse(format!("'{value}' is not an ISO 8601 date")))
}

/// Render a datetime back to the ISO date form stored in a range.
pub fn to_iso_date(value: &NaiveDateTime) -> String {
    value.date().format("%Y-%m-%d").to_string()
}

// ── add_units ───────────────────────────────────────────────────────────────

/// Add `amount` (negative to subtract) of `unit` to `value`.
///
/// Month-based units clamp to the last day of the target month, so
/// `2020-01-31 + 1 month` is `2020-02-29`.
///
/// # Errors
///
/// Returns [`DistanceError::OutOfRange`] when the result does not fit in
/// the supported calendar.
pub fn add_units(value: NaiveDateTime, unit: DurationUnit, amount: i64) -> Result<NaiveDateTime> {
    let out_of_range =
        || DistanceError::OutOfRange(format!("{value} {amount:+} {unit} is out of range"));

    match (unit.months(), unit.seconds()) {
        (Some(months), _) => {
            let total = amount.checked_mul(i64::from(months)).ok_or_else(out_of_range)?;
            let magnitude = u32::try_from(total.unsigned_abs()).map_err(|_| out_of_range())?;
            let shifted = if total >= 0 {
                value.checked_add_months(Months::new(magnitude))
            } else {
                value.checked_sub_months(Months::new(magnitude))
            };
            shifted.ok_or_else(out_of_range)
        }
        (None, Some(seconds)) => {
            let total = amount.checked_mul(seconds).ok_or_else(out_of_range)?;
            let delta = TimeDelta::try_seconds(total).ok_or_else(out_of_range)?;
            value.checked_add_signed(delta).ok_or_else(out_of_range)
        }
        (None, None) => Err(out_of_range()),
    }
}

// ── length_in ───────────────────────────────────────────────────────────────

/// The real-valued length of `[start, end)` expressed in `unit`.
///
/// Whole units are counted by stepping from `start`; the remainder is the
/// fraction of the next step that has elapsed. The result is negative when
/// `end` is before `start`, with the magnitude measured from `end` forward.
///
/// # Errors
///
/// Propagates [`DistanceError::OutOfRange`] from stepping near the calendar limits.
pub fn length_in(start: NaiveDateTime, end: NaiveDateTime, unit: DurationUnit) -> Result<f64> {
    if end < start {
        return Ok(-length_in(end, start, unit)?);
    }

    if let Some(seconds) = unit.seconds() {
        return Ok(millis_between(start, end) / (seconds as f64 * 1000.0));
    }

    let whole = whole_units(start, end, unit)?;
    let lower = add_units(start, unit, whole)?;
    let upper = add_units(start, unit, whole + 1)?;
    let step = millis_between(lower, upper);
    let fraction = if step > 0.0 {
        millis_between(lower, end) / step
    } else {
        0.0
    };
    Ok(whole as f64 + fraction)
}

/// The largest `n` such that `start + n * unit <= end`, for `start <= end`.
fn whole_units(start: NaiveDateTime, end: NaiveDateTime, unit: DurationUnit) -> Result<i64> {
    if let Some(seconds) = unit.seconds() {
        return Ok((end - start).num_seconds().div_euclid(seconds));
    }

    let months = i64::from(unit.months().unwrap_or(1));
    let span = month_index(&end) - month_index(&start);
    let mut n = span.div_euclid(months).max(0);
    while n > 0 && add_units(start, unit, n)? > end {
        n -= 1;
    }
    while add_units(start, unit, n + 1)? <= end {
        n += 1;
    }
    Ok(n)
}

fn millis_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64
}

/// Months elapsed since year 0, used to estimate month-based steps.
fn month_index(value: &NaiveDateTime) -> i64 {
    i64::from(value.year()) * 12 + i64::from(value.month0())
}

// ── breakdown ───────────────────────────────────────────────────────────────

/// Split `[start, end)` into the given units, largest first.
///
/// Every unit but the smallest receives a whole count; the smallest receives
/// the real-valued remainder. Units are deduplicated and reordered, so
/// `[days, years]` behaves like `[years, days]`. An interval running
/// backwards yields negated components.
///
/// # Errors
///
/// Propagates [`DistanceError::OutOfRange`] from stepping near the calendar limits.
pub fn breakdown(
    start: NaiveDateTime,
    end: NaiveDateTime,
    units: &[DurationUnit],
) -> Result<Vec<(DurationUnit, f64)>> {
    if end < start {
        return Ok(breakdown(end, start, units)?
            .into_iter()
            .map(|(unit, value)| (unit, -value))
            .collect());
    }

    let mut ordered = units.to_vec();
    ordered.sort();
    ordered.dedup();

    let mut parts = Vec::with_capacity(ordered.len());
    let mut cursor = start;
    let last = ordered.len().saturating_sub(1);
    for (i, unit) in ordered.into_iter().enumerate() {
        if i == last {
            parts.push((unit, length_in(cursor, end, unit)?));
        } else {
            let n = whole_units(cursor, end, unit)?;
            cursor = add_units(cursor, unit, n)?;
            parts.push((unit, n as f64));
        }
    }
    Ok(parts)
}

// ── format_long ─────────────────────────────────────────────────────────────

/// Map a BCP 47 style tag (`fr-CA`) to a chrono locale, if one exists.
pub fn resolve_locale(tag: &str) -> Option<chrono::Locale> {
    let normalized = tag.trim().replace('-', "_");
    chrono::Locale::try_from(normalized.as_str()).ok()
}

/// Long date text for `value` under `locale`, e.g. `January 4, 2020` for
/// `en-CA` or `4 janvier 2020` for `fr-CA`.
///
/// Tags chrono has no data for fall back to `fallback`, then to POSIX.
pub fn format_long(value: &NaiveDateTime, locale: &str, fallback: &str) -> String {
    let (tag, resolved) = match resolve_locale(locale) {
        Some(resolved) => (locale, resolved),
        None => (
            fallback,
            resolve_locale(fallback).unwrap_or(chrono::Locale::POSIX),
        ),
    };
    let language = tag.split(['-', '_']).next().unwrap_or_default();
    let pattern = match language {
        "fr" | "es" | "it" | "pt" => "%-d %B %Y",
        "de" => "%-d. %B %Y",
        _ => "%B %-d, %Y",
    };
    Utc.from_utc_datetime(value)
        .format_localized(pattern, resolved)
        .to_string()
}

// ── LocalizedDate ───────────────────────────────────────────────────────────

/// A wall-clock datetime paired with the locale it should be shown in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedDate {
    pub value: NaiveDateTime,
    pub locale: String,
}

impl LocalizedDate {
    pub fn new(value: NaiveDateTime, locale: impl Into<String>) -> Self {
        Self {
            value,
            locale: locale.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.value.date()
    }

    pub fn to_iso_date(&self) -> String {
        to_iso_date(&self.value)
    }

    /// See [`format_long`].
    pub fn format_long(&self, fallback: &str) -> String {
        format_long(&self.value, &self.locale, fallback)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_iso(s).unwrap()
    }

    // ── parse_iso tests ─────────────────────────────────────────────────

    #[test]
    fn test_parse_iso_date_is_midnight() {
        let dt = at("2020-01-31");
        assert_eq!(dt.to_string(), "2020-01-31 00:00:00");
    }

    #[test]
    fn test_parse_iso_datetime_variants() {
        assert_eq!(at("2020-01-31T18:30").to_string(), "2020-01-31 18:30:00");
        assert_eq!(at("2020-01-31T18:30:15").to_string(), "2020-01-31 18:30:15");
        assert_eq!(
            at("2020-01-31T18:30:15.250").to_string(),
            "2020-01-31 18:30:15.250"
        );
    }

    #[test]
    fn test_parse_iso_rejects_garbage() {
        let err = parse_iso("not-a-date").unwrap_err();
        assert!(matches!(err, DistanceError::DateParse(_)));
        assert!(err.to_string().contains("not-a-date"), "got: {err}");
    }

    #[test]
    fn test_parse_iso_rejects_impossible_date() {
        assert!(parse_iso("2021-02-29").is_err());
        assert!(parse_iso("2020-13-01").is_err());
    }

    #[test]
    fn test_to_iso_date() {
        assert_eq!(to_iso_date(&at("2020-03-04T10:00")), "2020-03-04");
    }

    // ── add_units tests ─────────────────────────────────────────────────

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(
            add_units(at("2020-01-31"), DurationUnit::Months, 1).unwrap(),
            at("2020-02-29")
        );
        assert_eq!(
            add_units(at("2020-03-31"), DurationUnit::Months, -1).unwrap(),
            at("2020-02-29")
        );
    }

    #[test]
    fn test_add_quarters_and_years() {
        assert_eq!(
            add_units(at("2020-01-15"), DurationUnit::Quarters, 2).unwrap(),
            at("2020-07-15")
        );
        assert_eq!(
            add_units(at("2020-02-29"), DurationUnit::Years, 1).unwrap(),
            at("2021-02-28")
        );
    }

    #[test]
    fn test_add_fixed_units() {
        assert_eq!(
            add_units(at("2020-01-01"), DurationUnit::Weeks, 2).unwrap(),
            at("2020-01-15")
        );
        assert_eq!(
            add_units(at("2020-01-01"), DurationUnit::Hours, -1).unwrap(),
            at("2019-12-31T23:00")
        );
        assert_eq!(
            add_units(at("2020-01-01"), DurationUnit::Seconds, 90).unwrap(),
            at("2020-01-01T00:01:30")
        );
    }

    #[test]
    fn test_add_units_out_of_range() {
        let err = add_units(at("2020-01-01"), DurationUnit::Years, i64::MAX).unwrap_err();
        assert!(matches!(err, DistanceError::OutOfRange(_)), "got: {err}");
    }

    // ── length_in tests ─────────────────────────────────────────────────

    #[test]
    fn test_length_in_days_exact() {
        let len = length_in(at("2020-01-01"), at("2020-01-10"), DurationUnit::Days).unwrap();
        assert_eq!(len, 9.0);
    }

    #[test]
    fn test_length_in_weeks_fractional() {
        let len = length_in(at("2020-01-01"), at("2020-01-11"), DurationUnit::Weeks).unwrap();
        assert!((len - 10.0 / 7.0).abs() < 1e-9, "got {len}");
    }

    #[test]
    fn test_length_in_months_fraction_of_next_month() {
        // Jan 1 + 1 month = Feb 1; Feb has 29 days in 2020, 14.5 of them elapsed
        let len =
            length_in(at("2020-01-01"), at("2020-02-15T12:00"), DurationUnit::Months).unwrap();
        assert!((len - (1.0 + 14.5 / 29.0)).abs() < 1e-9, "got {len}");
    }

    #[test]
    fn test_length_in_years() {
        let len = length_in(at("2020-01-01"), at("2022-01-01"), DurationUnit::Years).unwrap();
        assert_eq!(len, 2.0);
        let len = length_in(at("2020-01-01"), at("2020-07-01"), DurationUnit::Quarters).unwrap();
        assert_eq!(len, 2.0);
    }

    #[test]
    fn test_length_in_negative_when_reversed() {
        let len = length_in(at("2020-01-10"), at("2020-01-01"), DurationUnit::Weeks).unwrap();
        assert!((len + 9.0 / 7.0).abs() < 1e-9, "got {len}");
    }

    #[test]
    fn test_length_in_month_end_start() {
        // Jan 31 + 1 month clamps to Feb 29, which is before Mar 1
        let len = length_in(at("2020-01-31"), at("2020-03-01"), DurationUnit::Months).unwrap();
        assert!(len > 1.0 && len < 2.0, "got {len}");
    }

    // ── breakdown tests ─────────────────────────────────────────────────

    #[test]
    fn test_breakdown_years_months_days() {
        let parts = breakdown(
            at("2020-01-01"),
            at("2022-01-04"),
            &[DurationUnit::Years, DurationUnit::Months, DurationUnit::Days],
        )
        .unwrap();
        assert_eq!(
            parts,
            vec![
                (DurationUnit::Years, 2.0),
                (DurationUnit::Months, 0.0),
                (DurationUnit::Days, 3.0)
            ]
        );
    }

    #[test]
    fn test_breakdown_reorders_and_dedups_units() {
        let parts = breakdown(
            at("2020-01-01"),
            at("2020-02-10"),
            &[DurationUnit::Days, DurationUnit::Months, DurationUnit::Days],
        )
        .unwrap();
        assert_eq!(
            parts,
            vec![(DurationUnit::Months, 1.0), (DurationUnit::Days, 9.0)]
        );
    }

    #[test]
    fn test_breakdown_smallest_unit_keeps_fraction() {
        let parts = breakdown(
            at("2020-01-01"),
            at("2020-01-03T12:00"),
            &[DurationUnit::Weeks, DurationUnit::Days],
        )
        .unwrap();
        assert_eq!(parts[0], (DurationUnit::Weeks, 0.0));
        assert_eq!(parts[1], (DurationUnit::Days, 2.5));
    }

    #[test]
    fn test_breakdown_reversed_is_negated() {
        let parts = breakdown(at("2020-01-04"), at("2020-01-01"), &[DurationUnit::Days]).unwrap();
        assert_eq!(parts, vec![(DurationUnit::Days, -3.0)]);
    }

    // ── format_long tests ───────────────────────────────────────────────

    #[test]
    fn test_format_long_english() {
        assert_eq!(format_long(&at("2020-01-04"), "en-CA", "en-CA"), "January 4, 2020");
    }

    #[test]
    fn test_format_long_french() {
        assert_eq!(format_long(&at("2020-01-04"), "fr-CA", "en-CA"), "4 janvier 2020");
    }

    #[test]
    fn test_format_long_unknown_locale_uses_fallback() {
        assert_eq!(format_long(&at("2020-01-04"), "xx-YY", "fr-CA"), "4 janvier 2020");
    }

    #[test]
    fn test_resolve_locale() {
        assert!(resolve_locale("en-CA").is_some());
        assert!(resolve_locale("fr_CA").is_some());
        assert!(resolve_locale("klingon").is_none());
    }
}
