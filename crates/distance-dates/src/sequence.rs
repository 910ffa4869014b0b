//! Lazy enumeration of candidate dates inside a range.
//!
//! [`date_sequence`] returns a fresh [`DateSequence`] on every call. The
//! iterator holds no resources, so dropping it part way through is fine;
//! it cannot be rewound, build a new one instead.

use std::iter::FusedIterator;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::calendar::{add_units, parse_iso, LocalizedDate};
use crate::error::{DistanceError, Result};
use crate::vocabulary::DurationUnit;

/// Dates from a start (never before today) up to an exclusive end, `count`
/// units apart.
#[derive(Debug)]
pub struct DateSequence {
    next: Option<NaiveDateTime>,
    end: NaiveDateTime,
    unit: DurationUnit,
    count: u32,
    locale: String,
}

/// Build the sequence for `[min, max)` stepping by `count` x `unit`.
///
/// The first date is `max(min, today)` shifted by `day_offset` days; each
/// following date adds `count` units to the previous one. Nothing is
/// yielded if `max` is not after that first date.
///
/// # Errors
///
/// Returns [`DistanceError::DateParse`] if either bound is not an ISO date,
/// [`DistanceError::InvalidSequenceStep`] if `count` is zero (the sequence
/// would never advance), and [`DistanceError::OutOfRange`] if the day
/// offset leaves the supported calendar.
pub fn date_sequence(
    min: &str,
    max: &str,
    unit: DurationUnit,
    count: u32,
    locale: &str,
    day_offset: i64,
    today: NaiveDate,
) -> Result<DateSequence> {
    if count == 0 {
        return Err(DistanceError::InvalidSequenceStep(format!(
            "count must be at least 1 {unit}, got 0"
        )));
    }

    let start = parse_iso(min)?.max(today.and_time(NaiveTime::MIN));
    let start = add_units(start, DurationUnit::Days, day_offset)?;
    let end = parse_iso(max)?;

    Ok(DateSequence {
        next: Some(start),
        end,
        unit,
        count,
        locale: locale.to_string(),
    })
}

impl DateSequence {
    /// Whether another date will be yielded.
    pub fn has_next(&self) -> bool {
        self.next.is_some_and(|next| next < self.end)
    }
}

impl Iterator for DateSequence {
    type Item = LocalizedDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take().filter(|cur| *cur < self.end)?;
        // A step past the calendar limits ends the sequence.
        self.next = add_units(current, self.unit, i64::from(self.count)).ok();
        Some(LocalizedDate::new(current, self.locale.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.has_next() {
            (1, None)
        } else {
            (0, Some(0))
        }
    }
}

impl FusedIterator for DateSequence {}

// ── Tests ───────────────────────────────────────────────────────────────────
