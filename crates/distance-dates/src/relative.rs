//! Relative date calculation: "N units in the future/past from now".
//!
//! Untrusted input goes through [`validate_relative_date_range_payload`]
//! first, which turns a loosely typed [`RelativeRangePayload`] into a
//! [`RelativeDateRangeCalculate`] that [`create_date_time`] accepts.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::calendar::{add_units, LocalizedDate};
use crate::error::{DistanceError, PayloadError, Result};
use crate::vocabulary::{Direction, DurationUnit};

/// A validated calculation request.
///
/// `unit` and `direction` may be absent when `count` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelativeDateRangeCalculate {
    pub count: u32,
    pub unit: Option<DurationUnit>,
    pub direction: Option<Direction>,
}

/// A calculation request as received from outside, before validation.
///
/// Fields hold whatever JSON was sent; a missing field is `null`. Type
/// checks happen in [`validate_relative_date_range_payload`].
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RelativeRangePayload {
    pub count: Value,
    pub direction: Value,
    pub unit: Value,
}

impl RelativeRangePayload {
    pub fn new(count: impl Into<Value>, direction: impl Into<Value>, unit: impl Into<Value>) -> Self {
        Self {
            count: count.into(),
            direction: direction.into(),
            unit: unit.into(),
        }
    }
}

/// Offset `now` by `count` units in `direction`, tagging the result with `locale`.
///
/// A zero count returns `now` unchanged whatever the unit and direction.
///
/// # Errors
///
/// Returns [`DistanceError::MissingCalculationFields`] when `count` is
/// positive but the unit or the direction is missing, and
/// [`DistanceError::OutOfRange`] if the result leaves the calendar.
pub fn create_date_time(
    now: NaiveDateTime,
    locale: &str,
    calculate: &RelativeDateRangeCalculate,
) -> Result<LocalizedDate> {
    if calculate.count == 0 {
        return Ok(LocalizedDate::new(now, locale));
    }

    let (unit, direction) = match (calculate.unit, calculate.direction) {
        (Some(unit), Some(direction)) => (unit, direction),
        (unit, direction) => {
            let missing = match (unit, direction) {
                (None, None) => "unit and direction",
                (None, Some(_)) => "unit",
                _ => "direction",
            };
            return Err(DistanceError::MissingCalculationFields {
                count: calculate.count,
                missing,
            });
        }
    };

    let amount = direction.sign() * i64::from(calculate.count);
    Ok(LocalizedDate::new(add_units(now, unit, amount)?, locale))
}

/// Check a payload in order: direction, then count, then unit.
///
/// Only the first failing check is reported.
///
/// # Errors
///
/// Returns [`DistanceError::InvalidRelativeRangePayload`] wrapping the
/// [`PayloadError`] of the failing check.
pub fn validate_relative_date_range_payload(
    payload: &RelativeRangePayload,
) -> Result<RelativeDateRangeCalculate> {
    let direction = payload
        .direction
        .as_str()
        .and_then(|value| value.parse::<Direction>().ok())
        .ok_or_else(|| PayloadError::Direction(payload.direction.to_string()))?;

    let count = payload
        .count
        .as_f64()
        .filter(|count| {
            count.is_finite()
                && count.fract() == 0.0
                && *count >= 0.0
                && *count <= f64::from(u32::MAX)
        })
        .ok_or_else(|| PayloadError::Count(describe_count(&payload.count)))?;

    let unit = payload
        .unit
        .as_str()
        .and_then(|value| value.parse::<DurationUnit>().ok())
        .ok_or_else(|| PayloadError::Unit(payload.unit.to_string()))?;

    Ok(RelativeDateRangeCalculate {
        count: count as u32,
        unit: Some(unit),
        direction: Some(direction),
    })
}

/// Numbers print as plain values (`-1`, `1.5`), anything else as JSON.
fn describe_count(count: &Value) -> String {
    match count.as_f64() {
        Some(number) => number.to_string(),
        None => count.to_string(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
