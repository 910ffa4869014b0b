//! The closed vocabularies a range is described with: its direction and the
//! unit its duration is measured in.
//!
//! Both enumerations parse from and render to the exact, case-sensitive
//! strings used in query strings and configuration files (`"FUTURE"`,
//! `"PAST"`, `"days"`, `"quarters"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DistanceError, Result};

// ── Direction ───────────────────────────────────────────────────────────────

/// Whether a relative calculation moves forward or backward from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "FUTURE")]
    Future,
    #[serde(rename = "PAST")]
    Past,
}

/// Every direction, in declaration order.
pub const DIRECTIONS: [Direction; 2] = [Direction::Future, Direction::Past];

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Future => "FUTURE",
            Direction::Past => "PAST",
        }
    }

    /// `1` for [`Direction::Future`], `-1` for [`Direction::Past`].
    pub fn sign(&self) -> i64 {
        match self {
            Direction::Future => 1,
            Direction::Past => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DistanceError;

    fn from_str(s: &str) -> Result<Self> {
        DIRECTIONS
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| DistanceError::InvalidDirection(quoted(s)))
    }
}

/// `true` iff `value` is exactly `"FUTURE"` or `"PAST"`.
pub fn is_direction(value: &str) -> bool {
    value.parse::<Direction>().is_ok()
}

/// Parse `value` as a [`Direction`].
///
/// # Errors
///
/// Returns [`DistanceError::InvalidDirection`] carrying the offending value
/// JSON-quoted, so empty strings and whitespace stay visible in diagnostics.
pub fn assert_direction(value: &str) -> Result<Direction> {
    value.parse()
}

/// `true` iff `value` is the future direction.
///
/// # Errors
///
/// An invalid direction is an error, not `false`.
pub fn is_future(value: &str) -> Result<bool> {
    Ok(assert_direction(value)? == Direction::Future)
}

// ── Duration units ──────────────────────────────────────────────────────────

/// A unit a range's length can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Years,
    Quarters,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

/// The fixed unit list, largest first.
pub const DURATION_UNITS: [DurationUnit; 8] = [
    DurationUnit::Years,
    DurationUnit::Quarters,
    DurationUnit::Months,
    DurationUnit::Weeks,
    DurationUnit::Days,
    DurationUnit::Hours,
    DurationUnit::Minutes,
    DurationUnit::Seconds,
];

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Years => "years",
            DurationUnit::Quarters => "quarters",
            DurationUnit::Months => "months",
            DurationUnit::Weeks => "weeks",
            DurationUnit::Days => "days",
            DurationUnit::Hours => "hours",
            DurationUnit::Minutes => "minutes",
            DurationUnit::Seconds => "seconds",
        }
    }

    /// Length in calendar months for the month-based units, `None` otherwise.
    pub fn months(&self) -> Option<u32> {
        match self {
            DurationUnit::Years => Some(12),
            DurationUnit::Quarters => Some(3),
            DurationUnit::Months => Some(1),
            _ => None,
        }
    }

    /// Length in seconds for the fixed-length units, `None` for month-based ones.
    pub fn seconds(&self) -> Option<i64> {
        match self {
            DurationUnit::Weeks => Some(7 * 86_400),
            DurationUnit::Days => Some(86_400),
            DurationUnit::Hours => Some(3_600),
            DurationUnit::Minutes => Some(60),
            DurationUnit::Seconds => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationUnit {
    type Err = DistanceError;

    fn from_str(s: &str) -> Result<Self> {
        DURATION_UNITS
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| DistanceError::InvalidUnit(quoted(s)))
    }
}

/// `true` iff `value` names one of [`DURATION_UNITS`] (case-sensitive).
pub fn is_in_duration_units(value: &str) -> bool {
    value.parse::<DurationUnit>().is_ok()
}

/// JSON-quote a raw value for error messages.
pub(crate) fn quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_direction_accepts_both_values() {
        assert!(is_direction("FUTURE"));
        assert!(is_direction("PAST"));
    }

    #[test]
    fn test_is_direction_is_case_sensitive() {
        assert!(!is_direction("future"));
        assert!(!is_direction("Past"));
        assert!(!is_direction(""));
        assert!(!is_direction("SIDEWAYS"));
    }

    #[test]
    fn test_assert_direction_returns_parsed_value() {
        assert_eq!(assert_direction("PAST").unwrap(), Direction::Past);
        assert_eq!(assert_direction("FUTURE").unwrap(), Direction::Future);
    }

    #[test]
    fn test_assert_direction_error_quotes_value() {
        let err = assert_direction("SIDEWAYS").unwrap_err();
        assert!(matches!(err, DistanceError::InvalidDirection(_)));
        assert_eq!(err.to_string(), "Unsupported direction: \"SIDEWAYS\"");
    }

    #[test]
    fn test_is_future() {
        assert!(is_future("FUTURE").unwrap());
        assert!(!is_future("PAST").unwrap());
    }

    #[test]
    fn test_is_future_propagates_invalid_direction() {
        let err = is_future("later").unwrap_err();
        assert!(matches!(err, DistanceError::InvalidDirection(_)), "got: {err}");
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Future.sign(), 1);
        assert_eq!(Direction::Past.sign(), -1);
    }

    #[test]
    fn test_direction_serde_uses_uppercase_names() {
        assert_eq!(serde_json::to_string(&Direction::Past).unwrap(), "\"PAST\"");
        let parsed: Direction = serde_json::from_str("\"FUTURE\"").unwrap();
        assert_eq!(parsed, Direction::Future);
    }

    #[test]
    fn test_is_in_duration_units() {
        for unit in DURATION_UNITS {
            assert!(is_in_duration_units(unit.as_str()), "{unit}");
        }
        assert!(!is_in_duration_units("Days"));
        assert!(!is_in_duration_units("day"));
        assert!(!is_in_duration_units("fortnights"));
    }

    #[test]
    fn test_duration_units_are_ordered_largest_first() {
        let mut sorted = DURATION_UNITS;
        sorted.sort();
        assert_eq!(sorted, DURATION_UNITS);
        assert_eq!(DURATION_UNITS[0], DurationUnit::Years);
        assert_eq!(DURATION_UNITS[7], DurationUnit::Seconds);
    }

    #[test]
    fn test_unit_lengths() {
        assert_eq!(DurationUnit::Quarters.months(), Some(3));
        assert_eq!(DurationUnit::Weeks.months(), None);
        assert_eq!(DurationUnit::Weeks.seconds(), Some(604_800));
        assert_eq!(DurationUnit::Years.seconds(), None);
    }

    #[test]
    fn test_unit_parse_error() {
        let err = "eons".parse::<DurationUnit>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported duration unit: \"eons\"");
    }
}
