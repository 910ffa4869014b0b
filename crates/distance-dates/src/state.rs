//! The range record a session owns.
//!
//! [`RangeState`] has read accessors only. Its setters are crate-private and
//! called from the mutation engine in [`crate::session`], which is the one
//! place field values are validated.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{DistanceError, Result};
use crate::vocabulary::{quoted, Direction, DurationUnit};

// ── Anchor ──────────────────────────────────────────────────────────────────

/// Which bound, if any, is pinned to "today" when the range is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Off,
    Max,
    Min,
}

impl Anchor {
    /// Parse a changeset value: `false`, `max` or `min`.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::InvalidAnchorValue`] for anything else.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "false" => Ok(Anchor::Off),
            "max" => Ok(Anchor::Max),
            "min" => Ok(Anchor::Min),
            other => Err(DistanceError::InvalidAnchorValue(quoted(other))),
        }
    }

    /// The bound this anchor pins, `None` when off.
    pub fn field(&self) -> Option<RangeField> {
        match self {
            Anchor::Off => None,
            Anchor::Max => Some(RangeField::Max),
            Anchor::Min => Some(RangeField::Min),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Anchor::Off => "false",
            Anchor::Max => "max",
            Anchor::Min => "min",
        })
    }
}

/// Serializes as `false`, `"max"` or `"min"`.
impl Serialize for Anchor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Anchor::Off => serializer.serialize_bool(false),
            Anchor::Max => serializer.serialize_str("max"),
            Anchor::Min => serializer.serialize_str("min"),
        }
    }
}

// ── Fields ──────────────────────────────────────────────────────────────────

/// The fixed set of fields a changeset may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeField {
    Direction,
    Locale,
    Max,
    Min,
    Anchor,
    Unit,
}

pub const RANGE_FIELDS: [RangeField; 6] = [
    RangeField::Direction,
    RangeField::Locale,
    RangeField::Max,
    RangeField::Min,
    RangeField::Anchor,
    RangeField::Unit,
];

impl RangeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeField::Direction => "direction",
            RangeField::Locale => "locale",
            RangeField::Max => "max",
            RangeField::Min => "min",
            RangeField::Anchor => "anchor",
            RangeField::Unit => "unit",
        }
    }

    /// Look up a changeset key. `today` is the older name of `anchor`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "today" => Some(RangeField::Anchor),
            _ => RANGE_FIELDS.into_iter().find(|f| f.as_str() == key),
        }
    }

    /// Whether a change to this field invalidates the derived duration.
    pub fn affects_duration(&self) -> bool {
        matches!(
            self,
            RangeField::Min | RangeField::Max | RangeField::Unit | RangeField::Locale
        )
    }
}

/// `true` iff `key` names a range field.
pub fn is_range_field(key: &str) -> bool {
    RangeField::from_key(key).is_some()
}

// ── RangeState ──────────────────────────────────────────────────────────────

/// Direction, bounds, unit, locale and anchor of one session's range.
///
/// `min` and `max` are stored as given; they are parsed when read by the
/// duration deriver, the sequence generator or the formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeState {
    direction: Direction,
    min: String,
    max: String,
    unit: DurationUnit,
    locale: String,
    anchor: Anchor,
}

impl RangeState {
    pub(crate) fn new(
        direction: Direction,
        today: &str,
        unit: DurationUnit,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            direction,
            min: today.to_string(),
            max: today.to_string(),
            unit,
            locale: locale.into(),
            anchor: Anchor::Off,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn min(&self) -> &str {
        &self.min
    }

    pub fn max(&self) -> &str {
        &self.max
    }

    pub fn unit(&self) -> DurationUnit {
        self.unit
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub(crate) fn set_min(&mut self, min: impl Into<String>) {
        self.min = min.into();
    }

    pub(crate) fn set_max(&mut self, max: impl Into<String>) {
        self.max = max.into();
    }

    pub(crate) fn set_unit(&mut self, unit: DurationUnit) {
        self.unit = unit;
    }

    pub(crate) fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    pub(crate) fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }

    /// Whether `self` and `other` hold different values for `field`.
    pub fn differs_in(&self, other: &RangeState, field: RangeField) -> bool {
        match field {
            RangeField::Direction => self.direction != other.direction,
            RangeField::Locale => self.locale != other.locale,
            RangeField::Max => self.max != other.max,
            RangeField::Min => self.min != other.min,
            RangeField::Anchor => self.anchor != other.anchor,
            RangeField::Unit => self.unit != other.unit,
        }
    }

    /// JSON snapshot used for diagnostics and `--json` output.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
