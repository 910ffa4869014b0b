//! # distance-dates
//!
//! How far apart are two dates, in a chosen unit, and which calendar
//! reminders fall between them.
//!
//! A [`DistanceDates`] session owns one validated date range. It is changed
//! through [`DistanceDates::mutate`] and [`DistanceDates::change_direction`]
//! only, and exposes the range's ceiling duration, a lazy sequence of
//! candidate dates, relative date calculation, and calendar-event artifacts.
//!
//! ## Modules
//!
//! - [`vocabulary`]: directions and duration units
//! - [`calendar`]: parsing, unit arithmetic, interval length and breakdown, long formatting
//! - [`state`]: the range record and its field set
//! - [`session`]: mutation engine and duration deriver
//! - [`relative`]: "N units from now" and payload validation
//! - [`sequence`]: candidate date iterator
//! - [`artifact`]: duration text, event text, calendar link
//! - [`sink`]: injected diagnostics
//! - [`config`]: session options
//! - [`error`]: Error types

pub mod artifact;
pub mod calendar;
pub mod config;
pub mod error;
pub mod relative;
pub mod sequence;
pub mod session;
pub mod sink;
pub mod state;
pub mod vocabulary;

pub use artifact::{
    format_calendar_event_text, format_calendar_link, verbalize_duration_text,
    DEFAULT_VERBAL_UNITS,
};
pub use calendar::{parse_iso, LocalizedDate};
pub use config::{CalendarLinkOptions, DistanceDatesOptions, LoggingOptions};
pub use error::{DistanceError, PayloadError};
pub use relative::{
    create_date_time, validate_relative_date_range_payload, RelativeDateRangeCalculate,
    RelativeRangePayload,
};
pub use sequence::{date_sequence, DateSequence};
pub use session::{derive_duration, DistanceDates};
pub use sink::{DiagnosticsSink, NoOpSink, TracingSink};
pub use state::{is_range_field, Anchor, RangeField, RangeState};
pub use vocabulary::{
    assert_direction, is_direction, is_future, is_in_duration_units, Direction, DurationUnit,
    DURATION_UNITS,
};
