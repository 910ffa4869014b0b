//! Error types for distance-dates operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistanceError {
    #[error("Unsupported direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid value for field anchor {0}, must either be false, or 'max' or 'min'")]
    InvalidAnchorValue(String),

    #[error("Unsupported duration unit: {0}")]
    InvalidUnit(String),

    #[error("Missing calculation fields: count is {count} but {missing} not provided")]
    MissingCalculationFields { count: u32, missing: &'static str },

    #[error("Invalid relative range payload: {0}")]
    InvalidRelativeRangePayload(#[from] PayloadError),

    #[error("Invalid date: {0}")]
    DateParse(String),

    #[error("Date out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid sequence step: {0}")]
    InvalidSequenceStep(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid calendar URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Which check of a relative range payload failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    #[error("direction {0} is not one of \"FUTURE\", \"PAST\"")]
    Direction(String),

    #[error("count {0} is not a non-negative integer")]
    Count(String),

    #[error("unit {0} is not a supported duration unit")]
    Unit(String),
}

pub type Result<T> = std::result::Result<T, DistanceError>;
