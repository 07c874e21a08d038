use crate::types::weekday_class::WeekdayClass;
use thiserror::Error;

/// Why a day's segment list was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleViolation {
    #[error("{0} segments configured, at most 3 are allowed")]
    TooManySegments(usize),

    #[error("segment {start}-{end} does not start before it ends")]
    EmptySegment { start: u32, end: u32 },

    #[error("segment starting at {start} overlaps or precedes the previous segment ending at {previous_end}")]
    Unordered { previous_end: u32, start: u32 },

    #[error("hour {0} is outside of 0-24")]
    HourOutOfRange(u32),

    #[error("rate {0} is not a finite, non-negative amount")]
    InvalidRate(f64),

    #[error("segment {index} has a start or end hour but not both")]
    IncompleteSegment { index: usize },
}

#[derive(Debug, Error)]
pub enum RateScheduleError {
    #[error("Invalid {class} rate schedule for street '{street}': {reason}")]
    InvalidSchedule {
        street: String,
        class: WeekdayClass,
        #[source]
        reason: ScheduleViolation,
    },

    #[error("No rate schedule configured for street '{0}'")]
    StreetNotFound(String),

    #[error("Hour {0} is not an hour of the day (0-23)")]
    HourOutOfRange(u32),
}
