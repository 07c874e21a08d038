use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OccupancyError {
    #[error("No occupancy samples to interpolate")]
    NoSamples,

    #[error("Occupancy sample ({hour}, {occupancy}) is not a finite value inside hour 0-24")]
    InvalidSample { hour: f64, occupancy: f64 },

    #[error("Hour {0} is sampled more than once")]
    DuplicateHour(f64),

    #[error("Interpolation through the samples has no unique solution")]
    Interpolation,

    #[error("No occupancy curve for street '{0}'")]
    StreetNotFound(String),

    #[error("Time {0} is outside of 0-24 hours")]
    TimeOutOfRange(f64),

    #[error("No curve point at time {time} for street '{street}'")]
    NoGridPoint { street: String, time: f64 },
}
