use crate::occupancy::error::OccupancyError;
use crate::rates::error::RateScheduleError;
use crate::types::weights::Weights;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("No street has a rate, an occupancy curve and a location at the same time")]
    EmptyJoin,

    #[error("All {streets} streets have the same combined score {score}, scores cannot be rescaled")]
    DegenerateScores { streets: usize, score: f64 },

    #[error("Weights {0:?} must be finite numbers")]
    InvalidWeights(Weights),

    #[error(transparent)]
    Rates(#[from] RateScheduleError),

    #[error(transparent)]
    Occupancy(#[from] OccupancyError),
}
