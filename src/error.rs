use crate::catalog::error::CatalogError;
use crate::occupancy::error::OccupancyError;
use crate::rates::error::RateScheduleError;
use crate::recommend::error::RecommendError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParkingAdvisorError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Rates(#[from] RateScheduleError),

    #[error(transparent)]
    Occupancy(#[from] OccupancyError),

    #[error(transparent)]
    Recommend(#[from] RecommendError),

    #[error("Failed to build layer frame")]
    LayerFrame(#[from] PolarsError),

    #[error("Street '{0}' not found")]
    StreetNotFound(String),

    #[error("Charging station '{0}' not found")]
    StationNotFound(String),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}
