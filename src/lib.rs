mod advisor;
mod catalog;
mod distance;
mod error;
mod occupancy;
mod rates;
mod recommend;
mod types;
mod utils;

pub use advisor::*;
pub use error::ParkingAdvisorError;

pub use types::charging_station::*;
pub use types::data_source::*;
pub use types::layer::*;
pub use types::location::LatLon;
pub use types::recommendation::*;
pub use types::street_details::StreetDetails;
pub use types::weekday_class::WeekdayClass;
pub use types::weights::Weights;

pub use rates::error::{RateScheduleError, ScheduleViolation};
pub use rates::schedule::*;
pub use rates::table::*;

pub use occupancy::curve::{grid_index_for, grid_time, OccupancyCurve, OccupancySample, GRID_POINTS};
pub use occupancy::error::OccupancyError;
pub use occupancy::model::OccupancyModel;
pub use occupancy::spline::{CubicSpline, Spline};

pub use distance::index::DistanceIndex;
pub use distance::street_point::StreetPoint;

pub use recommend::engine::RecommendationEngine;
pub use recommend::error::RecommendError;
pub use recommend::normalize::{invert_rescale, log_distance, min_max_normalize, MIN_DISTANCE_MILES};

pub use catalog::error::CatalogError;
pub use catalog::features::{
    read_stations, read_street_lines, stations_from_str, street_lines_from_str, StreetLines,
};
pub use catalog::station_catalog::StationCatalog;
pub use catalog::street_catalog::StreetCatalog;
pub use catalog::tables::{
    occupancy_samples_from_frame, rate_schedule_from_frame, read_occupancy_samples,
    read_rate_schedule,
};
