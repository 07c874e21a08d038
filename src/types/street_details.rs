use crate::occupancy::curve::OccupancyCurve;
use crate::rates::table::RateTable;
use crate::types::location::LatLon;
use serde::{Deserialize, Serialize};

/// Everything known about one street, for a detail view.
///
/// A street may be missing from some of the source datasets, so each part is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetDetails {
    pub name: String,
    /// Rate segments per weekday class, with 12-hour clock labels.
    pub rate_table: Option<RateTable>,
    /// Posted maximum parking duration in hours.
    pub time_limit_hours: Option<f64>,
    /// Predicted occupancy over the whole day.
    pub occupancy: Option<OccupancyCurve>,
    /// Representative location used for distances.
    pub location: Option<LatLon>,
}
