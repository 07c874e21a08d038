use serde::{Deserialize, Serialize};

/// The three factors of a row after min-max normalization across the joined set.
///
/// `distance` is the normalized `log10` of the distance in miles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFactors {
    pub rate: f64,
    pub occupancy: f64,
    pub distance: f64,
}

/// One street's recommendation at a query point.
///
/// Rows are built per query and never stored. `rate`, `occupancy` and `distance` keep
/// the raw inputs (dollars per hour, occupied fraction, miles); `score` lies in `[0, 1]`
/// where 1 is the most recommended street of the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRow {
    pub street: String,
    pub rate: f64,
    pub occupancy: f64,
    pub distance: f64,
    pub normalized: NormalizedFactors,
    pub score: f64,
}
