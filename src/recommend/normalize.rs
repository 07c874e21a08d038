//! Min-max scaling of score columns.

use crate::recommend::error::RecommendError;

/// Smallest distance, in miles, fed to `log10`. A destination sitting exactly on a
/// street's representative point would otherwise yield negative infinity.
pub const MIN_DISTANCE_MILES: f64 = 1e-6;

fn column_range(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |range, v| match range {
        None => Some((*v, *v)),
        Some((min, max)) => Some((min.min(*v), max.max(*v))),
    })
}

/// Scales a column to `[0, 1]` with `(x - min) / (max - min)`.
///
/// A column that is all zeros or constant has no spread to scale by and is returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use parking_advisor::min_max_normalize;
///
/// assert_eq!(min_max_normalize(&[2.0, 4.0, 3.0]), vec![0.0, 1.0, 0.5]);
/// assert_eq!(min_max_normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
/// assert_eq!(min_max_normalize(&[0.7, 0.7]), vec![0.7, 0.7]);
/// ```
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    match column_range(values) {
        Some((min, max)) if max > min => values.iter().map(|v| (v - min) / (max - min)).collect(),
        _ => values.to_vec(),
    }
}

/// Rescales combined costs to scores in `[0, 1]` with `(max - raw) / (max - min)`, so the
/// lowest cost becomes 1.
///
/// # Errors
///
/// [`RecommendError::DegenerateScores`] when every cost is equal, including the single
/// street case.
pub fn invert_rescale(raw: &[f64]) -> Result<Vec<f64>, RecommendError> {
    let (min, max) = column_range(raw).ok_or(RecommendError::EmptyJoin)?;
    if max <= min {
        return Err(RecommendError::DegenerateScores {
            streets: raw.len(),
            score: max,
        });
    }
    Ok(raw.iter().map(|v| (max - v) / (max - min)).collect())
}

/// `log10` of a distance in miles, floored at [`MIN_DISTANCE_MILES`].
pub fn log_distance(miles: f64) -> f64 {
    miles.max(MIN_DISTANCE_MILES).log10()
}
