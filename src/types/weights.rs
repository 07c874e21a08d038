use serde::{Deserialize, Serialize};

/// Relative importance of the three factors in the recommendation score.
///
/// The weights multiply the normalized rate, occupancy and log-distance columns.
/// They do not need to sum to one; only their ratios affect the final ranking,
/// because the combined cost is rescaled to `[0, 1]` afterwards.
///
/// # Examples
///
/// ```
/// use parking_advisor::Weights;
///
/// let default = Weights::default();
/// assert_eq!((default.rate, default.occupancy, default.distance), (0.3, 0.4, 0.3));
///
/// // Someone who mostly cares about walking distance.
/// let walker = Weights::new(0.1, 0.2, 0.7);
/// assert_eq!(walker.distance, 0.7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub rate: f64,
    pub occupancy: f64,
    pub distance: f64,
}

impl Weights {
    pub fn new(rate: f64, occupancy: f64, distance: f64) -> Self {
        Self {
            rate,
            occupancy,
            distance,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.rate.is_finite() && self.occupancy.is_finite() && self.distance.is_finite()
    }

    /// Dot product with a `(rate, occupancy, distance)` triple.
    pub(crate) fn combine(&self, rate: f64, occupancy: f64, distance: f64) -> f64 {
        self.rate * rate + self.occupancy * occupancy + self.distance * distance
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::new(0.3, 0.4, 0.3)
    }
}
