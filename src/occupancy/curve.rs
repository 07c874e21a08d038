//! Dense occupancy-over-time curves interpolated from sparse hourly observations.

use crate::occupancy::error::OccupancyError;
use crate::occupancy::spline::Spline;
use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Number of points on the curve grid: every 6 minutes from 00:00 to 24:00 inclusive.
pub const GRID_POINTS: usize = 241;
/// Grid spacing in hours.
pub const GRID_STEP_HOURS: f64 = 0.1;

const GRID_TOLERANCE: f64 = 1e-6;

/// One observation: the fraction of a street's capacity occupied at an hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupancySample {
    pub hour: f64,
    pub occupancy: f64,
}

impl OccupancySample {
    pub fn new(hour: f64, occupancy: f64) -> Self {
        Self { hour, occupancy }
    }
}

/// Time of the grid point at `index`, in hours.
pub fn grid_time(index: usize) -> f64 {
    24.0 * index as f64 / (GRID_POINTS - 1) as f64
}

/// Rounds a clock time to the curve grid, returning the grid index.
///
/// The fractional hour `hour + minute / 60` is computed as an `f64` and rounded to one
/// decimal from its exact binary value, so a minute that is nominally on a half tenth goes
/// whichever way its floating point representation leans. Seconds are ignored.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parking_advisor::grid_index_for;
///
/// // 08:32 is 8.533 hours, which rounds to 8.5.
/// assert_eq!(grid_index_for(&NaiveTime::from_hms_opt(8, 32, 0).unwrap()), 85);
/// // 08:27 is stored as 8.4499999..., so it rounds down.
/// assert_eq!(grid_index_for(&NaiveTime::from_hms_opt(8, 27, 0).unwrap()), 84);
/// // 00:27 is stored as 0.4500000...1, so it rounds up.
/// assert_eq!(grid_index_for(&NaiveTime::from_hms_opt(0, 27, 0).unwrap()), 5);
/// ```
pub fn grid_index_for(time: &impl Timelike) -> usize {
    let hours = f64::from(time.hour()) + f64::from(time.minute()) / 60.0;
    (round_to_tenth(hours) * 10.0).round() as usize
}

/// Rounds to one decimal from the exact binary value of `value`.
/// `(value * 10.0).round()` is not equivalent near half tenths.
fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// A street's occupancy over the day, sampled on a fixed 241-point grid over `[0, 24]`.
///
/// Values are never negative: the cubic interpolant can dip below zero between or beyond
/// the observations, and those points are clamped to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyCurve {
    occupancy: Vec<f64>,
}

impl OccupancyCurve {
    /// Fits a cubic interpolant through the samples and evaluates it on the grid.
    ///
    /// Samples are sorted by hour first; hours must be distinct, within `[0, 24)`, and
    /// values finite.
    ///
    /// # Errors
    ///
    /// [`OccupancyError::NoSamples`], [`OccupancyError::InvalidSample`] or
    /// [`OccupancyError::DuplicateHour`] for unusable input.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking_advisor::{OccupancyCurve, OccupancySample, GRID_POINTS};
    ///
    /// let curve = OccupancyCurve::interpolate(&[
    ///     OccupancySample::new(8.0, 0.35),
    ///     OccupancySample::new(11.0, 0.8),
    ///     OccupancySample::new(14.0, 0.95),
    ///     OccupancySample::new(17.0, 0.6),
    ///     OccupancySample::new(20.0, 0.3),
    /// ])?;
    /// assert_eq!(curve.len(), GRID_POINTS);
    /// assert!(curve.values().iter().all(|v| *v >= 0.0));
    /// # Ok::<(), parking_advisor::OccupancyError>(())
    /// ```
    pub fn interpolate(samples: &[OccupancySample]) -> Result<Self, OccupancyError> {
        if samples.is_empty() {
            return Err(OccupancyError::NoSamples);
        }
        if let Some(bad) = samples.iter().find(|s| {
            !s.hour.is_finite() || !s.occupancy.is_finite() || s.hour < 0.0 || s.hour >= 24.0
        }) {
            return Err(OccupancyError::InvalidSample {
                hour: bad.hour,
                occupancy: bad.occupancy,
            });
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.hour.total_cmp(&b.hour));
        let hours: Vec<f64> = sorted.iter().map(|s| s.hour).collect();
        let values: Vec<f64> = sorted.iter().map(|s| s.occupancy).collect();

        let spline = Spline::fit(&hours, &values)?;
        let occupancy = (0..GRID_POINTS)
            .map(|i| spline.eval(grid_time(i)).max(0.0))
            .collect();
        Ok(Self { occupancy })
    }

    /// Wraps already-gridded values, e.g. from a cache. Negative values are clamped.
    pub(crate) fn from_grid(values: Vec<f64>) -> Option<Self> {
        if values.len() != GRID_POINTS || values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self {
            occupancy: values.into_iter().map(|v| v.max(0.0)).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.occupancy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.occupancy
    }

    /// `(time, occupancy)` pairs over the whole grid.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.occupancy
            .iter()
            .enumerate()
            .map(|(i, value)| (grid_time(i), *value))
    }

    pub fn value_at_index(&self, index: usize) -> Option<f64> {
        self.occupancy.get(index).copied()
    }

    /// The grid value whose time matches `time` (in hours) within floating tolerance.
    ///
    /// Returns `None` when `time` is not on the 0.1 hour grid or outside `[0, 24]`.
    pub fn sample_at(&self, time: f64) -> Option<f64> {
        if !(0.0..=24.0).contains(&time) {
            return None;
        }
        let index = (time / GRID_STEP_HOURS).round() as usize;
        if (grid_time(index) - time).abs() > GRID_TOLERANCE {
            return None;
        }
        self.value_at_index(index)
    }

    /// Occupancy at a clock time, rounded to the grid with [`grid_index_for`].
    pub fn at(&self, time: &impl Timelike) -> Option<f64> {
        self.value_at_index(grid_index_for(time))
    }
}
