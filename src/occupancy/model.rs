use crate::occupancy::curve::{grid_index_for, grid_time, OccupancyCurve, OccupancySample};
use crate::occupancy::error::OccupancyError;
use chrono::Timelike;
use log::{debug, warn};
use std::collections::HashMap;

/// Interpolated occupancy curves of every studied street, indexed by street name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccupancyModel {
    curves: HashMap<String, OccupancyCurve>,
    rejected: Vec<String>,
}

impl OccupancyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpolates a curve per street. Streets whose samples cannot be interpolated are
    /// left out, logged, and listed in [`OccupancyModel::rejected`].
    pub fn from_samples(
        samples: impl IntoIterator<Item = (String, Vec<OccupancySample>)>,
    ) -> Self {
        let mut model = Self::new();
        for (street, street_samples) in samples {
            match OccupancyCurve::interpolate(&street_samples) {
                Ok(curve) => {
                    model.curves.insert(street, curve);
                }
                Err(e) => {
                    warn!("Excluding street '{}' from occupancy model: {}", street, e);
                    model.rejected.push(street);
                }
            }
        }
        model.rejected.sort();
        model
    }

    pub(crate) fn from_parts(curves: HashMap<String, OccupancyCurve>, rejected: Vec<String>) -> Self {
        Self { curves, rejected }
    }

    pub fn insert(&mut self, street: impl Into<String>, curve: OccupancyCurve) {
        self.curves.insert(street.into(), curve);
    }

    pub fn curve(&self, street: &str) -> Option<&OccupancyCurve> {
        self.curves.get(street)
    }

    pub fn curves(&self) -> impl Iterator<Item = (&str, &OccupancyCurve)> {
        self.curves.iter().map(|(street, curve)| (street.as_str(), curve))
    }

    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Occupancy of one street at a clock time.
    ///
    /// The time is rounded to the nearest tenth of an hour and the curve point at that
    /// time is returned.
    ///
    /// # Errors
    ///
    /// [`OccupancyError::StreetNotFound`] if the street has no curve.
    pub fn occupancy_at(&self, street: &str, time: &impl Timelike) -> Result<f64, OccupancyError> {
        let curve = self
            .curves
            .get(street)
            .ok_or_else(|| OccupancyError::StreetNotFound(street.to_string()))?;
        let index = grid_index_for(time);
        curve
            .value_at_index(index)
            .ok_or_else(|| OccupancyError::NoGridPoint {
                street: street.to_string(),
                time: grid_time(index),
            })
    }

    /// Occupancy at a fractional hour that must lie on the curve grid.
    pub fn occupancy_at_hour(&self, street: &str, hour: f64) -> Result<f64, OccupancyError> {
        if !(0.0..=24.0).contains(&hour) {
            return Err(OccupancyError::TimeOutOfRange(hour));
        }
        let curve = self
            .curves
            .get(street)
            .ok_or_else(|| OccupancyError::StreetNotFound(street.to_string()))?;
        curve.sample_at(hour).ok_or_else(|| OccupancyError::NoGridPoint {
            street: street.to_string(),
            time: hour,
        })
    }

    /// Occupancy of every street at a clock time.
    pub fn occupancy_at_time(
        &self,
        time: &impl Timelike,
    ) -> Result<HashMap<String, f64>, OccupancyError> {
        let index = grid_index_for(time);
        let occupancy = self
            .curves
            .iter()
            .map(|(street, curve)| {
                curve
                    .value_at_index(index)
                    .map(|value| (street.clone(), value))
                    .ok_or_else(|| OccupancyError::NoGridPoint {
                        street: street.clone(),
                        time: grid_time(index),
                    })
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        debug!(
            "Sampled {} occupancy curves at {:.1}h",
            occupancy.len(),
            grid_time(index)
        );
        Ok(occupancy)
    }
}
