//! Representative locations of streets and their spatial indexing with `rstar`.

use crate::types::location::LatLon;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// A street reduced to one representative location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetPoint {
    pub street: String,
    pub location: LatLon,
}

impl StreetPoint {
    pub fn new(street: impl Into<String>, location: LatLon) -> Self {
        Self {
            street: street.into(),
            location,
        }
    }

    /// Builds the point from a street's line geometry.
    ///
    /// The representative location is the arithmetic midpoint of the first and the last
    /// coordinate of the geometry, not the midpoint along the polyline. For multi-part
    /// geometries the first point of the first part and the last point of the last part
    /// are used.
    ///
    /// Returns `None` when the geometry has no coordinates or a non-finite one.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking_advisor::{LatLon, StreetPoint};
    ///
    /// let line = vec![vec![
    ///     LatLon(47.60, -122.30),
    ///     LatLon(47.65, -122.10), // ignored, only the ends count
    ///     LatLon(47.62, -122.32),
    /// ]];
    /// let point = StreetPoint::from_lines("PINE ST", &line).unwrap();
    /// assert!((point.location.latitude() - 47.61).abs() < 1e-12);
    /// ```
    pub fn from_lines(street: impl Into<String>, lines: &[Vec<LatLon>]) -> Option<Self> {
        let first = lines.iter().find_map(|line| line.first())?;
        let last = lines.iter().rev().find_map(|line| line.last())?;
        if !first.is_finite() || !last.is_finite() {
            return None;
        }
        Some(Self::new(street, first.midpoint(last)))
    }
}

impl RTreeObject for StreetPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.latitude(), self.location.longitude()])
    }
}

impl PointDistance for StreetPoint {
    /// Squared planar distance in degrees, only used to order R-tree candidates.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d_lat = self.location.latitude() - point[0];
        let d_lon = self.location.longitude() - point[1];
        d_lat * d_lat + d_lon * d_lon
    }
}
