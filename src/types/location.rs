//! Geographic coordinate type shared by the distance index, the street catalog
//! and the charging station catalog.

use geo::{GeodesicDistance, Point};
use serde::{Deserialize, Serialize};

/// Meters in one international mile.
pub(crate) const METERS_PER_MILE: f64 = 1_609.344;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Note that GeoJSON sources store positions the other way around, (longitude, latitude);
/// use [`LatLon::from_lon_lat`] when reading them.
///
/// # Examples
///
/// ```
/// use parking_advisor::LatLon;
///
/// let downtown_seattle = LatLon(47.6062, -122.3321);
/// assert_eq!(downtown_seattle.0, 47.6062); // Latitude
/// assert_eq!(downtown_seattle.1, -122.3321); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    /// Builds a `LatLon` from a GeoJSON style `[longitude, latitude]` position.
    pub fn from_lon_lat(longitude: f64, latitude: f64) -> Self {
        Self(latitude, longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    /// Arithmetic midpoint of two coordinates, averaging latitude and longitude
    /// independently. This is not the geodesic midpoint; for the short street
    /// segments it is used on the difference is negligible.
    pub fn midpoint(&self, other: &LatLon) -> LatLon {
        LatLon((self.0 + other.0) / 2.0, (self.1 + other.1) / 2.0)
    }

    /// Ellipsoidal (WGS84) geodesic distance to `other`, in miles.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking_advisor::LatLon;
    ///
    /// let p = LatLon(47.6062, -122.3321);
    /// assert_eq!(p.geodesic_miles(&p), 0.0);
    /// ```
    pub fn geodesic_miles(&self, other: &LatLon) -> f64 {
        self.to_point().geodesic_distance(&other.to_point()) / METERS_PER_MILE
    }

    pub(crate) fn to_point(self) -> Point<f64> {
        Point::new(self.1, self.0)
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}
