use crate::distance::street_point::StreetPoint;
use crate::types::location::LatLon;
use log::{debug, warn};
use rstar::RTree;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Representative locations of all streets, indexed both by name and spatially.
///
/// Locations are computed once when the index is built; queries only vary the destination.
#[derive(Debug, Clone)]
pub struct DistanceIndex {
    locations: HashMap<String, LatLon>,
    rtree: RTree<StreetPoint>,
    rejected: Vec<String>,
}

impl Default for DistanceIndex {
    fn default() -> Self {
        Self::from_points(Vec::new())
    }
}

impl DistanceIndex {
    pub fn from_points(points: Vec<StreetPoint>) -> Self {
        let locations = points
            .iter()
            .map(|p| (p.street.clone(), p.location))
            .collect();
        Self {
            locations,
            rtree: RTree::bulk_load(points),
            rejected: Vec::new(),
        }
    }

    /// Builds the index from street line geometries. Streets without usable coordinates
    /// are logged and listed in [`DistanceIndex::rejected`].
    pub fn from_geometries(
        geometries: impl IntoIterator<Item = (String, Vec<Vec<LatLon>>)>,
    ) -> Self {
        let mut points = Vec::new();
        let mut rejected = Vec::new();
        for (street, lines) in geometries {
            match StreetPoint::from_lines(street.clone(), &lines) {
                Some(point) => points.push(point),
                None => {
                    warn!("Excluding street '{}' from distance index: no usable coordinates", street);
                    rejected.push(street);
                }
            }
        }
        rejected.sort();
        let mut index = Self::from_points(points);
        index.rejected = rejected;
        index
    }

    pub fn location(&self, street: &str) -> Option<LatLon> {
        self.locations.get(street).copied()
    }

    pub fn streets(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Geodesic distance in miles from `destination` to every street's representative location.
    pub fn distances_to(&self, destination: &LatLon) -> HashMap<String, f64> {
        let distances: HashMap<String, f64> = self
            .locations
            .iter()
            .map(|(street, location)| (street.clone(), destination.geodesic_miles(location)))
            .collect();
        debug!(
            "Computed {} street distances to ({}, {})",
            distances.len(),
            destination.latitude(),
            destination.longitude()
        );
        distances
    }

    /// Up to `n_results` streets closest to `location` within `max_distance_miles`, nearest first.
    ///
    /// Candidates come from the R-tree in planar degree order and are re-ranked by their
    /// geodesic distance, which can differ slightly from the planar order.
    pub fn nearest(
        &self,
        location: &LatLon,
        n_results: usize,
        max_distance_miles: f64,
    ) -> Vec<(String, f64)> {
        if n_results == 0 {
            return vec![];
        }
        let query_point = [location.latitude(), location.longitude()];
        let candidate_limit = (n_results * 2).max(20);

        let mut streets_with_dist: Vec<(String, f64)> = self
            .rtree
            .nearest_neighbor_iter(&query_point)
            .take(candidate_limit)
            .filter_map(|point| {
                let miles = location.geodesic_miles(&point.location);
                (miles <= max_distance_miles).then(|| (point.street.clone(), miles))
            })
            .collect();

        streets_with_dist.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        streets_with_dist.truncate(n_results);
        streets_with_dist
    }
}
