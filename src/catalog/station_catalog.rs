use crate::catalog::error::CatalogError;
use crate::catalog::features::read_stations;
use crate::types::charging_station::ChargingStation;
use crate::types::location::LatLon;
use log::{info, warn};
use ordered_float::OrderedFloat;
use rstar::RTree;
use std::collections::HashMap;
use std::path::Path;

/// Charging stations indexed by name and by location.
#[derive(Debug, Clone)]
pub struct StationCatalog {
    by_name: HashMap<String, ChargingStation>,
    rtree: RTree<ChargingStation>,
}

impl Default for StationCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl StationCatalog {
    /// Indexes the stations. When two stations share a name the first one is kept.
    pub fn new(stations: Vec<ChargingStation>) -> Self {
        let mut by_name: HashMap<String, ChargingStation> = HashMap::with_capacity(stations.len());
        for station in stations {
            if by_name.contains_key(&station.name) {
                warn!("Duplicate charging station '{}', keeping the first", station.name);
                continue;
            }
            by_name.insert(station.name.clone(), station);
        }
        let rtree = RTree::bulk_load(by_name.values().cloned().collect());
        Self { by_name, rtree }
    }

    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let path = path.to_path_buf();
        let stations = tokio::task::spawn_blocking(move || read_stations(&path)).await??;
        let catalog = Self::new(stations);
        info!("Station catalog ready: {} stations", catalog.len());
        Ok(catalog)
    }

    pub fn station(&self, name: &str) -> Option<&ChargingStation> {
        self.by_name.get(name)
    }

    pub fn stations(&self) -> impl Iterator<Item = &ChargingStation> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Up to `n_results` stations within `max_distance_miles` of `location`, nearest first,
    /// with their geodesic distance in miles.
    pub fn nearest(
        &self,
        location: &LatLon,
        n_results: usize,
        max_distance_miles: f64,
    ) -> Vec<(&ChargingStation, f64)> {
        if n_results == 0 {
            return vec![];
        }
        let query_point = [location.latitude(), location.longitude()];
        let candidate_limit = (n_results * 2).max(20);

        let mut stations_with_dist: Vec<(&ChargingStation, f64)> = self
            .rtree
            .nearest_neighbor_iter(&query_point)
            .take(candidate_limit)
            .map(|station| (station, location.geodesic_miles(&station.location)))
            .filter(|(_, miles)| *miles <= max_distance_miles)
            .collect();
        stations_with_dist.sort_by_key(|(station, miles)| (OrderedFloat(*miles), station.name.clone()));
        stations_with_dist.truncate(n_results);
        stations_with_dist
    }
}
