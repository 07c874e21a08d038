use crate::catalog::curve_cache::{cache_path, is_fresh, read_cached_model, write_cached_model};
use crate::catalog::error::CatalogError;
use crate::catalog::features::read_street_lines;
use crate::catalog::tables::{read_occupancy_samples, read_rate_schedule};
use crate::distance::index::DistanceIndex;
use crate::occupancy::model::OccupancyModel;
use crate::rates::schedule::RateSchedule;
use crate::rates::table::RateTable;
use crate::recommend::engine::RecommendationEngine;
use crate::types::data_source::DataSources;
use crate::types::location::LatLon;
use crate::types::street_details::StreetDetails;
use log::{info, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::task;

/// The three street datasets: rate rules, occupancy curves and representative locations.
///
/// Built once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct StreetCatalog {
    rates: RateSchedule,
    occupancy: OccupancyModel,
    distances: DistanceIndex,
}

impl StreetCatalog {
    pub fn new(rates: RateSchedule, occupancy: OccupancyModel, distances: DistanceIndex) -> Self {
        Self {
            rates,
            occupancy,
            distances,
        }
    }

    /// Loads rates, occupancy and geometry from `sources`, parsing each file on the
    /// blocking pool. Occupancy curves go through the curve cache when a cache directory
    /// is configured.
    pub async fn load(sources: &DataSources) -> Result<Self, CatalogError> {
        let rate_file = sources.rate_file.clone();
        let street_file = sources.street_file.clone();
        let (rates, occupancy, streets) = tokio::try_join!(
            async move { task::spawn_blocking(move || read_rate_schedule(&rate_file)).await? },
            load_occupancy(sources.occupancy_file.clone(), sources.cache_dir.clone()),
            async move { task::spawn_blocking(move || read_street_lines(&street_file)).await? },
        )?;
        let distances = DistanceIndex::from_geometries(streets);
        let catalog = Self::new(rates, occupancy, distances);
        info!(
            "Street catalog ready: {} rate schedules, {} occupancy curves, {} locations",
            catalog.rates.len(),
            catalog.occupancy.len(),
            catalog.distances.len()
        );
        Ok(catalog)
    }

    pub fn rates(&self) -> &RateSchedule {
        &self.rates
    }

    pub fn occupancy(&self) -> &OccupancyModel {
        &self.occupancy
    }

    pub fn distances(&self) -> &DistanceIndex {
        &self.distances
    }

    pub fn engine(&self) -> RecommendationEngine<'_> {
        RecommendationEngine::new(&self.rates, &self.occupancy, &self.distances)
    }

    /// Names present in at least one of the street datasets, sorted.
    pub fn street_names(&self) -> BTreeSet<&str> {
        self.rates
            .streets()
            .chain(self.occupancy.curves().map(|(street, _)| street))
            .chain(self.distances.streets())
            .collect()
    }

    /// Detail view of one street, or `None` when no dataset knows the name.
    pub fn details(&self, street: &str) -> Option<StreetDetails> {
        let rates = self.rates.get(street);
        let occupancy = self.occupancy.curve(street);
        let location = self.distances.location(street);
        if rates.is_none() && occupancy.is_none() && location.is_none() {
            return None;
        }
        Some(StreetDetails {
            name: street.to_string(),
            rate_table: rates.map(RateTable::from_rates),
            time_limit_hours: rates.and_then(|r| r.time_limit_hours()),
            occupancy: occupancy.cloned(),
            location,
        })
    }

    /// Streets whose representative location is closest to `location`, with their
    /// distances in miles.
    pub fn nearest_streets(
        &self,
        location: &LatLon,
        n_results: usize,
        max_distance_miles: f64,
    ) -> Vec<(String, f64)> {
        self.distances.nearest(location, n_results, max_distance_miles)
    }
}

fn build_occupancy_model(source: &Path) -> Result<OccupancyModel, CatalogError> {
    let samples = read_occupancy_samples(source)?;
    let model = OccupancyModel::from_samples(samples);
    info!(
        "Interpolated {} occupancy curves ({} streets rejected)",
        model.len(),
        model.rejected().len()
    );
    Ok(model)
}

fn cached_occupancy_model(source: &Path, cache_dir: &Path) -> Result<OccupancyModel, CatalogError> {
    let cache = cache_path(cache_dir, source);
    if is_fresh(&cache, source)? {
        match read_cached_model(&cache) {
            Ok(Some(model)) => {
                info!("Cache hit for occupancy curves at {:?}", cache);
                return Ok(model);
            }
            Ok(None) => warn!("Discarding invalid occupancy curve cache {:?}", cache),
            Err(e) => warn!("Ignoring unreadable occupancy curve cache: {}", e),
        }
    } else {
        warn!("Cache miss for occupancy curves at {:?}. Interpolating.", cache);
    }

    let model = build_occupancy_model(source)?;
    match write_cached_model(&model, &cache) {
        Ok(bytes) => info!("Cached occupancy curves ({} bytes) to {:?}", bytes, cache),
        Err(e) => warn!("Failed to cache occupancy curves: {}", e),
    }
    Ok(model)
}

async fn load_occupancy(
    source: PathBuf,
    cache_dir: Option<PathBuf>,
) -> Result<OccupancyModel, CatalogError> {
    task::spawn_blocking(move || match cache_dir {
        Some(dir) => cached_occupancy_model(&source, &dir),
        None => build_occupancy_model(&source),
    })
    .await?
}
