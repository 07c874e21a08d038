//! Defines the input datasets the advisor is built from and where to find them.

use bon::Builder;
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the four flat-file exports the advisor loads at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Time-of-day parking rate rules per street (CSV).
    Rates,
    /// Observed occupancy per street and hour of day (CSV).
    Occupancy,
    /// Street geometry (GeoJSON line strings).
    Streets,
    /// Electric vehicle charging stations (GeoJSON points).
    Stations,
}

impl Dataset {
    /// Conventional file name of the export inside a data directory.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Dataset::Rates => "Rate_limit.csv",
            Dataset::Occupancy => "Occupancy_per_hour.csv",
            Dataset::Streets => "Streets_gis.json",
            Dataset::Stations => "EV Charger.json",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Dataset::Rates => "rates",
            Dataset::Occupancy => "occupancy",
            Dataset::Streets => "streets",
            Dataset::Stations => "stations",
        }
    }
}

/// Allows formatting a `Dataset` with a short lowercase label.
///
/// # Examples
///
/// ```
/// use parking_advisor::Dataset;
///
/// assert_eq!(Dataset::Occupancy.to_string(), "occupancy");
/// ```
impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// File locations of every dataset, plus an optional directory for derived caches.
///
/// Construct either with [`DataSources::in_dir`] when the exports use their
/// conventional names, or field by field through the builder.
///
/// # Examples
///
/// ```
/// use parking_advisor::DataSources;
///
/// let sources = DataSources::builder()
///     .rate_file("exports/rates.csv")
///     .occupancy_file("exports/occupancy.csv")
///     .street_file("exports/streets.geojson")
///     .station_file("exports/ev.geojson")
///     .cache_dir("/tmp/parking_cache")
///     .build();
/// assert!(sources.cache_dir.is_some());
///
/// let conventional = DataSources::in_dir("data");
/// assert!(conventional.rate_file.ends_with("Rate_limit.csv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct DataSources {
    #[builder(into)]
    pub rate_file: PathBuf,
    #[builder(into)]
    pub occupancy_file: PathBuf,
    #[builder(into)]
    pub street_file: PathBuf,
    #[builder(into)]
    pub station_file: PathBuf,
    /// Where interpolated occupancy curves are cached. `None` disables the cache.
    #[builder(into)]
    pub cache_dir: Option<PathBuf>,
}

impl DataSources {
    /// Uses the conventional file names inside `dir`, without a curve cache.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            rate_file: dir.join(Dataset::Rates.default_file_name()),
            occupancy_file: dir.join(Dataset::Occupancy.default_file_name()),
            street_file: dir.join(Dataset::Streets.default_file_name()),
            station_file: dir.join(Dataset::Stations.default_file_name()),
            cache_dir: None,
        }
    }

    /// Returns a copy that caches derived curves in `cache_dir`.
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn path(&self, dataset: Dataset) -> &Path {
        match dataset {
            Dataset::Rates => &self.rate_file,
            Dataset::Occupancy => &self.occupancy_file,
            Dataset::Streets => &self.street_file,
            Dataset::Stations => &self.station_file,
        }
    }
}
