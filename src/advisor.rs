use crate::catalog::station_catalog::StationCatalog;
use crate::catalog::street_catalog::StreetCatalog;
use crate::error::ParkingAdvisorError;
use crate::types::charging_station::ChargingStation;
use crate::types::data_source::DataSources;
use crate::types::layer::{LayerFrame, LayerMode, LayerQuery};
use crate::types::location::LatLon;
use crate::types::recommendation::RecommendationRow;
use crate::types::street_details::StreetDetails;
use crate::types::weekday_class::WeekdayClass;
use crate::types::weights::Weights;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use chrono::{NaiveDateTime, Timelike};
use std::collections::HashMap;

/// The main entry point: loaded street and station catalogs plus the queries a map front
/// end needs.
///
/// Loading is asynchronous and happens once. Every query afterwards is a synchronous,
/// read-only computation, so a `ParkingAdvisor` can be shared between request handlers
/// behind an `Arc` without locking.
///
/// # Examples
///
/// ```no_run
/// # use parking_advisor::{DataSources, LatLon, ParkingAdvisor, ParkingAdvisorError};
/// use chrono::NaiveDate;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), ParkingAdvisorError> {
/// let advisor = ParkingAdvisor::load(DataSources::in_dir("data")).await?;
///
/// let monday_morning = NaiveDate::from_ymd_opt(2018, 12, 10)
///     .unwrap()
///     .and_hms_opt(8, 32, 0)
///     .unwrap();
/// let mut rows = advisor
///     .recommend()
///     .destination(LatLon(47.6062, -122.3321))
///     .time(monday_morning)
///     .call()?;
/// rows.sort_by(|a, b| b.score.total_cmp(&a.score));
/// println!("Best street: {}", rows[0].street);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParkingAdvisor {
    streets: StreetCatalog,
    stations: StationCatalog,
}

#[bon]
impl ParkingAdvisor {
    /// Loads all four datasets named by `sources`.
    ///
    /// When `sources.cache_dir` is set the directory is created if needed and used for the
    /// occupancy curve cache.
    ///
    /// # Errors
    ///
    /// [`ParkingAdvisorError::CacheDirCreation`] if the cache directory cannot be created,
    /// [`ParkingAdvisorError::Catalog`] if a dataset cannot be read or parsed.
    pub async fn load(sources: DataSources) -> Result<Self, ParkingAdvisorError> {
        if let Some(cache_dir) = &sources.cache_dir {
            ensure_cache_dir_exists(cache_dir)
                .await
                .map_err(|e| ParkingAdvisorError::CacheDirCreation(cache_dir.clone(), e))?;
        }
        let (streets, stations) = tokio::try_join!(
            StreetCatalog::load(&sources),
            StationCatalog::load(&sources.station_file),
        )?;
        Ok(Self::from_catalogs(streets, stations))
    }

    /// Like [`ParkingAdvisor::load`], caching curves in the user's cache directory
    /// (e.g. `~/.cache/parking_advisor_cache` on Linux).
    pub async fn load_with_default_cache(sources: DataSources) -> Result<Self, ParkingAdvisorError> {
        let cache_dir = get_cache_dir().map_err(ParkingAdvisorError::CacheDirResolution)?;
        Self::load(sources.with_cache_dir(cache_dir)).await
    }

    pub fn from_catalogs(streets: StreetCatalog, stations: StationCatalog) -> Self {
        Self { streets, stations }
    }

    pub fn streets(&self) -> &StreetCatalog {
        &self.streets
    }

    pub fn stations(&self) -> &StationCatalog {
        &self.stations
    }

    /// Scores every street for a trip to `destination` at `time`.
    ///
    /// # Arguments
    ///
    /// * `.destination(LatLon)`: **Required.** Where the driver is going.
    /// * `.time(NaiveDateTime)`: **Required.** Local arrival time.
    /// * `.weights(Weights)`: Optional. Factor weights, defaults to 0.3 / 0.4 / 0.3 for
    ///   rate / occupancy / distance.
    ///
    /// Rows are sorted by street name; each carries the raw factors, their normalized
    /// values and a score in `[0, 1]`, higher being better.
    ///
    /// # Errors
    ///
    /// [`ParkingAdvisorError::Recommend`] when no street has all three factors, when all
    /// scores coincide, or when a weight is not finite.
    #[builder]
    pub fn recommend(
        &self,
        destination: LatLon,
        time: NaiveDateTime,
        weights: Option<Weights>,
    ) -> Result<Vec<RecommendationRow>, ParkingAdvisorError> {
        let weights = weights.unwrap_or_default();
        Ok(self.streets.engine().recommend(&destination, &time, &weights)?)
    }

    /// Hourly rate of every street for a weekday class and an hour of the day.
    pub fn rate_at_time(
        &self,
        class: WeekdayClass,
        hour: u32,
    ) -> Result<HashMap<String, f64>, ParkingAdvisorError> {
        Ok(self.streets.rates().rate_at_time(class, hour)?)
    }

    /// Predicted occupancy of every street at a clock time.
    pub fn occupancy_at_time(
        &self,
        time: &impl Timelike,
    ) -> Result<HashMap<String, f64>, ParkingAdvisorError> {
        Ok(self.streets.occupancy().occupancy_at_time(time)?)
    }

    /// Computes one map layer.
    pub fn layer(&self, query: &LayerQuery) -> Result<LayerFrame, ParkingAdvisorError> {
        let values: HashMap<String, f64> = match *query {
            LayerQuery::Rate { time } => {
                self.rate_at_time(WeekdayClass::from_date(time.date()), time.hour())?
            }
            LayerQuery::Occupancy { time } => self.occupancy_at_time(&time)?,
            LayerQuery::Recommendation {
                destination,
                time,
                weights,
            } => self
                .streets
                .engine()
                .recommend(&destination, &time, &weights)?
                .into_iter()
                .map(|row| (row.street, row.score))
                .collect(),
        };
        Ok(LayerFrame::from_map(query.mode(), values)?)
    }

    /// Computes a layer from its numeric front end code (1 rate, 2 occupancy,
    /// 3 recommendation). Unknown codes yield `Ok(None)`.
    pub fn layer_by_code(
        &self,
        code: u8,
        destination: LatLon,
        time: NaiveDateTime,
    ) -> Result<Option<LayerFrame>, ParkingAdvisorError> {
        let query = match LayerMode::from_code(code) {
            Some(LayerMode::Rate) => LayerQuery::Rate { time },
            Some(LayerMode::Occupancy) => LayerQuery::Occupancy { time },
            Some(LayerMode::Recommendation) => LayerQuery::Recommendation {
                destination,
                time,
                weights: Weights::default(),
            },
            None => return Ok(None),
        };
        self.layer(&query).map(Some)
    }

    /// Detail view of one street.
    ///
    /// # Errors
    ///
    /// [`ParkingAdvisorError::StreetNotFound`] if no dataset knows the name.
    pub fn street(&self, name: &str) -> Result<StreetDetails, ParkingAdvisorError> {
        self.streets
            .details(name)
            .ok_or_else(|| ParkingAdvisorError::StreetNotFound(name.to_string()))
    }

    /// Detail view of one charging station.
    ///
    /// # Errors
    ///
    /// [`ParkingAdvisorError::StationNotFound`] for an unknown name.
    pub fn station(&self, name: &str) -> Result<&ChargingStation, ParkingAdvisorError> {
        self.stations
            .station(name)
            .ok_or_else(|| ParkingAdvisorError::StationNotFound(name.to_string()))
    }

    /// Streets closest to a location, nearest first, with distances in miles.
    ///
    /// Defaults to at most 10 streets within 0.5 miles.
    #[builder]
    pub fn find_streets(
        &self,
        location: LatLon,
        max_distance_miles: Option<f64>,
        street_limit: Option<usize>,
    ) -> Vec<(String, f64)> {
        self.streets.nearest_streets(
            &location,
            street_limit.unwrap_or(10),
            max_distance_miles.unwrap_or(0.5),
        )
    }

    /// Charging stations closest to a location, nearest first, with distances in miles.
    ///
    /// Defaults to at most 5 stations within 2 miles.
    #[builder]
    pub fn find_stations(
        &self,
        location: LatLon,
        max_distance_miles: Option<f64>,
        station_limit: Option<usize>,
    ) -> Vec<(ChargingStation, f64)> {
        self.stations
            .nearest(
                &location,
                station_limit.unwrap_or(5),
                max_distance_miles.unwrap_or(2.0),
            )
            .into_iter()
            .map(|(station, miles)| (station.clone(), miles))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::index::DistanceIndex;
    use crate::distance::street_point::StreetPoint;
    use crate::occupancy::curve::OccupancySample;
    use crate::occupancy::model::OccupancyModel;
    use crate::rates::schedule::{DaySchedule, RateSchedule, RateSegment, StreetRates};
    use crate::types::charging_station::{ChargingLevels, ConnectorTypes};
    use chrono::NaiveDate;

    fn advisor() -> ParkingAdvisor {
        let mut rates = RateSchedule::new();
        let mut samples = Vec::new();
        let mut points = Vec::new();
        for (i, (street, lat, lon)) in [
            ("PINE ST", 47.6108, -122.3362),
            ("PIKE ST", 47.6095, -122.3380),
            ("MERCER ST", 47.6245, -122.3500),
            ("JAMES ST", 47.6030, -122.3320),
        ]
        .into_iter()
        .enumerate()
        {
            let rate = 1.0 + i as f64;
            let weekday = DaySchedule::new(vec![RateSegment::new(8, 20, rate)]).unwrap();
            let saturday = DaySchedule::new(vec![RateSegment::new(10, 18, rate / 2.0)]).unwrap();
            rates.insert(street, StreetRates::new(weekday, saturday));
            samples.push((
                street.to_string(),
                vec![
                    OccupancySample::new(8.0, 0.1 * (i + 1) as f64),
                    OccupancySample::new(12.0, 0.2 * (i + 1) as f64),
                ],
            ));
            points.push(StreetPoint::new(street, LatLon(lat, lon)));
        }
        let streets = StreetCatalog::new(
            rates,
            OccupancyModel::from_samples(samples),
            DistanceIndex::from_points(points),
        );
        let stations = StationCatalog::new(vec![ChargingStation {
            name: "CITY HALL".to_string(),
            address: Some("600 4th Ave".to_string()),
            zip: Some("98104".to_string()),
            phone: None,
            location: LatLon(47.6036, -122.3298),
            levels: ChargingLevels {
                level2: true,
                ..Default::default()
            },
            connectors: ConnectorTypes::from_description("J1772"),
        }]);
        ParkingAdvisor::from_catalogs(streets, stations)
    }

    fn saturday_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 12, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_recommend_builder_defaults() {
        let advisor = advisor();
        let rows = advisor
            .recommend()
            .destination(LatLon(47.6062, -122.3321))
            .time(saturday_noon())
            .call()
            .unwrap();
        let weighted = advisor
            .recommend()
            .destination(LatLon(47.6062, -122.3321))
            .time(saturday_noon())
            .weights(Weights::default())
            .call()
            .unwrap();
        assert_eq!(rows, weighted);
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_layers() {
        let advisor = advisor();
        let rate = advisor
            .layer(&LayerQuery::Rate {
                time: saturday_noon(),
            })
            .unwrap();
        assert_eq!(rate.value("MERCER ST").unwrap(), Some(1.5));

        let recomm = advisor
            .layer_by_code(3, LatLon(47.6062, -122.3321), saturday_noon())
            .unwrap()
            .unwrap();
        assert_eq!(recomm.mode, LayerMode::Recommendation);
        assert_eq!(recomm.len(), 4);
        assert!(advisor
            .layer_by_code(9, LatLon(47.6062, -122.3321), saturday_noon())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_detail_lookups() {
        let advisor = advisor();
        assert!(advisor.street("PINE ST").is_ok());
        assert!(matches!(
            advisor.street("SPRING ST"),
            Err(ParkingAdvisorError::StreetNotFound(_))
        ));
        assert_eq!(advisor.station("CITY HALL").unwrap().zip.as_deref(), Some("98104"));
        assert!(matches!(
            advisor.station("SPACE NEEDLE"),
            Err(ParkingAdvisorError::StationNotFound(_))
        ));
    }

    #[test]
    fn test_find_streets_and_stations() {
        let advisor = advisor();
        let streets = advisor
            .find_streets()
            .location(LatLon(47.6105, -122.3365))
            .street_limit(2)
            .call();
        assert_eq!(streets.len(), 2);
        assert_eq!(streets[0].0, "PINE ST");

        let stations = advisor
            .find_stations()
            .location(LatLon(47.6062, -122.3321))
            .call();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].0.name, "CITY HALL");
    }
}
