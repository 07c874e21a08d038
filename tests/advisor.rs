use chrono::{NaiveDate, NaiveDateTime};
use parking_advisor::{
    CatalogError, DataSources, LatLon, LayerMode, LayerQuery, ParkingAdvisor, ParkingAdvisorError,
    WeekdayClass, Weights,
};
use std::path::PathBuf;

const PINE: &str = "PINE ST BETWEEN 3RD AVE AND 4TH AVE";
const PIKE: &str = "PIKE ST BETWEEN 1ST AVE AND 2ND AVE";
const MERCER: &str = "MERCER ST BETWEEN 5TH AVE N AND 6TH AVE N";
const JAMES: &str = "JAMES ST BETWEEN 4TH AVE AND 5TH AVE";
const BROKEN: &str = "BROKEN ST BETWEEN 7TH AVE AND 8TH AVE";

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 12, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn westlake() -> LatLon {
    LatLon(47.6110, -122.3368)
}

async fn load(cache_dir: &std::path::Path) -> ParkingAdvisor {
    ParkingAdvisor::load(DataSources::in_dir(data_dir()).with_cache_dir(cache_dir))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_recommend_from_files() {
    let cache = tempfile::tempdir().unwrap();
    let advisor = load(cache.path()).await;

    // Monday, shortly after noon.
    let rows = advisor
        .recommend()
        .destination(westlake())
        .time(at(10, 12, 2))
        .call()
        .unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.street.as_str()).collect();
    assert_eq!(names, vec![JAMES, MERCER, PIKE, PINE]);

    let rate_of = |street: &str| rows.iter().find(|r| r.street == street).unwrap().rate;
    assert_eq!(rate_of(PINE), 3.0);
    assert_eq!(rate_of(PIKE), 4.0);
    assert_eq!(rate_of(MERCER), 1.0);
    assert_eq!(rate_of(JAMES), 3.5);

    let max = rows.iter().map(|r| r.score).fold(f64::MIN, f64::max);
    let min = rows.iter().map(|r| r.score).fold(f64::MAX, f64::min);
    assert_eq!(max, 1.0);
    assert_eq!(min, 0.0);
    for row in &rows {
        assert!(row.occupancy.is_finite());
        assert!((0.0..=1.0).contains(&row.normalized.rate));
        assert!((0.0..=1.0).contains(&row.normalized.occupancy));
        assert!((0.0..=1.0).contains(&row.normalized.distance));
    }
}

#[tokio::test]
async fn test_rate_only_weights_prefer_cheapest_street() {
    let cache = tempfile::tempdir().unwrap();
    let advisor = load(cache.path()).await;
    let rows = advisor
        .recommend()
        .destination(westlake())
        .time(at(10, 12, 0))
        .weights(Weights::new(1.0, 0.0, 0.0))
        .call()
        .unwrap();
    let best = rows
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .unwrap();
    assert_eq!(best.street, MERCER);
}

#[tokio::test]
async fn test_rejected_rules_are_excluded() {
    let cache = tempfile::tempdir().unwrap();
    let advisor = load(cache.path()).await;
    assert_eq!(advisor.streets().rates().rejected(), &[BROKEN.to_string()]);

    let rates = advisor.rate_at_time(WeekdayClass::Saturday, 12).unwrap();
    assert_eq!(rates.len(), 4);
    assert_eq!(rates[PINE], 2.0);
    assert_eq!(rates[PIKE], 2.5);
    assert_eq!(rates[MERCER], 0.0);
    assert_eq!(rates[JAMES], 1.0);
    assert!(!rates.contains_key(BROKEN));

    let sunday = advisor.rate_at_time(WeekdayClass::Sunday, 12).unwrap();
    assert!(sunday.values().all(|rate| *rate == 0.0));
}

#[tokio::test]
async fn test_layers_from_files() {
    let cache = tempfile::tempdir().unwrap();
    let advisor = load(cache.path()).await;

    let rate = advisor
        .layer(&LayerQuery::Rate { time: at(15, 12, 0) })
        .unwrap();
    assert_eq!(rate.mode, LayerMode::Rate);
    assert_eq!(rate.value(PIKE).unwrap(), Some(2.5));
    assert_eq!(rate.value(BROKEN).unwrap(), None);

    let occupancy = advisor
        .layer(&LayerQuery::Occupancy { time: at(10, 8, 0) })
        .unwrap();
    assert_eq!(occupancy.len(), 5);
    let pine = occupancy.value(PINE).unwrap().unwrap();
    assert!((pine - 0.3).abs() < 1e-9);

    let recommendation = advisor
        .layer_by_code(3, westlake(), at(10, 12, 0))
        .unwrap()
        .unwrap();
    assert_eq!(recommendation.len(), 4);
}

#[tokio::test]
async fn test_curve_cache_is_reused() {
    let cache = tempfile::tempdir().unwrap();
    let first = load(cache.path()).await;
    let cached = cache.path().join("occupancy_curves_Occupancy_per_hour.bin");
    assert!(cached.is_file());

    let second = load(cache.path()).await;
    assert_eq!(first.streets().occupancy(), second.streets().occupancy());
}

#[tokio::test]
async fn test_details_and_stations() {
    let cache = tempfile::tempdir().unwrap();
    let advisor = load(cache.path()).await;

    let pine = advisor.street(PINE).unwrap();
    assert_eq!(pine.time_limit_hours, Some(2.0));
    assert!(pine.rate_table.is_some());
    assert!(pine.occupancy.is_some());
    assert!(pine.location.is_some());

    let spring = advisor.street("SPRING ST BETWEEN 4TH AVE AND 5TH AVE").unwrap();
    assert!(spring.rate_table.is_none());
    assert!(spring.location.is_some());

    assert!(advisor.street("WESTLAKE PARK").is_err());

    assert_eq!(advisor.stations().len(), 3);
    let tower = advisor.station("SEATTLE MUNICIPAL TOWER").unwrap();
    assert_eq!(tower.zip.as_deref(), Some("98104"));
    assert!(tower.levels.level2);
    assert!(!tower.levels.dc_fast);
    assert!(tower.connectors.j1772);
    assert!(tower.connectors.nema520);
    assert!(!tower.connectors.tesla);

    let nearest = advisor.find_stations().location(westlake()).call();
    assert_eq!(nearest[0].0.name, "PACIFIC PLACE");
    assert!(nearest[0].0.connectors.tesla);

    let streets = advisor
        .find_streets()
        .location(westlake())
        .street_limit(1)
        .call();
    assert_eq!(streets[0].0, PINE);
}

#[tokio::test]
async fn test_missing_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let result = ParkingAdvisor::load(DataSources::in_dir(dir.path())).await;
    assert!(matches!(
        result,
        Err(ParkingAdvisorError::Catalog(
            CatalogError::CsvRead { .. } | CatalogError::ReadIo { .. }
        ))
    ));
}
