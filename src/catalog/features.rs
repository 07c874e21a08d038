//! Reading street geometry and charging stations from GeoJSON feature collections.

use crate::catalog::error::CatalogError;
use crate::types::charging_station::{ChargingLevels, ChargingStation, ConnectorTypes};
use crate::types::data_source::Dataset;
use crate::types::layer::STREET_COLUMN;
use crate::types::location::LatLon;
use geojson::{Feature, GeoJson, Value};
use log::{info, warn};
use serde_json::Value as JsonValue;
use std::path::Path;

/// Line geometry of one street, as (lon, lat) positions converted to [`LatLon`].
pub type StreetLines = (String, Vec<Vec<LatLon>>);

const INLINE_SOURCE: &str = "<inline>";

fn read_features(dataset: Dataset, path: &Path) -> Result<Vec<Feature>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::ReadIo {
        dataset,
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_features(dataset, &text, path)
}

fn parse_features(dataset: Dataset, text: &str, origin: &Path) -> Result<Vec<Feature>, CatalogError> {
    let geojson = text
        .parse::<GeoJson>()
        .map_err(|e| CatalogError::GeoJsonParse {
            dataset,
            path: origin.to_path_buf(),
            source: Box::new(e),
        })?;
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection.features),
        _ => Err(CatalogError::NotAFeatureCollection { dataset }),
    }
}

fn position(coordinates: &[f64]) -> Option<LatLon> {
    match coordinates {
        [lon, lat, ..] => Some(LatLon::from_lon_lat(*lon, *lat)),
        _ => None,
    }
}

fn line(positions: &[Vec<f64>]) -> Vec<LatLon> {
    positions.iter().filter_map(|p| position(p)).collect()
}

fn string_property(feature: &Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Booleans are taken as is; numbers (port counts) are true when positive.
fn flag_property(feature: &Feature, key: &str) -> Option<bool> {
    match feature.property(key)? {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::Number(n) => n.as_f64().map(|v| v > 0.0),
        JsonValue::Null => Some(false),
        _ => None,
    }
}

/// Extracts `(UNITDESC, lines)` from LineString and MultiLineString features.
///
/// Features without a name or with another geometry type are skipped and logged.
pub fn street_lines_from_str(text: &str) -> Result<Vec<StreetLines>, CatalogError> {
    Ok(street_lines(parse_features(
        Dataset::Streets,
        text,
        Path::new(INLINE_SOURCE),
    )?))
}

fn street_lines(features: Vec<Feature>) -> Vec<StreetLines> {
    let mut streets = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let Some(name) = string_property(feature, STREET_COLUMN) else {
            warn!("Skipping street feature {} without a {} property", i, STREET_COLUMN);
            continue;
        };
        let lines = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::LineString(positions)) => vec![line(positions)],
            Some(Value::MultiLineString(parts)) => parts.iter().map(|p| line(p)).collect(),
            _ => {
                warn!("Skipping street '{}': geometry is not a line", name);
                continue;
            }
        };
        streets.push((name, lines));
    }
    streets
}

pub fn read_street_lines(path: &Path) -> Result<Vec<StreetLines>, CatalogError> {
    let streets = street_lines(read_features(Dataset::Streets, path)?);
    info!("Loaded geometry of {} streets from {:?}", streets.len(), path);
    Ok(streets)
}

/// Builds stations from Point features.
///
/// Connector flags come from the `NEMA520`, `J1772`, `J1772COMBO`, `CHADEMO` and `TESLA`
/// properties; when none of them is present the `EV Connector Types` text is parsed instead.
pub fn stations_from_str(text: &str) -> Result<Vec<ChargingStation>, CatalogError> {
    Ok(stations(parse_features(
        Dataset::Stations,
        text,
        Path::new(INLINE_SOURCE),
    )?))
}

fn stations(features: Vec<Feature>) -> Vec<ChargingStation> {
    let mut stations = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let Some(name) = string_property(feature, "Station Name") else {
            warn!("Skipping station feature {} without a name", i);
            continue;
        };
        let location = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Point(coordinates)) => position(coordinates),
            _ => None,
        };
        let Some(location) = location.filter(|l| l.is_finite()) else {
            warn!("Skipping station '{}': geometry is not a point", name);
            continue;
        };

        let levels = ChargingLevels {
            level1: flag_property(feature, "Level 1").unwrap_or(false),
            level2: flag_property(feature, "Level 2").unwrap_or(false),
            dc_fast: flag_property(feature, "DC Fast").unwrap_or(false),
        };
        let flags = [
            flag_property(feature, "NEMA520"),
            flag_property(feature, "J1772"),
            flag_property(feature, "J1772COMBO"),
            flag_property(feature, "CHADEMO"),
            flag_property(feature, "TESLA"),
        ];
        let connectors = if flags.iter().any(Option::is_some) {
            let [nema520, j1772, j1772combo, chademo, tesla] = flags.map(|f| f.unwrap_or(false));
            ConnectorTypes {
                nema520,
                j1772,
                j1772combo,
                chademo,
                tesla,
            }
        } else {
            string_property(feature, "EV Connector Types")
                .map(|text| ConnectorTypes::from_description(&text))
                .unwrap_or_default()
        };

        stations.push(ChargingStation {
            name,
            address: string_property(feature, "Street Address"),
            zip: string_property(feature, "ZIP"),
            phone: string_property(feature, "Station Phone"),
            location,
            levels,
            connectors,
        });
    }
    stations
}

pub fn read_stations(path: &Path) -> Result<Vec<ChargingStation>, CatalogError> {
    let stations = stations(read_features(Dataset::Stations, path)?);
    info!("Loaded {} charging stations from {:?}", stations.len(), path);
    Ok(stations)
}
