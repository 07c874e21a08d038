//! Reading the rate rule and occupancy sample CSV exports with polars.

use crate::catalog::error::CatalogError;
use crate::occupancy::curve::OccupancySample;
use crate::rates::error::{RateScheduleError, ScheduleViolation};
use crate::rates::schedule::{DaySchedule, RateSchedule, RateSegment, StreetRates};
use crate::types::data_source::Dataset;
use crate::types::layer::STREET_COLUMN;
use crate::types::weekday_class::WeekdayClass;
use log::{info, warn};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

const WEEKDAY_PREFIX: &str = "WKD";
const SATURDAY_PREFIX: &str = "SAT";
const TIME_LIMIT_COLUMN: &str = "PARKING_TIME_LIMIT";
const HOUR_COLUMN: &str = "HOUR";
const OCCUPANCY_COLUMN: &str = "OCCUPANCY";

pub fn read_csv(dataset: Dataset, path: &Path) -> Result<DataFrame, CatalogError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| CatalogError::CsvRead {
            dataset,
            path: path.to_path_buf(),
            source: e,
        })?
        .finish()
        .map_err(|e| CatalogError::CsvRead {
            dataset,
            path: path.to_path_buf(),
            source: e,
        })
}

fn column<'a>(df: &'a DataFrame, dataset: Dataset, name: &str) -> Result<&'a Column, CatalogError> {
    df.column(name).map_err(|e| CatalogError::MissingColumn {
        dataset,
        column: name.to_string(),
        source: e,
    })
}

fn cast_column(
    column: &Column,
    dataset: Dataset,
    data_type: &DataType,
) -> Result<Column, CatalogError> {
    column.cast(data_type).map_err(|e| CatalogError::ColumnType {
        dataset,
        column: column.name().to_string(),
        source: e,
    })
}

/// A numeric column read as nullable floats. Cells that do not parse as numbers are null.
fn float_values(column: &Column, dataset: Dataset) -> Result<Vec<Option<f64>>, CatalogError> {
    let cast = cast_column(column, dataset, &DataType::Float64)?;
    let values = cast.f64().map_err(|e| CatalogError::ColumnType {
        dataset,
        column: column.name().to_string(),
        source: e,
    })?;
    Ok(values.into_iter().collect())
}

fn string_values(column: &Column, dataset: Dataset) -> Result<Vec<Option<String>>, CatalogError> {
    let cast = cast_column(column, dataset, &DataType::String)?;
    let values = cast.str().map_err(|e| CatalogError::ColumnType {
        dataset,
        column: column.name().to_string(),
        source: e,
    })?;
    Ok(values
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect())
}

fn required_floats(
    df: &DataFrame,
    dataset: Dataset,
    name: &str,
) -> Result<Vec<Option<f64>>, CatalogError> {
    float_values(column(df, dataset, name)?, dataset)
}

fn optional_floats(
    df: &DataFrame,
    dataset: Dataset,
    name: &str,
) -> Result<Option<Vec<Option<f64>>>, CatalogError> {
    df.column(name)
        .ok()
        .map(|c| float_values(c, dataset))
        .transpose()
}

/// The start, end and rate cells of one weekday class.
///
/// `START2` and `START3` may be omitted or empty, in which case the segment begins where
/// the previous one ends.
struct DayColumns {
    starts: Vec<Option<Vec<Option<f64>>>>,
    ends: Vec<Vec<Option<f64>>>,
    rates: Vec<Vec<Option<f64>>>,
}

impl DayColumns {
    fn read(df: &DataFrame, prefix: &str) -> Result<Self, CatalogError> {
        let dataset = Dataset::Rates;
        let mut starts = Vec::with_capacity(DaySchedule::MAX_SEGMENTS);
        let mut ends = Vec::with_capacity(DaySchedule::MAX_SEGMENTS);
        let mut rates = Vec::with_capacity(DaySchedule::MAX_SEGMENTS);
        for k in 1..=DaySchedule::MAX_SEGMENTS {
            let start_name = format!("{}_START{}", prefix, k);
            starts.push(if k == 1 {
                Some(required_floats(df, dataset, &start_name)?)
            } else {
                optional_floats(df, dataset, &start_name)?
            });
            ends.push(required_floats(df, dataset, &format!("{}_END{}", prefix, k))?);
            rates.push(required_floats(df, dataset, &format!("{}_RATE{}", prefix, k))?);
        }
        Ok(Self {
            starts,
            ends,
            rates,
        })
    }

    fn schedule(&self, row: usize) -> Result<DaySchedule, ScheduleViolation> {
        let mut segments = Vec::new();
        let mut previous_end: Option<f64> = None;
        for k in 0..DaySchedule::MAX_SEGMENTS {
            let end = self.ends[k][row];
            let start = self.starts[k]
                .as_ref()
                .and_then(|starts| starts[row])
                .or(if end.is_some() { previous_end } else { None });
            if let Some(segment) = RateSegment::from_cells(k + 1, start, end, self.rates[k][row])? {
                segments.push(segment);
            }
            previous_end = end.or(previous_end);
        }
        DaySchedule::new(segments)
    }
}

/// Builds the rate schedule from a rate rule table.
///
/// Expected columns are `UNITDESC`, `{WKD,SAT}_START1`, `{WKD,SAT}_{END,RATE}{1,2,3}`,
/// optionally `{WKD,SAT}_START{2,3}` and `PARKING_TIME_LIMIT` in minutes. A street whose
/// weekday or Saturday rules do not validate is logged and recorded as rejected.
pub fn rate_schedule_from_frame(df: &DataFrame) -> Result<RateSchedule, CatalogError> {
    let dataset = Dataset::Rates;
    let streets = string_values(column(df, dataset, STREET_COLUMN)?, dataset)?;
    let weekday = DayColumns::read(df, WEEKDAY_PREFIX)?;
    let saturday = DayColumns::read(df, SATURDAY_PREFIX)?;
    let limits = optional_floats(df, dataset, TIME_LIMIT_COLUMN)?;

    let mut schedule = RateSchedule::new();
    for (row, street) in streets.into_iter().enumerate() {
        let Some(street) = street.filter(|s| !s.is_empty()) else {
            warn!("Skipping rate row {} without a street name", row);
            continue;
        };

        let days = [
            (WeekdayClass::Weekday, &weekday),
            (WeekdayClass::Saturday, &saturday),
        ]
        .map(|(class, columns)| {
            columns
                .schedule(row)
                .map_err(|reason| RateScheduleError::InvalidSchedule {
                    street: street.clone(),
                    class,
                    reason,
                })
        });
        let [weekday_rules, saturday_rules] = days;
        let rates = match (weekday_rules, saturday_rules) {
            (Ok(wkd), Ok(sat)) => StreetRates::new(wkd, sat),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Excluding street from rate schedule: {}", e);
                schedule.reject(street);
                continue;
            }
        };
        let rates = match limits.as_ref().and_then(|l| l[row]) {
            Some(minutes) if minutes.is_finite() && minutes > 0.0 => rates.with_time_limit(minutes),
            _ => rates,
        };
        if schedule.get(&street).is_some() {
            warn!("Street '{}' has more than one rate row, keeping the last", street);
        }
        schedule.insert(street, rates);
    }
    Ok(schedule)
}

/// Reads and validates the rate rule CSV.
pub fn read_rate_schedule(path: &Path) -> Result<RateSchedule, CatalogError> {
    let df = read_csv(Dataset::Rates, path)?;
    let schedule = rate_schedule_from_frame(&df)?;
    info!(
        "Loaded rate rules for {} streets from {:?} ({} rejected)",
        schedule.len(),
        path,
        schedule.rejected().len()
    );
    Ok(schedule)
}

/// Groups an occupancy table (`UNITDESC`, `HOUR`, `OCCUPANCY`) into samples per street.
///
/// Rows with a missing street, hour or occupancy are skipped.
pub fn occupancy_samples_from_frame(
    df: &DataFrame,
) -> Result<HashMap<String, Vec<OccupancySample>>, CatalogError> {
    let dataset = Dataset::Occupancy;
    let streets = string_values(column(df, dataset, STREET_COLUMN)?, dataset)?;
    let hours = required_floats(df, dataset, HOUR_COLUMN)?;
    let occupancy = required_floats(df, dataset, OCCUPANCY_COLUMN)?;

    let mut samples: HashMap<String, Vec<OccupancySample>> = HashMap::new();
    let mut skipped = 0usize;
    for ((street, hour), value) in streets.into_iter().zip(hours).zip(occupancy) {
        match (street.filter(|s| !s.is_empty()), hour, value) {
            (Some(street), Some(hour), Some(value)) => samples
                .entry(street)
                .or_default()
                .push(OccupancySample::new(hour, value)),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!("Skipped {} incomplete occupancy rows", skipped);
    }
    Ok(samples)
}

/// Reads the occupancy CSV into samples per street.
pub fn read_occupancy_samples(
    path: &Path,
) -> Result<HashMap<String, Vec<OccupancySample>>, CatalogError> {
    let df = read_csv(Dataset::Occupancy, path)?;
    let samples = occupancy_samples_from_frame(&df)?;
    info!(
        "Loaded {} occupancy rows for {} streets from {:?}",
        df.height(),
        samples.len(),
        path
    );
    Ok(samples)
}
