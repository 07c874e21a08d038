use crate::distance::index::DistanceIndex;
use crate::occupancy::model::OccupancyModel;
use crate::rates::schedule::RateSchedule;
use crate::recommend::error::RecommendError;
use crate::recommend::normalize::{invert_rescale, log_distance, min_max_normalize};
use crate::types::location::LatLon;
use crate::types::recommendation::{NormalizedFactors, RecommendationRow};
use crate::types::weekday_class::WeekdayClass;
use crate::types::weights::Weights;
use chrono::{NaiveDateTime, Timelike};
use log::debug;
use std::collections::HashMap;

/// Scores streets for a destination and a time from three read-only catalogs.
///
/// The engine only borrows the catalogs, so any number of engines can score
/// concurrently over the same loaded data.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine<'a> {
    rates: &'a RateSchedule,
    occupancy: &'a OccupancyModel,
    distances: &'a DistanceIndex,
}

struct JoinedStreet {
    street: String,
    rate: f64,
    occupancy: f64,
    distance: f64,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(
        rates: &'a RateSchedule,
        occupancy: &'a OccupancyModel,
        distances: &'a DistanceIndex,
    ) -> Self {
        Self {
            rates,
            occupancy,
            distances,
        }
    }

    /// Scores every street that has a rate, an occupancy curve and a location.
    ///
    /// Streets missing from any of the three catalogs are left out. Rows come back sorted by
    /// street name; ranking by score is left to the caller.
    ///
    /// # Errors
    ///
    /// - [`RecommendError::InvalidWeights`] if a weight is NaN or infinite.
    /// - [`RecommendError::EmptyJoin`] if no street is present in all three catalogs.
    /// - [`RecommendError::DegenerateScores`] if all streets end up with the same combined
    ///   cost, which includes the single street case.
    pub fn recommend(
        &self,
        destination: &LatLon,
        time: &NaiveDateTime,
        weights: &Weights,
    ) -> Result<Vec<RecommendationRow>, RecommendError> {
        if !weights.is_finite() {
            return Err(RecommendError::InvalidWeights(*weights));
        }
        let class = WeekdayClass::from_date(time.date());
        let rates = self.rates.rate_at_time(class, time.hour())?;
        let occupancy = self.occupancy.occupancy_at_time(time)?;
        let distances = self.distances.distances_to(destination);

        let joined = join(&rates, &occupancy, &distances);
        debug!(
            "Joined {} streets from {} rates, {} curves and {} locations",
            joined.len(),
            rates.len(),
            occupancy.len(),
            distances.len()
        );
        if joined.is_empty() {
            return Err(RecommendError::EmptyJoin);
        }

        let rate_column: Vec<f64> = joined.iter().map(|s| s.rate).collect();
        let occupancy_column: Vec<f64> = joined.iter().map(|s| s.occupancy).collect();
        let distance_column: Vec<f64> = joined.iter().map(|s| log_distance(s.distance)).collect();

        let rate_norm = min_max_normalize(&rate_column);
        let occupancy_norm = min_max_normalize(&occupancy_column);
        let distance_norm = min_max_normalize(&distance_column);

        let raw: Vec<f64> = (0..joined.len())
            .map(|i| weights.combine(rate_norm[i], occupancy_norm[i], distance_norm[i]))
            .collect();
        let scores = invert_rescale(&raw)?;

        Ok(joined
            .into_iter()
            .enumerate()
            .map(|(i, s)| RecommendationRow {
                street: s.street,
                rate: s.rate,
                occupancy: s.occupancy,
                distance: s.distance,
                normalized: NormalizedFactors {
                    rate: rate_norm[i],
                    occupancy: occupancy_norm[i],
                    distance: distance_norm[i],
                },
                score: scores[i],
            })
            .collect())
    }
}

/// Inner join on street name, sorted by street.
fn join(
    rates: &HashMap<String, f64>,
    occupancy: &HashMap<String, f64>,
    distances: &HashMap<String, f64>,
) -> Vec<JoinedStreet> {
    let mut joined: Vec<JoinedStreet> = rates
        .iter()
        .filter_map(|(street, rate)| {
            Some(JoinedStreet {
                street: street.clone(),
                rate: *rate,
                occupancy: *occupancy.get(street)?,
                distance: *distances.get(street)?,
            })
        })
        .collect();
    joined.sort_by(|a, b| a.street.cmp(&b.street));
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::street_point::StreetPoint;
    use crate::occupancy::curve::{OccupancyCurve, OccupancySample};
    use crate::rates::schedule::{DaySchedule, RateSegment, StreetRates};
    use chrono::NaiveDate;

    fn monday_0832() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 12, 10)
            .unwrap()
            .and_hms_opt(8, 32, 0)
            .unwrap()
    }

    fn street_name(i: usize) -> String {
        format!("STREET {:04}", i)
    }

    /// A deterministic catalog of `n` streets spread around downtown, with varied rates,
    /// occupancy profiles and locations.
    fn synthetic_catalog(n: usize) -> (RateSchedule, OccupancyModel, DistanceIndex) {
        let mut rates = RateSchedule::new();
        let mut samples = Vec::new();
        let mut points = Vec::new();
        for i in 0..n {
            let street = street_name(i);
            let rate = (i % 7) as f64 * 0.5;
            let weekday = DaySchedule::new(vec![
                RateSegment::new(8, 11, rate),
                RateSegment::new(11, 18, rate + 1.0),
            ])
            .unwrap();
            let saturday = DaySchedule::new(vec![RateSegment::new(10, 18, rate)]).unwrap();
            rates.insert(street.clone(), StreetRates::new(weekday, saturday));

            let peak = 0.3 + (i % 11) as f64 * 0.06;
            samples.push((
                street.clone(),
                vec![
                    OccupancySample::new(6.0, 0.1),
                    OccupancySample::new(9.0, peak * 0.8),
                    OccupancySample::new(13.0, peak),
                    OccupancySample::new(17.0, peak * 0.9),
                    OccupancySample::new(21.0, 0.15),
                ],
            ));

            let ring = 0.002 + (i % 37) as f64 * 0.0015;
            let angle = i as f64 * 0.7;
            points.push(StreetPoint::new(
                street,
                LatLon(47.6062 + ring * angle.sin(), -122.3321 + ring * angle.cos()),
            ));
        }
        (
            rates,
            OccupancyModel::from_samples(samples),
            DistanceIndex::from_points(points),
        )
    }

    #[test]
    fn test_downtown_scenario_spans_unit_interval() {
        let (rates, occupancy, distances) = synthetic_catalog(1234);
        let engine = RecommendationEngine::new(&rates, &occupancy, &distances);
        let rows = engine
            .recommend(&LatLon(47.6062, -122.3321), &monday_0832(), &Weights::default())
            .unwrap();
        assert_eq!(rows.len(), 1234);

        let columns: [Vec<f64>; 4] = [
            rows.iter().map(|r| r.normalized.rate).collect(),
            rows.iter().map(|r| r.normalized.occupancy).collect(),
            rows.iter().map(|r| r.normalized.distance).collect(),
            rows.iter().map(|r| r.score).collect(),
        ];
        for column in &columns {
            assert!(column.iter().all(|v| (0.0..=1.0).contains(v)));
            let min = column.iter().copied().fold(f64::INFINITY, f64::min);
            let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(min, 0.0);
            assert_eq!(max, 1.0);
        }
        assert!(rows.windows(2).all(|w| w[0].street < w[1].street));
    }

    #[test]
    fn test_raw_values_are_kept() {
        let (rates, occupancy, distances) = synthetic_catalog(20);
        let engine = RecommendationEngine::new(&rates, &occupancy, &distances);
        let destination = LatLon(47.6062, -122.3321);
        let rows = engine
            .recommend(&destination, &monday_0832(), &Weights::default())
            .unwrap();
        let row = rows.iter().find(|r| r.street == street_name(3)).unwrap();
        assert_eq!(row.rate, 1.5);
        assert_eq!(
            row.occupancy,
            occupancy.occupancy_at(&street_name(3), &monday_0832()).unwrap()
        );
        assert_eq!(
            row.distance,
            destination.geodesic_miles(&distances.location(&street_name(3)).unwrap())
        );
    }

    #[test]
    fn test_lowest_cost_street_scores_one() {
        let mut rates = RateSchedule::new();
        let mut samples = Vec::new();
        let mut points = Vec::new();
        let flat = |level: f64| vec![OccupancySample::new(12.0, level)];
        for (street, rate, level, lat) in [
            ("CHEAP CLOSE EMPTY", 1.0, 0.1, 47.6063),
            ("PRICEY FAR FULL", 4.0, 0.9, 47.6200),
            ("MIDDLE", 2.0, 0.5, 47.6100),
        ] {
            let day = DaySchedule::new(vec![RateSegment::new(0, 24, rate)]).unwrap();
            rates.insert(street, StreetRates::new(day.clone(), day));
            samples.push((street.to_string(), flat(level)));
            points.push(StreetPoint::new(street, LatLon(lat, -122.3321)));
        }
        let occupancy = OccupancyModel::from_samples(samples);
        let distances = DistanceIndex::from_points(points);
        let engine = RecommendationEngine::new(&rates, &occupancy, &distances);

        let rows = engine
            .recommend(&LatLon(47.6062, -122.3321), &monday_0832(), &Weights::default())
            .unwrap();
        let score = |name: &str| rows.iter().find(|r| r.street == name).unwrap().score;
        assert_eq!(score("CHEAP CLOSE EMPTY"), 1.0);
        assert_eq!(score("PRICEY FAR FULL"), 0.0);
        assert!(score("MIDDLE") > 0.0 && score("MIDDLE") < 1.0);
    }

    #[test]
    fn test_streets_missing_from_a_catalog_are_dropped() {
        let (rates, occupancy, full) = synthetic_catalog(10);
        let distances = DistanceIndex::from_points(
            (0..5)
                .map(|i| StreetPoint::new(street_name(i), full.location(&street_name(i)).unwrap()))
                .collect(),
        );
        let engine = RecommendationEngine::new(&rates, &occupancy, &distances);
        let rows = engine
            .recommend(&LatLon(47.6062, -122.3321), &monday_0832(), &Weights::default())
            .unwrap();
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_empty_join() {
        let (rates, occupancy, _) = synthetic_catalog(3);
        let elsewhere = DistanceIndex::from_points(vec![StreetPoint::new(
            "UNRELATED ST",
            LatLon(47.6, -122.3),
        )]);
        let engine = RecommendationEngine::new(&rates, &occupancy, &elsewhere);
        assert!(matches!(
            engine.recommend(&LatLon(47.6062, -122.3321), &monday_0832(), &Weights::default()),
            Err(RecommendError::EmptyJoin)
        ));
    }

    #[test]
    fn test_single_street_is_degenerate() {
        let (rates, occupancy, distances) = synthetic_catalog(1);
        let engine = RecommendationEngine::new(&rates, &occupancy, &distances);
        assert!(matches!(
            engine.recommend(&LatLon(47.6062, -122.3321), &monday_0832(), &Weights::default()),
            Err(RecommendError::DegenerateScores { streets: 1, .. })
        ));
    }

    #[test]
    fn test_destination_on_street_point_stays_finite() {
        let (rates, occupancy, distances) = synthetic_catalog(30);
        let engine = RecommendationEngine::new(&rates, &occupancy, &distances);
        let on_street = distances.location(&street_name(4)).unwrap();
        let rows = engine
            .recommend(&on_street, &monday_0832(), &Weights::default())
            .unwrap();
        assert!(rows.iter().all(|r| r.score.is_finite()));
        let row = rows.iter().find(|r| r.street == street_name(4)).unwrap();
        assert_eq!(row.distance, 0.0);
        assert_eq!(row.normalized.distance, 0.0);
    }

    #[test]
    fn test_invalid_weights() {
        let (rates, occupancy, distances) = synthetic_catalog(3);
        let engine = RecommendationEngine::new(&rates, &occupancy, &distances);
        assert!(matches!(
            engine.recommend(
                &LatLon(47.6062, -122.3321),
                &monday_0832(),
                &Weights::new(f64::NAN, 0.4, 0.3)
            ),
            Err(RecommendError::InvalidWeights(_))
        ));
    }
}
