//! Time-of-day parking rate rules and their evaluation.
//!
//! A day's rules are a short, chronologically ordered list of paid segments. Evaluation
//! turns the segments into sorted boundary hours and assigns a query hour to the section
//! whose index equals the number of boundaries at or before that hour. Section 0 (before
//! the first boundary) and any gap between segments are free.

use crate::rates::error::{RateScheduleError, ScheduleViolation};
use crate::types::weekday_class::WeekdayClass;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A paid interval `[start, end)` in whole hours of the day, with its hourly rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSegment {
    pub start: u32,
    pub end: u32,
    pub rate: f64,
}

impl RateSegment {
    pub fn new(start: u32, end: u32, rate: f64) -> Self {
        Self { start, end, rate }
    }

    /// Builds a segment from nullable table cells.
    ///
    /// A segment with neither start nor end is absent (`Ok(None)`). A missing rate on a
    /// present segment is read as free.
    pub(crate) fn from_cells(
        index: usize,
        start: Option<f64>,
        end: Option<f64>,
        rate: Option<f64>,
    ) -> Result<Option<Self>, ScheduleViolation> {
        match (start, end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => Ok(Some(Self::new(
                whole_hour(start)?,
                whole_hour(end)?,
                rate.unwrap_or(0.0),
            ))),
            _ => Err(ScheduleViolation::IncompleteSegment { index }),
        }
    }
}

fn whole_hour(value: f64) -> Result<u32, ScheduleViolation> {
    if !value.is_finite() || value < 0.0 || value > 24.0 || value.fract() != 0.0 {
        // Saturating cast only feeds the error message.
        return Err(ScheduleViolation::HourOutOfRange(value.max(0.0) as u32));
    }
    Ok(value as u32)
}

/// The validated rate rules of one street for one weekday class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    segments: Vec<RateSegment>,
    boundaries: Vec<u32>,
    section_rates: Vec<f64>,
}

impl DaySchedule {
    pub const MAX_SEGMENTS: usize = 3;

    /// A day without paid segments.
    pub fn free() -> Self {
        Self {
            segments: Vec::new(),
            boundaries: Vec::new(),
            section_rates: vec![0.0],
        }
    }

    /// Validates the segments and precomputes the section layout.
    ///
    /// Segments must be in chronological order, non-empty and non-overlapping, within
    /// 0-24, and carry a finite non-negative rate.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking_advisor::{DaySchedule, RateSegment};
    ///
    /// let day = DaySchedule::new(vec![
    ///     RateSegment::new(8, 11, 2.0),
    ///     RateSegment::new(11, 17, 3.0),
    ///     RateSegment::new(17, 20, 2.0),
    /// ])?;
    /// assert_eq!(day.boundaries(), &[8, 11, 17, 20]);
    /// assert_eq!(day.rate_at(7), 0.0);
    /// assert_eq!(day.rate_at(11), 3.0);
    /// assert_eq!(day.rate_at(20), 0.0);
    /// # Ok::<(), parking_advisor::ScheduleViolation>(())
    /// ```
    pub fn new(segments: Vec<RateSegment>) -> Result<Self, ScheduleViolation> {
        if segments.len() > Self::MAX_SEGMENTS {
            return Err(ScheduleViolation::TooManySegments(segments.len()));
        }

        let mut previous_end: Option<u32> = None;
        for segment in &segments {
            if segment.end > 24 {
                return Err(ScheduleViolation::HourOutOfRange(segment.end));
            }
            if segment.start >= segment.end {
                return Err(ScheduleViolation::EmptySegment {
                    start: segment.start,
                    end: segment.end,
                });
            }
            if let Some(previous_end) = previous_end {
                if segment.start < previous_end {
                    return Err(ScheduleViolation::Unordered {
                        previous_end,
                        start: segment.start,
                    });
                }
            }
            if !segment.rate.is_finite() || segment.rate < 0.0 {
                return Err(ScheduleViolation::InvalidRate(segment.rate));
            }
            previous_end = Some(segment.end);
        }

        let mut boundaries = Vec::with_capacity(segments.len() * 2);
        let mut section_rates = vec![0.0];
        for segment in &segments {
            if boundaries.last() == Some(&segment.start) {
                // Contiguous with the previous segment: the section opened by its end is paid.
                if let Some(last) = section_rates.last_mut() {
                    *last = segment.rate;
                }
            } else {
                boundaries.push(segment.start);
                section_rates.push(segment.rate);
            }
            boundaries.push(segment.end);
            section_rates.push(0.0);
        }

        Ok(Self {
            segments,
            boundaries,
            section_rates,
        })
    }

    /// Index of the section `hour` falls in: the number of boundaries `<= hour`.
    ///
    /// An hour equal to a boundary belongs to the section that starts there.
    pub fn section_index(&self, hour: u32) -> usize {
        self.boundaries.iter().filter(|b| **b <= hour).count()
    }

    pub fn rate_at(&self, hour: u32) -> f64 {
        // section_rates always has boundaries.len() + 1 entries.
        self.section_rates[self.section_index(hour)]
    }

    pub fn segments(&self) -> &[RateSegment] {
        &self.segments
    }

    pub fn boundaries(&self) -> &[u32] {
        &self.boundaries
    }

    pub fn is_free(&self) -> bool {
        self.segments.iter().all(|s| s.rate == 0.0)
    }
}

impl Default for DaySchedule {
    fn default() -> Self {
        Self::free()
    }
}

/// All rate rules of one street.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetRates {
    pub weekday: DaySchedule,
    pub saturday: DaySchedule,
    /// Maximum parking duration in minutes, when the street posts one.
    pub time_limit_minutes: Option<f64>,
}

impl StreetRates {
    pub fn new(weekday: DaySchedule, saturday: DaySchedule) -> Self {
        Self {
            weekday,
            saturday,
            time_limit_minutes: None,
        }
    }

    pub fn with_time_limit(mut self, minutes: f64) -> Self {
        self.time_limit_minutes = Some(minutes);
        self
    }

    /// The rules for a weekday class. Sundays have none.
    pub fn day(&self, class: WeekdayClass) -> Option<&DaySchedule> {
        match class {
            WeekdayClass::Weekday => Some(&self.weekday),
            WeekdayClass::Saturday => Some(&self.saturday),
            WeekdayClass::Sunday => None,
        }
    }

    pub fn rate_at(&self, class: WeekdayClass, hour: u32) -> f64 {
        self.day(class).map_or(0.0, |day| day.rate_at(hour))
    }

    pub fn time_limit_hours(&self) -> Option<f64> {
        self.time_limit_minutes.map(|minutes| minutes / 60.0)
    }
}

/// Rate rules of every street in the catalog, indexed by street name.
#[derive(Debug, Clone, Default)]
pub struct RateSchedule {
    streets: HashMap<String, StreetRates>,
    rejected: Vec<String>,
}

impl RateSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_streets(streets: impl IntoIterator<Item = (String, StreetRates)>) -> Self {
        Self {
            streets: streets.into_iter().collect(),
            rejected: Vec::new(),
        }
    }

    pub fn insert(&mut self, street: impl Into<String>, rates: StreetRates) {
        self.streets.insert(street.into(), rates);
    }

    /// Records a street whose rules were rejected at load time.
    pub(crate) fn reject(&mut self, street: impl Into<String>) {
        self.rejected.push(street.into());
    }

    /// Streets excluded at load time because their rules failed validation.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    pub fn get(&self, street: &str) -> Option<&StreetRates> {
        self.streets.get(street)
    }

    pub fn len(&self) -> usize {
        self.streets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streets.is_empty()
    }

    pub fn streets(&self) -> impl Iterator<Item = &str> {
        self.streets.keys().map(String::as_str)
    }

    /// Hourly rate of one street.
    ///
    /// # Errors
    ///
    /// Returns [`RateScheduleError::HourOutOfRange`] for hours past 23 and
    /// [`RateScheduleError::StreetNotFound`] for a street without rules.
    pub fn rate_at(
        &self,
        street: &str,
        class: WeekdayClass,
        hour: u32,
    ) -> Result<f64, RateScheduleError> {
        check_hour(hour)?;
        let rates = self
            .streets
            .get(street)
            .ok_or_else(|| RateScheduleError::StreetNotFound(street.to_string()))?;
        Ok(rates.rate_at(class, hour))
    }

    /// Hourly rate of every street with configured rules.
    ///
    /// Sundays short-circuit to zero for all streets.
    pub fn rate_at_time(
        &self,
        class: WeekdayClass,
        hour: u32,
    ) -> Result<HashMap<String, f64>, RateScheduleError> {
        check_hour(hour)?;
        let rates: HashMap<String, f64> = match class {
            WeekdayClass::Sunday => self.streets.keys().map(|s| (s.clone(), 0.0)).collect(),
            _ => self
                .streets
                .iter()
                .map(|(street, rates)| (street.clone(), rates.rate_at(class, hour)))
                .collect(),
        };
        debug!(
            "Evaluated {} rates for {} at hour {}",
            rates.len(),
            class,
            hour
        );
        Ok(rates)
    }
}

fn check_hour(hour: u32) -> Result<(), RateScheduleError> {
    if hour >= 24 {
        return Err(RateScheduleError::HourOutOfRange(hour));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_day() -> DaySchedule {
        DaySchedule::new(vec![
            RateSegment::new(8, 11, 2.0),
            RateSegment::new(11, 17, 3.0),
            RateSegment::new(17, 20, 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_rate_by_section() {
        let day = reference_day();
        for hour in 0..24 {
            let expected = match hour {
                h if h < 8 => 0.0,
                h if h < 11 => 2.0,
                h if h < 17 => 3.0,
                h if h < 20 => 2.0,
                _ => 0.0,
            };
            assert_eq!(day.rate_at(hour), expected, "hour {}", hour);
        }
    }

    #[test]
    fn test_boundary_hour_belongs_to_new_section() {
        let day = reference_day();
        assert_eq!(day.section_index(10), 1);
        assert_eq!(day.section_index(11), 2);
        assert_eq!(day.rate_at(11), 3.0);
        assert_eq!(day.rate_at(8), 2.0);
    }

    #[test]
    fn test_gap_between_segments_is_free() {
        let day = DaySchedule::new(vec![
            RateSegment::new(8, 11, 2.0),
            RateSegment::new(13, 18, 4.0),
        ])
        .unwrap();
        assert_eq!(day.boundaries(), &[8, 11, 13, 18]);
        assert_eq!(day.rate_at(10), 2.0);
        assert_eq!(day.rate_at(11), 0.0);
        assert_eq!(day.rate_at(12), 0.0);
        assert_eq!(day.rate_at(13), 4.0);
        assert_eq!(day.rate_at(18), 0.0);
    }

    #[test]
    fn test_segment_until_midnight() {
        let day = DaySchedule::new(vec![RateSegment::new(0, 24, 1.5)]).unwrap();
        assert_eq!(day.rate_at(0), 1.5);
        assert_eq!(day.rate_at(23), 1.5);
    }

    #[test]
    fn test_empty_schedule_is_free() {
        let day = DaySchedule::new(vec![]).unwrap();
        assert!(day.is_free());
        for hour in 0..24 {
            assert_eq!(day.rate_at(hour), 0.0);
        }
    }

    #[test]
    fn test_rejects_overlap() {
        let err = DaySchedule::new(vec![
            RateSegment::new(8, 12, 2.0),
            RateSegment::new(11, 17, 3.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ScheduleViolation::Unordered {
                previous_end: 12,
                start: 11
            }
        );
    }

    #[test]
    fn test_rejects_unordered_and_empty() {
        assert!(matches!(
            DaySchedule::new(vec![
                RateSegment::new(17, 20, 2.0),
                RateSegment::new(8, 11, 2.0),
            ]),
            Err(ScheduleViolation::Unordered { .. })
        ));
        assert!(matches!(
            DaySchedule::new(vec![RateSegment::new(9, 9, 2.0)]),
            Err(ScheduleViolation::EmptySegment { start: 9, end: 9 })
        ));
        assert!(matches!(
            DaySchedule::new(vec![RateSegment::new(20, 25, 2.0)]),
            Err(ScheduleViolation::HourOutOfRange(25))
        ));
        assert!(matches!(
            DaySchedule::new(vec![RateSegment::new(8, 9, -1.0)]),
            Err(ScheduleViolation::InvalidRate(_))
        ));
    }

    #[test]
    fn test_rejects_too_many_segments() {
        let segments = (0..4).map(|i| RateSegment::new(i * 2, i * 2 + 1, 1.0)).collect();
        assert_eq!(
            DaySchedule::new(segments).unwrap_err(),
            ScheduleViolation::TooManySegments(4)
        );
    }

    #[test]
    fn test_segment_from_cells() {
        assert_eq!(RateSegment::from_cells(1, None, None, Some(2.0)), Ok(None));
        assert_eq!(
            RateSegment::from_cells(1, Some(8.0), Some(11.0), None),
            Ok(Some(RateSegment::new(8, 11, 0.0)))
        );
        assert_eq!(
            RateSegment::from_cells(2, Some(8.0), None, Some(2.0)),
            Err(ScheduleViolation::IncompleteSegment { index: 2 })
        );
        assert!(RateSegment::from_cells(1, Some(8.5), Some(11.0), None).is_err());
    }

    #[test]
    fn test_sunday_is_free_everywhere() {
        let schedule = RateSchedule::from_streets([(
            "PINE ST".to_string(),
            StreetRates::new(reference_day(), reference_day()),
        )]);
        for hour in 0..24 {
            assert_eq!(
                schedule.rate_at("PINE ST", WeekdayClass::Sunday, hour).unwrap(),
                0.0
            );
        }
        let all = schedule.rate_at_time(WeekdayClass::Sunday, 12).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all["PINE ST"], 0.0);
    }

    #[test]
    fn test_saturday_uses_saturday_rules() {
        let saturday = DaySchedule::new(vec![RateSegment::new(10, 14, 1.0)]).unwrap();
        let schedule = RateSchedule::from_streets([(
            "PINE ST".to_string(),
            StreetRates::new(reference_day(), saturday),
        )]);
        assert_eq!(
            schedule.rate_at("PINE ST", WeekdayClass::Saturday, 12).unwrap(),
            1.0
        );
        assert_eq!(
            schedule.rate_at("PINE ST", WeekdayClass::Weekday, 12).unwrap(),
            3.0
        );
    }

    #[test]
    fn test_lookup_errors() {
        let schedule = RateSchedule::new();
        assert!(matches!(
            schedule.rate_at("NOWHERE", WeekdayClass::Weekday, 9),
            Err(RateScheduleError::StreetNotFound(_))
        ));
        assert!(matches!(
            schedule.rate_at_time(WeekdayClass::Weekday, 24),
            Err(RateScheduleError::HourOutOfRange(24))
        ));
    }

    #[test]
    fn test_time_limit_hours() {
        let rates = StreetRates::new(DaySchedule::free(), DaySchedule::free()).with_time_limit(120.0);
        assert_eq!(rates.time_limit_hours(), Some(2.0));
    }
}
