//! Human readable summary of a street's rate rules, shown in street detail views.

use crate::rates::schedule::{RateSegment, StreetRates};
use crate::types::weekday_class::WeekdayClass;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One paid segment, labelled on a 12-hour clock (e.g. "8 AM-11 AM").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTableEntry {
    pub label: String,
    pub rate: f64,
}

impl From<&RateSegment> for RateTableEntry {
    fn from(segment: &RateSegment) -> Self {
        Self {
            label: format!(
                "{}-{}",
                twelve_hour_label(segment.start),
                twelve_hour_label(segment.end)
            ),
            rate: segment.rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTableRow {
    pub class: WeekdayClass,
    pub entries: Vec<RateTableEntry>,
}

/// Rate rules of a street, one row per weekday class that has rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub rows: Vec<RateTableRow>,
}

impl RateTable {
    pub fn from_rates(rates: &StreetRates) -> Self {
        let rows = [WeekdayClass::Weekday, WeekdayClass::Saturday]
            .into_iter()
            .filter_map(|class| {
                rates.day(class).map(|day| RateTableRow {
                    class,
                    entries: day.segments().iter().map(RateTableEntry::from).collect(),
                })
            })
            .collect();
        Self { rows }
    }

    pub fn row(&self, class: WeekdayClass) -> Option<&RateTableRow> {
        self.rows.iter().find(|row| row.class == class)
    }
}

impl fmt::Display for RateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            write!(f, "{}:", row.class)?;
            if row.entries.is_empty() {
                write!(f, " free")?;
            }
            for entry in &row.entries {
                write!(f, " {} ${:.2}", entry.label, entry.rate)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Formats an hour of the day (0-24) on a 12-hour clock.
pub fn twelve_hour_label(hour: u32) -> String {
    match hour % 24 {
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h < 12 => format!("{} AM", h),
        h => format!("{} PM", h - 12),
    }
}
