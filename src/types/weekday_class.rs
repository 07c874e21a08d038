//! Defines the calendar class that selects which rate rules apply on a given day.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The rate calendar a day falls under.
///
/// Saturdays and regular weekdays each carry their own rule set; Sundays are
/// free everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekdayClass {
    /// Monday through Friday.
    Weekday,
    /// Saturday, with its own (usually shorter) paid hours.
    Saturday,
    /// Sunday. Parking is free by policy.
    Sunday,
}

impl WeekdayClass {
    /// Classifies a chrono [`Weekday`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Weekday;
    /// use parking_advisor::WeekdayClass;
    ///
    /// assert_eq!(WeekdayClass::from_weekday(Weekday::Sun), WeekdayClass::Sunday);
    /// assert_eq!(WeekdayClass::from_weekday(Weekday::Sat), WeekdayClass::Saturday);
    /// assert_eq!(WeekdayClass::from_weekday(Weekday::Wed), WeekdayClass::Weekday);
    /// ```
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => WeekdayClass::Sunday,
            Weekday::Sat => WeekdayClass::Saturday,
            _ => WeekdayClass::Weekday,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_weekday(date.weekday())
    }
}

impl fmt::Display for WeekdayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WeekdayClass::Weekday => "WKD",
            WeekdayClass::Saturday => "SAT",
            WeekdayClass::Sunday => "SUN",
        };
        write!(f, "{}", label)
    }
}
