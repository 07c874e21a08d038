//! Map layers the presentation side can request, and the tables they produce.

use crate::types::location::LatLon;
use crate::types::weights::Weights;
use chrono::NaiveDateTime;
use polars::prelude::{col, lit, DataFrame, Expr, IntoLazy, LazyFrame, PolarsError, PolarsResult};
use polars::df;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Name of the street key column in every layer frame.
pub const STREET_COLUMN: &str = "UNITDESC";

/// Which per-street value a map layer colors streets by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerMode {
    Rate,
    Occupancy,
    Recommendation,
}

impl LayerMode {
    /// Column holding the layer's value.
    pub fn property(&self) -> &'static str {
        match self {
            LayerMode::Rate => "RATE",
            LayerMode::Occupancy => "OCCUPANCY",
            LayerMode::Recommendation => "RECOMM",
        }
    }

    /// Maps the numeric layer codes used by the map front end: 1 rate, 2 occupancy,
    /// 3 recommendation.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking_advisor::LayerMode;
    ///
    /// assert_eq!(LayerMode::from_code(2), Some(LayerMode::Occupancy));
    /// assert_eq!(LayerMode::from_code(3).map(|m| m.property()), Some("RECOMM"));
    /// assert_eq!(LayerMode::from_code(4), None);
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(LayerMode::Rate),
            2 => Some(LayerMode::Occupancy),
            3 => Some(LayerMode::Recommendation),
            _ => None,
        }
    }
}

impl fmt::Display for LayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property())
    }
}

/// A request for one map layer, carrying the inputs its computation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerQuery {
    /// Hourly rate of every street at `time`.
    Rate { time: NaiveDateTime },
    /// Predicted occupancy of every street at `time`.
    Occupancy { time: NaiveDateTime },
    /// Recommendation score of every street for a trip to `destination` at `time`.
    Recommendation {
        destination: LatLon,
        time: NaiveDateTime,
        weights: Weights,
    },
}

impl LayerQuery {
    pub fn mode(&self) -> LayerMode {
        match self {
            LayerQuery::Rate { .. } => LayerMode::Rate,
            LayerQuery::Occupancy { .. } => LayerMode::Occupancy,
            LayerQuery::Recommendation { .. } => LayerMode::Recommendation,
        }
    }

    pub fn time(&self) -> NaiveDateTime {
        match self {
            LayerQuery::Rate { time }
            | LayerQuery::Occupancy { time }
            | LayerQuery::Recommendation { time, .. } => *time,
        }
    }
}

/// A two column table, `UNITDESC` and the layer's property column, sorted by street.
///
/// The presentation layer joins it with street geometry on `UNITDESC`.
#[derive(Debug, Clone)]
pub struct LayerFrame {
    pub mode: LayerMode,
    pub frame: DataFrame,
}

impl LayerFrame {
    pub fn from_values(
        mode: LayerMode,
        values: impl IntoIterator<Item = (String, f64)>,
    ) -> PolarsResult<Self> {
        let mut rows: Vec<(String, f64)> = values.into_iter().collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        let (streets, values): (Vec<String>, Vec<f64>) = rows.into_iter().unzip();
        let frame = df!(
            STREET_COLUMN => streets,
            mode.property() => values,
        )?;
        Ok(Self { mode, frame })
    }

    pub fn from_map(mode: LayerMode, values: HashMap<String, f64>) -> PolarsResult<Self> {
        Self::from_values(mode, values)
    }

    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Keeps the rows matching `predicate`, e.g. `col("RATE").gt(lit(2.0))`.
    pub fn filter(&self, predicate: Expr) -> PolarsResult<LayerFrame> {
        Ok(LayerFrame {
            mode: self.mode,
            frame: self.lazy().filter(predicate).collect()?,
        })
    }

    /// The layer value of one street, if the street is in the frame.
    pub fn value(&self, street: &str) -> Result<Option<f64>, PolarsError> {
        let matched = self
            .lazy()
            .filter(col(STREET_COLUMN).eq(lit(street)))
            .select([col(self.mode.property())])
            .collect()?;
        if matched.height() == 0 {
            return Ok(None);
        }
        let column = matched.column(self.mode.property())?;
        Ok(column.f64()?.get(0))
    }
}
