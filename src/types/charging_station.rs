//! Electric vehicle charging stations shown next to the parking layers, with the
//! implementations needed to index them in an `rstar` R-tree.

use crate::types::location::LatLon;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// Charging levels a station offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargingLevels {
    /// 120 V AC charging.
    pub level1: bool,
    /// 240 V AC charging.
    pub level2: bool,
    /// DC fast charging.
    pub dc_fast: bool,
}

/// Connector types a station offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorTypes {
    pub nema520: bool,
    pub j1772: bool,
    pub j1772combo: bool,
    pub chademo: bool,
    pub tesla: bool,
}

impl ConnectorTypes {
    /// Reads connector flags from a space separated list such as `"J1772 CHADEMO"`.
    ///
    /// Tokens are matched whole and case-insensitively, so `J1772COMBO` does not
    /// also set `j1772`. Unknown tokens are ignored.
    ///
    /// The source export derives its own flags by substring search, where `J1772COMBO`
    /// sets `J1772` as well. Flags read from the connector properties therefore take
    /// precedence over this text.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking_advisor::ConnectorTypes;
    ///
    /// let connectors = ConnectorTypes::from_description("J1772COMBO CHADEMO");
    /// assert!(connectors.j1772combo && connectors.chademo);
    /// assert!(!connectors.j1772);
    /// ```
    pub fn from_description(description: &str) -> Self {
        let mut connectors = Self::default();
        for token in description.split_whitespace() {
            match token.to_ascii_uppercase().as_str() {
                "NEMA520" => connectors.nema520 = true,
                "J1772" => connectors.j1772 = true,
                "J1772COMBO" => connectors.j1772combo = true,
                "CHADEMO" => connectors.chademo = true,
                "TESLA" => connectors.tesla = true,
                _ => {}
            }
        }
        connectors
    }
}

/// A single charging station and its static attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    pub name: String,
    pub address: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub location: LatLon,
    pub levels: ChargingLevels,
    pub connectors: ConnectorTypes,
}

impl RTreeObject for ChargingStation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.latitude(), self.location.longitude()])
    }
}

impl PointDistance for ChargingStation {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d_lat = self.location.latitude() - point[0];
        let d_lon = self.location.longitude() - point[1];
        d_lat * d_lat + d_lon * d_lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_description() {
        let connectors = ConnectorTypes::from_description("  nema520 J1772   TESLA OTHER ");
        assert_eq!(
            connectors,
            ConnectorTypes {
                nema520: true,
                j1772: true,
                j1772combo: false,
                chademo: false,
                tesla: true,
            }
        );
        assert_eq!(ConnectorTypes::from_description(""), ConnectorTypes::default());
    }

    #[test]
    fn test_combo_token_does_not_imply_plain_j1772() {
        let connectors = ConnectorTypes::from_description("j1772combo");
        assert!(connectors.j1772combo);
        assert!(!connectors.j1772);
    }
}
