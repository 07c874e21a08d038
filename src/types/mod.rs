pub mod charging_station;
pub mod data_source;
pub mod layer;
pub mod location;
pub mod recommendation;
pub mod street_details;
pub mod weekday_class;
pub mod weights;
