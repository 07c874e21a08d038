pub mod curve_cache;
pub mod error;
pub mod features;
pub mod station_catalog;
pub mod street_catalog;
pub mod tables;
