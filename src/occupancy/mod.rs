pub mod curve;
pub mod error;
pub mod model;
pub mod spline;
