pub mod index;
pub mod street_point;
