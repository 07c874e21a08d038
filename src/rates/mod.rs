pub mod error;
pub mod schedule;
pub mod table;
