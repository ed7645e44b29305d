//! Infrastructure layer: persistence and external service adapters

pub mod adapters;
pub mod database;
