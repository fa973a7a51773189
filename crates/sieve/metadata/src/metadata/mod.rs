//! Metadata information regarding the database and tracked entities.

pub mod database;

pub use database::*;
