//! Core types for the Ressourcenplaner.
//!
//! This crate is shared by the proxy server and the terminal client:
//! - `model` holds the list entities (employees, absences, crews, ...)
//! - `protocol` holds the REST request/response bodies
//! - `availability`, `grouping`, `paint` and `summary` hold the aggregation
//!   logic the views are built from

pub mod availability;
pub mod date_range;
pub mod dates;
pub mod error;
pub mod grouping;
pub mod holidays;
pub mod model;
pub mod paint;
pub mod protocol;
pub mod summary;

pub use error::{PlanerError, PlanerResult};
pub use model::*;
