//! Shared types and models for the parcel monitoring dashboard
//!
//! This crate contains the domain records, GeoJSON types, upstream response
//! schemas and stress classification shared by the backend and its clients.

pub mod classification;
pub mod models;
pub mod types;

pub use classification::*;
pub use models::*;
pub use types::*;
