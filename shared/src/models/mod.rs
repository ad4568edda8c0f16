//! Domain models for the parcel monitoring dashboard

pub mod alert;
pub mod enrichment;
pub mod parcel;
pub mod recommendation;
pub mod stats;
pub mod upstream;
pub mod water_status;

pub use alert::*;
pub use enrichment::*;
pub use parcel::*;
pub use recommendation::*;
pub use stats::*;
pub use upstream::*;
pub use water_status::*;

use thiserror::Error;

/// Errors raised while mapping stored values onto domain models
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}
