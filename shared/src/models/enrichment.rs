//! Parcel views assembled for the dashboard

use serde::Serialize;

use super::{DiseaseAlert, IrrigationRecommendation, Parcel, UpstreamData, UpstreamHighlights};

/// Upstream data merged onto a parcel
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Enrichment {
    pub upstream_data: UpstreamData,
    #[serde(flatten)]
    pub highlights: UpstreamHighlights,
}

/// A parcel, optionally augmented with upstream data.
///
/// `enrichment` is `None` when enrichment was skipped or failed; the parcel
/// then serializes exactly as the base record.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnrichedParcel {
    #[serde(flatten)]
    pub parcel: Parcel,
    #[serde(flatten)]
    pub enrichment: Option<Enrichment>,
}

impl EnrichedParcel {
    pub fn is_enriched(&self) -> bool {
        self.enrichment.is_some()
    }
}

/// Full detail of one parcel
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParcelDetail {
    #[serde(flatten)]
    pub parcel: Parcel,
    #[serde(rename = "alertes")]
    pub alerts: Vec<DiseaseAlert>,
    /// Unapplied recommendations in display order
    #[serde(rename = "recommandations")]
    pub recommendations: Vec<IrrigationRecommendation>,
    #[serde(flatten)]
    pub enrichment: Option<Enrichment>,
}
