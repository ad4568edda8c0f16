//! Irrigation recommendation models

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use super::{ModelError, ParcelRef};

/// An irrigation action proposed for a parcel.
///
/// Created externally as pending (`applied == false`). The only transition is
/// pending to applied, and applied is terminal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrrigationRecommendation {
    pub id: i32,
    #[serde(rename = "parcelle_id")]
    pub parcel_id: i32,
    pub volume_mm: Decimal,
    #[serde(rename = "duree_minutes")]
    pub duration_minutes: i32,
    #[serde(rename = "heure_optimale")]
    pub optimal_time: Option<NaiveTime>,
    #[serde(rename = "priorite")]
    pub priority: RecommendationPriority,
    #[serde(rename = "date_recommandation")]
    pub recommended_at: DateTime<Utc>,
    #[serde(rename = "appliquee")]
    pub applied: bool,
    #[serde(rename = "date_application")]
    pub applied_at: Option<DateTime<Utc>>,
}

impl IrrigationRecommendation {
    /// Apply the recommendation. Applying twice keeps the first timestamp.
    pub fn apply(&mut self, at: DateTime<Utc>) {
        if !self.applied {
            self.applied = true;
            self.applied_at = Some(at);
        }
    }
}

/// Urgency of a recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RecommendationPriority {
    #[serde(rename = "BASSE")]
    Low,
    #[serde(rename = "NORMALE")]
    Normal,
    #[serde(rename = "HAUTE")]
    High,
    #[serde(rename = "URGENTE")]
    Urgent,
}

impl RecommendationPriority {
    /// Display rank, 1 being the most urgent
    pub fn rank(&self) -> u8 {
        match self {
            RecommendationPriority::Urgent => 1,
            RecommendationPriority::High => 2,
            RecommendationPriority::Normal => 3,
            RecommendationPriority::Low => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationPriority::Low => "BASSE",
            RecommendationPriority::Normal => "NORMALE",
            RecommendationPriority::High => "HAUTE",
            RecommendationPriority::Urgent => "URGENTE",
        }
    }
}

impl FromStr for RecommendationPriority {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BASSE" => Ok(RecommendationPriority::Low),
            "NORMALE" => Ok(RecommendationPriority::Normal),
            "HAUTE" => Ok(RecommendationPriority::High),
            "URGENTE" => Ok(RecommendationPriority::Urgent),
            other => Err(ModelError::UnknownValue {
                kind: "recommendation priority",
                value: other.to_string(),
            }),
        }
    }
}

/// Display order: priority rank first, then most recent first
pub fn display_order(a: &IrrigationRecommendation, b: &IrrigationRecommendation) -> Ordering {
    a.priority
        .rank()
        .cmp(&b.priority.rank())
        .then_with(|| b.recommended_at.cmp(&a.recommended_at))
}

/// Sort recommendations in display order
pub fn sort_for_display(recommendations: &mut [IrrigationRecommendation]) {
    recommendations.sort_by(display_order);
}

/// Pending recommendation with its parcel, for the global listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationListing {
    #[serde(flatten)]
    pub recommendation: IrrigationRecommendation,
    #[serde(rename = "parcelle")]
    pub parcel: ParcelRef,
}
