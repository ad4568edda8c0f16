//! Water-stress classification
//!
//! Every stress threshold used by the platform lives here. Lower bounds are
//! inclusive: a level of exactly 0.70 is high stress, 0.40 is moderate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::StressCategory;

/// Lowest stress level treated as high stress (0.70)
pub const HIGH_STRESS_THRESHOLD: Decimal = Decimal::from_parts(70, 0, 0, false, 2);

/// Lowest stress level treated as moderate stress (0.40)
pub const MODERATE_STRESS_THRESHOLD: Decimal = Decimal::from_parts(40, 0, 0, false, 2);

/// Irrigation priority tier derived from a stress level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriorityTier {
    #[serde(rename = "basse")]
    Low,
    #[serde(rename = "moyenne")]
    Moderate,
    #[serde(rename = "haute")]
    High,
}

impl PriorityTier {
    /// Classify a normalized stress level into a priority tier
    pub fn from_stress(level: Decimal) -> Self {
        if level >= HIGH_STRESS_THRESHOLD {
            PriorityTier::High
        } else if level >= MODERATE_STRESS_THRESHOLD {
            PriorityTier::Moderate
        } else {
            PriorityTier::Low
        }
    }

    /// Priority label expected by the AI recommendation service
    pub fn ai_rule_priority(&self) -> &'static str {
        match self {
            PriorityTier::High => "ELEVEE",
            PriorityTier::Moderate => "NORMALE",
            PriorityTier::Low => "BASSE",
        }
    }

    /// Hydric constraint label expected by the AI recommendation service
    pub fn hydric_constraint(&self) -> &'static str {
        match self {
            PriorityTier::High => "severe",
            PriorityTier::Moderate => "modere",
            PriorityTier::Low => "faible",
        }
    }
}

impl StressCategory {
    /// Category matching a stress level, using the same thresholds as
    /// [`PriorityTier::from_stress`]
    pub fn from_level(level: Decimal) -> Self {
        match PriorityTier::from_stress(level) {
            PriorityTier::High => StressCategory::Critical,
            PriorityTier::Moderate => StressCategory::Moderate,
            PriorityTier::Low => StressCategory::Ok,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_threshold_constants() {
        assert_eq!(HIGH_STRESS_THRESHOLD, dec("0.70"));
        assert_eq!(MODERATE_STRESS_THRESHOLD, dec("0.40"));
    }

    #[test]
    fn test_high_boundary() {
        assert_eq!(PriorityTier::from_stress(dec("0.70")), PriorityTier::High);
        assert_eq!(PriorityTier::from_stress(dec("0.699999")), PriorityTier::Moderate);
    }

    #[test]
    fn test_moderate_boundary() {
        assert_eq!(PriorityTier::from_stress(dec("0.40")), PriorityTier::Moderate);
        assert_eq!(PriorityTier::from_stress(dec("0.399999")), PriorityTier::Low);
    }

    #[test]
    fn test_category_follows_tier() {
        assert_eq!(StressCategory::from_level(dec("0.15")), StressCategory::Ok);
        assert_eq!(StressCategory::from_level(dec("0.48")), StressCategory::Moderate);
        assert_eq!(StressCategory::from_level(dec("0.82")), StressCategory::Critical);
    }

    #[test]
    fn test_ai_labels() {
        assert_eq!(PriorityTier::High.ai_rule_priority(), "ELEVEE");
        assert_eq!(PriorityTier::Low.hydric_constraint(), "faible");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The tier never decreases as stress increases
            #[test]
            fn tier_is_monotonic(a in 0u32..=1_000_000, b in 0u32..=1_000_000) {
                let (low, high) = if a <= b { (a, b) } else { (b, a) };
                let low = Decimal::new(low as i64, 6);
                let high = Decimal::new(high as i64, 6);
                prop_assert!(PriorityTier::from_stress(low) <= PriorityTier::from_stress(high));
            }

            /// Category and tier always agree
            #[test]
            fn category_matches_thresholds(micros in 0u32..=1_000_000) {
                let level = Decimal::new(micros as i64, 6);
                let expected = if level >= dec("0.7") {
                    StressCategory::Critical
                } else if level >= dec("0.4") {
                    StressCategory::Moderate
                } else {
                    StressCategory::Ok
                };
                prop_assert_eq!(StressCategory::from_level(level), expected);
            }
        }
    }
}
