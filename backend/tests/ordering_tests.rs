//! Recommendation ordering and application properties

mod common;

use chrono::Duration;
use proptest::prelude::*;

use common::*;
use shared::{sort_for_display, IrrigationRecommendation, RecommendationPriority};

const PRIORITIES: [RecommendationPriority; 4] = [
    RecommendationPriority::Low,
    RecommendationPriority::Normal,
    RecommendationPriority::High,
    RecommendationPriority::Urgent,
];

fn build(entries: &[(usize, i64)]) -> Vec<IrrigationRecommendation> {
    entries
        .iter()
        .enumerate()
        .map(|(i, (priority, hours))| {
            let mut r = recommendation(i as i32 + 1, 1, PRIORITIES[*priority], 1);
            r.recommended_at += Duration::hours(*hours);
            r
        })
        .collect()
}

// ============================================================================
// Display order
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Sorted recommendations never go from a more urgent rank to a less
    /// urgent one, and within a rank never from older to newer
    #[test]
    fn display_order_is_rank_then_recency(
        entries in prop::collection::vec((0usize..4, 0i64..500), 0..40),
    ) {
        let mut recommendations = build(&entries);
        sort_for_display(&mut recommendations);

        for pair in recommendations.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.priority.rank() <= b.priority.rank());
            if a.priority == b.priority {
                prop_assert!(a.recommended_at >= b.recommended_at);
            }
        }
    }

    /// Sorting keeps every recommendation
    #[test]
    fn display_order_is_a_permutation(
        entries in prop::collection::vec((0usize..4, 0i64..500), 0..40),
    ) {
        let original = build(&entries);
        let mut sorted = original.clone();
        sort_for_display(&mut sorted);

        let mut original_ids: Vec<i32> = original.iter().map(|r| r.id).collect();
        let mut sorted_ids: Vec<i32> = sorted.iter().map(|r| r.id).collect();
        original_ids.sort_unstable();
        sorted_ids.sort_unstable();
        prop_assert_eq!(original_ids, sorted_ids);
    }

    /// However many times a recommendation is applied, the first application
    /// time is kept
    #[test]
    fn apply_keeps_first_timestamp(offsets in prop::collection::vec(0i64..1000, 1..10)) {
        let mut r = recommendation(1, 1, RecommendationPriority::Normal, 1);
        let first = day(2) + Duration::minutes(offsets[0]);

        for offset in &offsets {
            r.apply(day(2) + Duration::minutes(*offset));
        }

        prop_assert!(r.applied);
        prop_assert_eq!(r.applied_at, Some(first));
    }
}
