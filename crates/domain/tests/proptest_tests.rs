//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use std::time::Duration;

use domain::value_objects::{QuestionText, RateLimitPolicy, SubjectId, sanitize_text};
use domain::{DeckType, UserAccount};
use proptest::prelude::*;

// ============================================================================
// SubjectId Property Tests
// ============================================================================

mod subject_id_tests {
    use super::*;

    proptest! {
        #[test]
        fn in_range_ids_are_accepted(id in SubjectId::MIN..=SubjectId::MAX) {
            let subject = SubjectId::new(id);
            prop_assert!(subject.is_ok());
            prop_assert_eq!(subject.unwrap().value(), id);
        }

        #[test]
        fn out_of_range_ids_are_rejected(id in (SubjectId::MAX + 1)..=u64::MAX) {
            prop_assert!(SubjectId::new(id).is_err());
        }

        #[test]
        fn string_form_parses_back(id in SubjectId::MIN..=SubjectId::MAX) {
            let subject = SubjectId::new(id).unwrap();
            let parsed: SubjectId = subject.to_string().parse().unwrap();
            prop_assert_eq!(parsed, subject);
        }

        #[test]
        fn negative_signed_ids_are_rejected(id in i64::MIN..=0i64) {
            prop_assert!(SubjectId::from_signed(id).is_err());
        }
    }
}

// ============================================================================
// RateLimitPolicy Property Tests
// ============================================================================

mod rate_limit_policy_tests {
    use super::*;

    proptest! {
        #[test]
        fn positive_parameters_build_a_policy(
            max in 1u32..10_000,
            window in 1u64..86_400,
            block in 1u64..86_400
        ) {
            let policy = RateLimitPolicy::new(
                max,
                Duration::from_secs(window),
                Duration::from_secs(block),
            ).unwrap();
            prop_assert_eq!(policy.max_requests(), max);
            prop_assert_eq!(policy.block_covers_window(), block >= window);
        }

        #[test]
        fn zero_max_is_rejected(window in 1u64..86_400) {
            let result = RateLimitPolicy::new(
                0,
                Duration::from_secs(window),
                Duration::from_secs(window),
            );
            prop_assert!(result.is_err());
        }
    }
}

// ============================================================================
// QuestionText Property Tests
// ============================================================================

mod question_text_tests {
    use super::*;

    proptest! {
        #[test]
        fn accepted_questions_are_trimmed_and_bounded(raw in "[a-zA-Z0-9 ?.,!]{1,1200}") {
            if let Ok(q) = QuestionText::parse(&raw) {
                prop_assert!(q.as_str().chars().count() <= QuestionText::MAX_CHARS);
                prop_assert_eq!(q.as_str(), q.as_str().trim());
                prop_assert!(!q.as_str().is_empty());
            }
        }

        #[test]
        fn over_length_is_always_rejected(extra in 1usize..200) {
            let raw = "q".repeat(QuestionText::MAX_CHARS + extra);
            prop_assert!(QuestionText::parse(&raw).is_err());
        }

        #[test]
        fn sanitize_never_leaves_disallowed_controls(raw in "\\PC{0,50}[\\x00-\\x08\\x0B\\x0C\\x0E-\\x1F\\x7F]{1,5}\\PC{0,50}") {
            let cleaned = sanitize_text(&raw);
            prop_assert!(cleaned
                .chars()
                .all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r')));
        }

        #[test]
        fn script_tag_anywhere_is_rejected(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
            let raw = format!("{prefix}<ScRiPt>{suffix}");
            prop_assert!(QuestionText::parse(&raw).is_err());
        }
    }
}

// ============================================================================
// UserAccount Property Tests
// ============================================================================

mod user_account_tests {
    use super::*;

    proptest! {
        #[test]
        fn debits_never_underflow(start in 0u32..50, debits in 0usize..100) {
            let mut account = UserAccount::new(SubjectId::new(1).unwrap(), start);
            let mut successful = 0u32;
            for _ in 0..debits {
                if account.debit() {
                    successful += 1;
                }
            }
            prop_assert_eq!(successful, start.min(u32::try_from(debits).unwrap()));
            prop_assert_eq!(account.balance(), start - successful);
        }
    }
}

#[test]
fn deck_sizes_are_fixed() {
    assert_eq!(DeckType::RiderWaite.cards().len(), 78);
    assert_eq!(DeckType::Lenormand.cards().len(), 36);
}
