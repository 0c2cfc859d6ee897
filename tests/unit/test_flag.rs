//! Unit tests for flags and the counter
//!
//! Tests cover:
//! - leaf allocation and disjointness
//! - composite flags (join, concat, exclude)
//! - wildcard flags
//! - equality by bits, not by name

use errflags::{intersect, Bitset, Counter, Flag};

// ============================================================================
// Counter Tests
// ============================================================================

mod counter_tests {
    use super::*;

    #[test]
    fn test_fresh_counter_starts_at_zero() {
        let mut counter = Counter::new();
        assert_eq!(counter.next_position(), 0);
        let first = counter.allocate("First");
        assert!(first.bits().contains(0));
        assert_eq!(counter.next_position(), 1);
    }

    #[test]
    fn test_allocations_are_pairwise_disjoint() {
        let mut counter = Counter::new();
        let flags: Vec<Flag> = (0..100).map(|i| counter.allocate(format!("F{i}"))).collect();
        for (i, a) in flags.iter().enumerate() {
            for b in &flags[i + 1..] {
                assert!(!intersect(a, b), "{a:?} and {b:?} overlap");
            }
        }
    }

    #[test]
    fn test_starting_at_skips_reserved_bits() {
        let mut counter = Counter::starting_at(64);
        let flag = counter.allocate("High");
        assert!(flag.bits().contains(64));
        assert_eq!(flag.bits().count_ones(), 1);
    }

    #[test]
    fn test_separate_counters_collide() {
        let a = Counter::new().allocate("A");
        let b = Counter::new().allocate("B");
        assert!(intersect(&a, &b));
    }

    #[test]
    fn test_allocated_wildcard_covers_everything_so_far() {
        let mut counter = Counter::new();
        let a = counter.allocate("A");
        let b = counter.allocate("B");
        let any = counter.allocated("Any");
        let later = counter.allocate("Later");

        assert!(intersect(&any, &a));
        assert!(intersect(&any, &b));
        assert!(!intersect(&any, &later));
    }
}

// ============================================================================
// Composite Flag Tests
// ============================================================================

mod composite_tests {
    use super::*;

    fn three() -> (Flag, Flag, Flag) {
        let mut counter = Counter::new();
        (
            counter.allocate("BadInput"),
            counter.allocate("NotAuthorized"),
            counter.allocate("InternalError"),
        )
    }

    #[test]
    fn test_join_matches_each_member() {
        let (bad_input, not_authorized, internal) = three();
        let user = Flag::join("UserError", [&bad_input, &not_authorized]);

        assert_eq!(user.name(), "UserError");
        assert!(intersect(&user, &bad_input));
        assert!(intersect(&user, &not_authorized));
        assert!(!intersect(&user, &internal));
    }

    #[test]
    fn test_join_of_nothing_matches_nothing() {
        let (bad_input, _, _) = three();
        let empty = Flag::join("Nothing", Vec::<&Flag>::new());
        assert!(empty.is_empty());
        assert!(!intersect(&empty, &bad_input));
        assert!(!intersect(&empty, &empty));
    }

    #[test]
    fn test_concat_names_parts() {
        let (bad_input, not_authorized, _) = three();
        let both = Flag::concat([&bad_input, &not_authorized]);
        assert_eq!(both.name(), "BadInput|NotAuthorized");
        assert_eq!(both, Flag::join("Other", [&bad_input, &not_authorized]));
    }

    #[test]
    fn test_exclude_removes_bits_keeps_name() {
        let (bad_input, not_authorized, internal) = three();
        let all = Flag::join("All", [&bad_input, &not_authorized, &internal]);
        let not_internal = all.exclude([&internal]);

        assert_eq!(not_internal.name(), "All");
        assert!(intersect(&not_internal, &bad_input));
        assert!(!intersect(&not_internal, &internal));
    }

    #[test]
    fn test_wildcard_minus_leaf() {
        let (bad_input, not_authorized, internal) = three();
        let any_but_internal = Flag::full("AnyButInternal", 3).exclude([&internal]);

        assert!(intersect(&any_but_internal, &bad_input));
        assert!(intersect(&any_but_internal, &not_authorized));
        assert!(!intersect(&any_but_internal, &internal));
    }

    #[test]
    fn test_equality_ignores_name() {
        let (bad_input, _, _) = three();
        assert_eq!(bad_input, bad_input.renamed("Renamed"));
        assert_eq!(bad_input.renamed("Renamed").name(), "Renamed");
    }

    #[test]
    fn test_from_bits() {
        let flag = Flag::from_bits("Pair", Bitset::single(1).with_bit(5));
        assert_eq!(flag.bits().ones().collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(format!("{}", flag), "Pair");
    }
}
