//! Property tests for the algebraic laws every range operation upholds.

use proptest::prelude::*;

use range_algebra::{Inclusivity, Range};

fn inclusivity() -> impl Strategy<Value = Inclusivity> {
    prop_oneof![
        Just(Inclusivity::Neither),
        Just(Inclusivity::LowerOnly),
        Just(Inclusivity::UpperOnly),
        Just(Inclusivity::Both),
    ]
}

fn simple_range() -> impl Strategy<Value = Range<i32>> {
    prop_oneof![
        Just(Range::empty()),
        Just(Range::infinite()),
        Just(Range::null_element()),
        (-40..40i32).prop_map(Range::singleton),
        ((-40..40i32), (1..20i32), inclusivity())
            .prop_map(|(lower, width, inclusivity)| Range::interval(
                lower,
                lower + width,
                inclusivity
            )),
        ((-40..40i32), inclusivity()).prop_map(|(lower, inclusivity)| Range::floor(
            lower,
            inclusivity
        )),
        ((-40..40i32), inclusivity()).prop_map(|(upper, inclusivity)| Range::ceiling(
            upper,
            inclusivity
        )),
    ]
}

/// Folding unions of simple ranges also yields multi-interval ranges.
fn any_range() -> impl Strategy<Value = Range<i32>> {
    proptest::collection::vec(simple_range(), 1..4).prop_map(|parts| {
        parts
            .iter()
            .fold(Range::empty(), |accumulator, part| accumulator.union(part))
    })
}

fn probe() -> impl Strategy<Value = i32> {
    -70..70i32
}

proptest! {
    #[test]
    fn union_contains_either(a in any_range(), b in any_range(), x in probe()) {
        prop_assert_eq!(
            a.union(&b).contains(&x),
            a.contains(&x) || b.contains(&x)
        );
    }

    #[test]
    fn union_commutes_as_sets(a in any_range(), b in any_range(), x in probe()) {
        prop_assert_eq!(a.union(&b).contains(&x), b.union(&a).contains(&x));
    }

    #[test]
    fn intersection_contains_both(a in any_range(), b in any_range(), x in probe()) {
        prop_assert_eq!(
            a.intersect(&b).contains(&x),
            a.contains(&x) && b.contains(&x)
        );
    }

    #[test]
    fn intersection_commutes_as_sets(a in any_range(), b in any_range(), x in probe()) {
        prop_assert_eq!(a.intersect(&b).contains(&x), b.intersect(&a).contains(&x));
    }

    #[test]
    fn subtraction_is_complement(a in any_range(), b in any_range(), x in probe()) {
        prop_assert_eq!(
            a.subtract(&b).contains(&x),
            a.contains(&x) && !b.contains(&x)
        );
    }

    #[test]
    fn empty_is_union_identity(a in any_range()) {
        prop_assert_eq!(&a.union(&Range::empty()), &a);
        prop_assert_eq!(&Range::empty().union(&a), &a);
    }

    #[test]
    fn empty_absorbs_intersection(a in any_range()) {
        prop_assert_eq!(a.intersect(&Range::empty()), Range::empty());
        prop_assert_eq!(Range::empty().intersect(&a), Range::empty());
    }

    #[test]
    fn empty_and_subtraction(a in any_range()) {
        prop_assert_eq!(&a.subtract(&Range::empty()), &a);
        prop_assert_eq!(Range::empty().subtract(&a), Range::empty());
    }

    #[test]
    fn infinite_absorbs_union(a in any_range(), x in probe()) {
        // Membership-level absorption: the union covers every ordered value.
        prop_assert!(a.union(&Range::infinite()).contains(&x));
        prop_assert!(Range::infinite().union(&a).contains(&x));
    }

    #[test]
    fn operations_are_idempotent(a in any_range()) {
        prop_assert_eq!(&a.union(&a), &a);
        prop_assert_eq!(&a.intersect(&a), &a);
        prop_assert_eq!(a.subtract(&a), Range::empty());
    }

    #[test]
    fn containment_implies_membership_subset(
        a in any_range(),
        b in any_range(),
        x in probe()
    ) {
        if a.contains_range(&b) && b.contains(&x) {
            prop_assert!(a.contains(&x));
        }
    }

    #[test]
    fn intersection_agrees_with_containment(a in any_range(), b in any_range()) {
        if a.contains_range(&b) {
            prop_assert_eq!(a.intersect(&b), b);
        }
    }
}
