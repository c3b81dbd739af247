//! The range variants and their set algebra.

use std::cmp::Ordering;
use std::fmt;

use crate::inclusivity::Inclusivity;

/// How two ranges relate to one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    /// No shared elements and no mergeable touching bound.
    Disjoint,
    /// The other range overlaps this range around its upper bound.
    UpperOverlap,
    /// This range's bounds enclose the other's (equal outer bounds included).
    Contains,
    /// The other range's bounds enclose this one's.
    ContainedBy,
    /// The other range overlaps this range around its lower bound.
    LowerOverlap,
}

/// An immutable set of values of an ordered type.
///
/// A range is one of a closed family of shapes: empty, a single element, a
/// bounded interval, a half-bounded interval, everything, the null-element
/// singleton, or a disjoint union of intervals. Every operation returns a
/// fresh value; nothing is ever mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Range<T> {
    inner: Inner<T>,
}

#[derive(Debug, Clone, PartialEq)]
enum Inner<T> {
    Empty,
    Infinite,
    Null,
    Single(T),
    Interval {
        min: T,
        max: T,
        inclusivity: Inclusivity,
    },
    Floor {
        min: T,
        inclusivity: Inclusivity,
    },
    Ceiling {
        max: T,
        inclusivity: Inclusivity,
    },
    Multiple(Vec<Range<T>>),
}

impl<T> Range<T> {
    /// The range containing nothing.
    pub fn empty() -> Range<T> {
        Range { inner: Inner::Empty }
    }

    /// The range containing every ordered value.
    pub fn infinite() -> Range<T> {
        Range {
            inner: Inner::Infinite,
        }
    }

    /// The range containing exactly the null element.
    ///
    /// The null element is a sentinel outside the ordered value domain: no
    /// `T` value is ever a member of this range, and no other range (the
    /// infinite range included) contains the sentinel.
    pub fn null_element() -> Range<T> {
        Range { inner: Inner::Null }
    }

    /// The range containing exactly `value`.
    pub fn singleton(value: T) -> Range<T> {
        Range {
            inner: Inner::Single(value),
        }
    }

    /// Determines if this range is the empty range.
    pub fn is_empty(&self) -> bool {
        match self.inner {
            Inner::Empty => true,
            _ => false,
        }
    }

    /// Returns the lower bound if one exists. `None` means unbounded below.
    pub fn lower_bound(&self) -> Option<&T> {
        match &self.inner {
            Inner::Single(value) => Some(value),
            Inner::Interval { min, .. } | Inner::Floor { min, .. } => Some(min),
            Inner::Multiple(fragments) => fragments.first().and_then(Range::lower_bound),
            Inner::Empty | Inner::Infinite | Inner::Null | Inner::Ceiling { .. } => None,
        }
    }

    /// Returns the upper bound if one exists. `None` means unbounded above.
    pub fn upper_bound(&self) -> Option<&T> {
        match &self.inner {
            Inner::Single(value) => Some(value),
            Inner::Interval { max, .. } | Inner::Ceiling { max, .. } => Some(max),
            Inner::Multiple(fragments) => fragments.last().and_then(Range::upper_bound),
            Inner::Empty | Inner::Infinite | Inner::Null | Inner::Floor { .. } => None,
        }
    }

    /// The inclusivity at this range's outer boundaries. A multi-interval
    /// range reports its first fragment's lower side and its last fragment's
    /// upper side.
    pub fn inclusivity(&self) -> Inclusivity {
        match &self.inner {
            Inner::Empty | Inner::Infinite => Inclusivity::Neither,
            Inner::Null | Inner::Single(_) => Inclusivity::Both,
            Inner::Interval { inclusivity, .. }
            | Inner::Floor { inclusivity, .. }
            | Inner::Ceiling { inclusivity, .. } => *inclusivity,
            Inner::Multiple(fragments) => match (fragments.first(), fragments.last()) {
                (Some(first), Some(last)) => {
                    Inclusivity::merge(first.inclusivity(), last.inclusivity())
                }
                _ => Inclusivity::Neither,
            },
        }
    }
}

impl<T> Range<T>
where
    T: PartialOrd,
{
    /// A bounded interval between `min` and `max`. Reversed bounds are
    /// swapped; `min == max` is accepted as given and not collapsed to a
    /// singleton.
    pub fn interval(min: T, max: T, inclusivity: Inclusivity) -> Range<T> {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        Range {
            inner: Inner::Interval {
                min,
                max,
                inclusivity,
            },
        }
    }

    /// A range bounded below and unbounded above. The upper side of
    /// `inclusivity` is ignored: `Both` downgrades to `LowerOnly` and
    /// `UpperOnly` to `Neither`.
    pub fn floor(min: T, inclusivity: Inclusivity) -> Range<T> {
        Range {
            inner: Inner::Floor {
                min,
                inclusivity: Inclusivity::from_sides(inclusivity.includes_lower(), false),
            },
        }
    }

    /// A range bounded above and unbounded below. The lower side of
    /// `inclusivity` is ignored: `Both` downgrades to `UpperOnly` and
    /// `LowerOnly` to `Neither`.
    pub fn ceiling(max: T, inclusivity: Inclusivity) -> Range<T> {
        Range {
            inner: Inner::Ceiling {
                max,
                inclusivity: Inclusivity::from_sides(false, inclusivity.includes_upper()),
            },
        }
    }

    /// Determines if a value lies within this range.
    pub fn contains(&self, item: &T) -> bool {
        match &self.inner {
            Inner::Empty | Inner::Null => false,
            Inner::Infinite => true,
            Inner::Single(value) => item == value,
            Inner::Interval {
                min,
                max,
                inclusivity,
            } => inclusivity.between(Some(min), item, Some(max)),
            Inner::Floor { min, inclusivity } => inclusivity.between(Some(min), item, None),
            Inner::Ceiling { max, inclusivity } => inclusivity.between(None, item, Some(max)),
            Inner::Multiple(fragments) => fragments.iter().any(|fragment| fragment.contains(item)),
        }
    }

    /// Determines if a range lies completely within this range.
    pub fn contains_range(&self, other: &Range<T>) -> bool {
        self.relation(other) == Overlap::Contains
    }

    /// Classifies how this range and `other` overlap.
    fn relation(&self, other: &Range<T>) -> Overlap {
        match (&self.inner, &other.inner) {
            // Every range contains the empty range.
            (_, Inner::Empty) => Overlap::Contains,
            (Inner::Empty, _) => Overlap::ContainedBy,
            // Only the containment verdict is consulted for multi-interval
            // operands: a fragmented range is contained when each of its
            // fragments is, and contains whatever fits inside one fragment
            // (nothing contiguous can straddle the gap between two).
            (_, Inner::Multiple(fragments)) => {
                if fragments
                    .iter()
                    .all(|fragment| self.relation(fragment) == Overlap::Contains)
                {
                    Overlap::Contains
                } else {
                    Overlap::Disjoint
                }
            }
            (Inner::Multiple(fragments), _) => {
                if fragments
                    .iter()
                    .any(|fragment| fragment.relation(other) == Overlap::Contains)
                {
                    Overlap::Contains
                } else {
                    Overlap::Disjoint
                }
            }
            (Inner::Null, Inner::Null) => Overlap::Contains,
            // The null element lies outside the ordered value domain, so the
            // null-element range is disjoint from everything else, the
            // infinite range included.
            (Inner::Null, _) | (_, Inner::Null) => Overlap::Disjoint,
            (Inner::Infinite, _) => Overlap::Contains,
            (_, Inner::Infinite) => Overlap::ContainedBy,
            _ => self.bounded_relation(other),
        }
    }

    /// The four-cornered boundary test shared by every variant with at least
    /// one bound.
    fn bounded_relation(&self, other: &Range<T>) -> Overlap {
        let (smin, smax) = (self.lower_bound(), self.upper_bound());
        let (omin, omax) = (other.lower_bound(), other.upper_bound());

        // An absent bound counts as contained only by an equally unbounded
        // side.
        let other_has_upper = match smax {
            Some(value) => other.contains(value),
            None => omax.is_none(),
        };
        let other_has_lower = match smin {
            Some(value) => other.contains(value),
            None => omin.is_none(),
        };
        let mut this_has_upper = match omax {
            Some(value) => self.contains(value),
            None => smax.is_none(),
        };
        let mut this_has_lower = match omin {
            Some(value) => self.contains(value),
            None => smin.is_none(),
        };

        // A bound shared by both ranges but excluded by both still counts as
        // contained: the ranges touch there rather than overlap.
        if !this_has_upper && bounds_equal(smax, omax) {
            this_has_upper =
                !self.inclusivity().includes_upper() && !other.inclusivity().includes_upper();
        }
        if !this_has_lower && bounds_equal(smin, omin) {
            this_has_lower =
                !self.inclusivity().includes_lower() && !other.inclusivity().includes_lower();
        }

        if this_has_upper && this_has_lower {
            Overlap::Contains
        } else if other_has_upper && other_has_lower {
            Overlap::ContainedBy
        } else if (other_has_upper && !other_has_lower) || this_has_lower {
            Overlap::UpperOverlap
        } else if (other_has_lower && !other_has_upper) || this_has_upper {
            Overlap::LowerOverlap
        } else {
            Overlap::Disjoint
        }
    }

    /// Like `relation`, but also reports a half-bounded range that exactly
    /// touches `other`'s opposite bound as mergeable, provided at least one
    /// side includes the shared value.
    fn mergeability(&self, other: &Range<T>) -> Overlap {
        let overlap = self.relation(other);
        if overlap != Overlap::Disjoint {
            return overlap;
        }
        match &self.inner {
            Inner::Floor { min, inclusivity } => {
                if other.upper_bound().map_or(false, |omax| omax == min)
                    && (inclusivity.includes_lower() || other.inclusivity().includes_upper())
                {
                    return Overlap::LowerOverlap;
                }
            }
            Inner::Ceiling { max, inclusivity } => {
                if other.lower_bound().map_or(false, |omin| omin == max)
                    && (inclusivity.includes_upper() || other.inclusivity().includes_lower())
                {
                    return Overlap::UpperOverlap;
                }
            }
            _ => {}
        }
        overlap
    }
}

impl<T> Range<T>
where
    T: PartialOrd + Clone,
{
    /// Returns the union of this range with another.
    pub fn union(&self, other: &Range<T>) -> Range<T> {
        match (&self.inner, &other.inner) {
            (Inner::Empty, _) => other.clone(),
            (_, Inner::Empty) => self.clone(),
            (Inner::Multiple(fragments), _) => multi_union(fragments, other),
            (_, Inner::Multiple(fragments)) => multi_union(fragments, self),
            (Inner::Null, Inner::Null) => self.clone(),
            (Inner::Null, _) | (_, Inner::Null) => multi_pair(self, other),
            (Inner::Infinite, _) | (_, Inner::Infinite) => Range::infinite(),
            (Inner::Single(_), _) => self.single_union(other),
            (Inner::Interval { min, max, .. }, _) => self.interval_union(min, max, other),
            (Inner::Floor { .. }, _) => self.floor_union(other),
            (Inner::Ceiling { .. }, _) => self.ceiling_union(other),
        }
    }

    /// Returns the result of subtracting `other` from this range.
    pub fn subtract(&self, other: &Range<T>) -> Range<T> {
        match (&self.inner, &other.inner) {
            (Inner::Empty, _) | (_, Inner::Empty) => self.clone(),
            (_, Inner::Multiple(fragments)) => multi_subtract_from(fragments, self),
            (Inner::Multiple(fragments), _) => multi_subtract(fragments, other),
            (Inner::Null, Inner::Null) => Range::empty(),
            (Inner::Null, _) => self.clone(),
            (Inner::Infinite, Inner::Infinite) => Range::empty(),
            (Inner::Infinite, Inner::Null) => self.clone(),
            // Subtracting from the infinite range builds the complement from
            // the subtrahend's bounds with the touching sides flipped.
            (Inner::Infinite, Inner::Single(value)) => multi_pair(
                &Range::ceiling(value.clone(), Inclusivity::Neither),
                &Range::floor(value.clone(), Inclusivity::Neither),
            ),
            (
                Inner::Infinite,
                Inner::Interval {
                    min,
                    max,
                    inclusivity,
                },
            ) => multi_pair(
                &complement_below(min, *inclusivity),
                &complement_above(max, *inclusivity),
            ),
            (Inner::Infinite, Inner::Floor { min, inclusivity }) => {
                complement_below(min, *inclusivity)
            }
            (Inner::Infinite, Inner::Ceiling { max, inclusivity }) => {
                complement_above(max, *inclusivity)
            }
            (_, Inner::Infinite) => Range::empty(),
            (Inner::Single(value), _) => {
                if other.contains(value) {
                    Range::empty()
                } else {
                    self.clone()
                }
            }
            (
                Inner::Interval {
                    min,
                    max,
                    inclusivity,
                },
                _,
            ) => self.interval_subtract(min, max, *inclusivity, other),
            (Inner::Floor { min, inclusivity }, _) => {
                self.floor_subtract(min, *inclusivity, other)
            }
            (Inner::Ceiling { max, inclusivity }, _) => {
                self.ceiling_subtract(max, *inclusivity, other)
            }
        }
    }

    /// Returns the intersection of this range with another.
    pub fn intersect(&self, other: &Range<T>) -> Range<T> {
        match (&self.inner, &other.inner) {
            (Inner::Empty, _) | (_, Inner::Empty) => Range::empty(),
            (Inner::Multiple(fragments), _) => multi_intersect(fragments, other),
            (_, Inner::Multiple(fragments)) => multi_intersect(fragments, self),
            (Inner::Null, Inner::Null) => self.clone(),
            (Inner::Null, _) | (_, Inner::Null) => Range::empty(),
            (Inner::Infinite, _) => other.clone(),
            (_, Inner::Infinite) => self.clone(),
            (Inner::Single(value), _) => {
                if other.contains(value) {
                    self.clone()
                } else {
                    Range::empty()
                }
            }
            (_, Inner::Single(value)) => {
                if self.contains(value) {
                    other.clone()
                } else {
                    Range::empty()
                }
            }
            (Inner::Interval { .. }, _) | (Inner::Floor { .. }, _) | (Inner::Ceiling { .. }, _) => {
                self.bounded_intersect(other)
            }
        }
    }

    fn single_union(&self, other: &Range<T>) -> Range<T> {
        match self.relation(other) {
            Overlap::Contains => self.clone(),
            Overlap::ContainedBy => other.clone(),
            Overlap::Disjoint => multi_pair(self, other),
            // Overlap at a bound: union is commutative, so let the bounded
            // operand do the splicing.
            Overlap::UpperOverlap | Overlap::LowerOverlap => other.union(self),
        }
    }

    fn interval_union(&self, min: &T, max: &T, other: &Range<T>) -> Range<T> {
        let inclusivity = self.inclusivity();
        match self.relation(other) {
            Overlap::UpperOverlap => match other.upper_bound() {
                Some(omax) => Range::interval(
                    min.clone(),
                    omax.clone(),
                    Inclusivity::merge(inclusivity, other.inclusivity()),
                ),
                None => Range::floor(min.clone(), inclusivity),
            },
            Overlap::Contains => self.clone(),
            Overlap::ContainedBy => other.clone(),
            Overlap::LowerOverlap => match other.lower_bound() {
                Some(omin) => Range::interval(
                    omin.clone(),
                    max.clone(),
                    Inclusivity::merge(other.inclusivity(), inclusivity),
                ),
                None => Range::ceiling(max.clone(), inclusivity),
            },
            Overlap::Disjoint => multi_pair(self, other),
        }
    }

    fn floor_union(&self, other: &Range<T>) -> Range<T> {
        match self.mergeability(other) {
            Overlap::UpperOverlap | Overlap::Contains => self.clone(),
            Overlap::ContainedBy => other.clone(),
            Overlap::LowerOverlap => match other.lower_bound() {
                Some(omin) => Range::floor(omin.clone(), other.inclusivity()),
                // Extending past the floor with an unbounded-below range
                // covers everything.
                None => Range::infinite(),
            },
            Overlap::Disjoint => multi_pair(self, other),
        }
    }

    fn ceiling_union(&self, other: &Range<T>) -> Range<T> {
        match self.mergeability(other) {
            Overlap::UpperOverlap => match other.upper_bound() {
                Some(omax) => Range::ceiling(omax.clone(), other.inclusivity()),
                None => Range::infinite(),
            },
            Overlap::Contains | Overlap::LowerOverlap => self.clone(),
            Overlap::ContainedBy => other.clone(),
            Overlap::Disjoint => multi_pair(self, other),
        }
    }

    fn interval_subtract(
        &self,
        min: &T,
        max: &T,
        inclusivity: Inclusivity,
        other: &Range<T>,
    ) -> Range<T> {
        match self.relation(other) {
            Overlap::UpperOverlap => lower_residual(min, inclusivity, other),
            Overlap::Contains => {
                if other.relation(self) == Overlap::Contains {
                    // Same outer bounds: nothing survives.
                    return Range::empty();
                }
                let lower = lower_residual(min, inclusivity, other);
                let upper = upper_residual(max, inclusivity, other);
                lower.union(&upper)
            }
            Overlap::ContainedBy => Range::empty(),
            Overlap::LowerOverlap => upper_residual(max, inclusivity, other),
            Overlap::Disjoint => self.clone(),
        }
    }

    fn floor_subtract(&self, min: &T, inclusivity: Inclusivity, other: &Range<T>) -> Range<T> {
        let overlap = self.relation(other);
        match overlap {
            Overlap::Contains | Overlap::UpperOverlap => {
                if overlap == Overlap::Contains && other.relation(self) == Overlap::Contains {
                    return Range::empty();
                }
                let lower = lower_residual(min, inclusivity, other);
                match other.upper_bound() {
                    // The subtrahend is itself unbounded above, so nothing
                    // survives past it.
                    None => lower,
                    Some(omax) => {
                        let rest = Range::floor(omax.clone(), flipped_above(other.inclusivity()));
                        lower.union(&rest)
                    }
                }
            }
            Overlap::LowerOverlap => match other.upper_bound() {
                Some(omax) => Range::floor(omax.clone(), flipped_above(other.inclusivity())),
                None => Range::empty(),
            },
            Overlap::ContainedBy => Range::empty(),
            Overlap::Disjoint => self.clone(),
        }
    }

    fn ceiling_subtract(&self, max: &T, inclusivity: Inclusivity, other: &Range<T>) -> Range<T> {
        let overlap = self.relation(other);
        match overlap {
            Overlap::UpperOverlap => match other.lower_bound() {
                Some(omin) => Range::ceiling(omin.clone(), flipped_below(other.inclusivity())),
                None => Range::empty(),
            },
            Overlap::Contains | Overlap::LowerOverlap => {
                if overlap == Overlap::Contains && other.relation(self) == Overlap::Contains {
                    return Range::empty();
                }
                let upper = upper_residual(max, inclusivity, other);
                match other.lower_bound() {
                    None => upper,
                    Some(omin) => {
                        let rest = Range::ceiling(omin.clone(), flipped_below(other.inclusivity()));
                        rest.union(&upper)
                    }
                }
            }
            Overlap::ContainedBy => Range::empty(),
            Overlap::Disjoint => self.clone(),
        }
    }

    fn bounded_intersect(&self, other: &Range<T>) -> Range<T> {
        match self.relation(other) {
            Overlap::Contains => other.clone(),
            Overlap::ContainedBy => self.clone(),
            Overlap::UpperOverlap => overlap_segment(
                other.lower_bound(),
                self.upper_bound(),
                Inclusivity::merge(other.inclusivity(), self.inclusivity()),
            ),
            Overlap::LowerOverlap => overlap_segment(
                self.lower_bound(),
                other.upper_bound(),
                Inclusivity::merge(self.inclusivity(), other.inclusivity()),
            ),
            Overlap::Disjoint => Range::empty(),
        }
    }
}

fn bounds_equal<T>(a: Option<&T>, b: Option<&T>) -> bool
where
    T: PartialOrd,
{
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// An interval between `min` and `max`, unless the bounds coincide and a
/// side excludes the shared value, in which case nothing is left.
fn interval_or_empty<T>(min: &T, max: &T, inclusivity: Inclusivity) -> Range<T>
where
    T: PartialOrd + Clone,
{
    if min == max && inclusivity != Inclusivity::Both {
        Range::empty()
    } else {
        Range::interval(min.clone(), max.clone(), inclusivity)
    }
}

/// The part of a range below a subtracted range's lower bound. The residual
/// keeps the minuend's lower side and includes the boundary exactly when the
/// subtrahend excluded it.
fn lower_residual<T>(min: &T, inclusivity: Inclusivity, other: &Range<T>) -> Range<T>
where
    T: PartialOrd + Clone,
{
    match other.lower_bound() {
        Some(omin) => interval_or_empty(
            min,
            omin,
            Inclusivity::from_sides(
                inclusivity.includes_lower(),
                !other.inclusivity().includes_lower(),
            ),
        ),
        None => Range::empty(),
    }
}

/// The part of a range above a subtracted range's upper bound.
fn upper_residual<T>(max: &T, inclusivity: Inclusivity, other: &Range<T>) -> Range<T>
where
    T: PartialOrd + Clone,
{
    match other.upper_bound() {
        Some(omax) => interval_or_empty(
            omax,
            max,
            Inclusivity::from_sides(
                !other.inclusivity().includes_upper(),
                inclusivity.includes_upper(),
            ),
        ),
        None => Range::empty(),
    }
}

/// Everything below `min`: the complement of a range bounded below there.
fn complement_below<T>(min: &T, inclusivity: Inclusivity) -> Range<T>
where
    T: PartialOrd + Clone,
{
    let inclusivity = if inclusivity.includes_lower() {
        Inclusivity::Neither
    } else {
        Inclusivity::UpperOnly
    };
    Range::ceiling(min.clone(), inclusivity)
}

/// Everything above `max`: the complement of a range bounded above there.
fn complement_above<T>(max: &T, inclusivity: Inclusivity) -> Range<T>
where
    T: PartialOrd + Clone,
{
    let inclusivity = if inclusivity.includes_upper() {
        Inclusivity::Neither
    } else {
        Inclusivity::LowerOnly
    };
    Range::floor(max.clone(), inclusivity)
}

/// What remains above a subtracted range: excludes its upper boundary when
/// the subtrahend included it.
fn flipped_above(inclusivity: Inclusivity) -> Inclusivity {
    if inclusivity.includes_upper() {
        Inclusivity::Neither
    } else {
        Inclusivity::LowerOnly
    }
}

/// What remains below a subtracted range.
fn flipped_below(inclusivity: Inclusivity) -> Inclusivity {
    if inclusivity.includes_lower() {
        Inclusivity::Neither
    } else {
        Inclusivity::UpperOnly
    }
}

/// The contiguous segment where two overlapping ranges meet, shaped by which
/// bounds are present.
fn overlap_segment<T>(min: Option<&T>, max: Option<&T>, inclusivity: Inclusivity) -> Range<T>
where
    T: PartialOrd + Clone,
{
    match (min, max) {
        (Some(min), Some(max)) => interval_or_empty(min, max, inclusivity),
        (Some(min), None) => Range::floor(min.clone(), inclusivity),
        (None, Some(max)) => Range::ceiling(max.clone(), inclusivity),
        (None, None) => Range::infinite(),
    }
}

/// Builds the union of two ranges the classifier found unmergeable.
fn multi_pair<T>(a: &Range<T>, b: &Range<T>) -> Range<T>
where
    T: PartialOrd + Clone,
{
    let mut fragments = Vec::with_capacity(2);
    insert_fragment(&mut fragments, a.clone());
    insert_fragment(&mut fragments, b.clone());
    collapse(fragments)
}

fn multi_union<T>(fragments: &[Range<T>], other: &Range<T>) -> Range<T>
where
    T: PartialOrd + Clone,
{
    let mut merged = fragments.to_vec();
    match &other.inner {
        Inner::Multiple(others) => {
            for fragment in others {
                insert_fragment(&mut merged, fragment.clone());
            }
        }
        _ => insert_fragment(&mut merged, other.clone()),
    }
    collapse(merged)
}

/// Inserts a fragment in sorted position, then repeatedly merges it with its
/// left and right neighbors while any of them can be unioned into one range.
/// Every insertion re-establishes the invariant that no two adjacent
/// fragments are mergeable.
fn insert_fragment<T>(fragments: &mut Vec<Range<T>>, fragment: Range<T>)
where
    T: PartialOrd + Clone,
{
    let mut idx = fragments
        .iter()
        .position(|existing| fragment_order(existing, &fragment) == Ordering::Greater)
        .unwrap_or_else(|| fragments.len());
    fragments.insert(idx, fragment);
    while idx > 0 && fragments[idx].mergeability(&fragments[idx - 1]) != Overlap::Disjoint {
        let right = fragments.remove(idx);
        let left = fragments.remove(idx - 1);
        idx -= 1;
        fragments.insert(idx, right.union(&left));
    }
    while idx + 1 < fragments.len()
        && fragments[idx].mergeability(&fragments[idx + 1]) != Overlap::Disjoint
    {
        let left = fragments.remove(idx);
        let right = fragments.remove(idx);
        fragments.insert(idx, left.union(&right));
    }
}

/// Orders fragments of a multi-interval range: unbounded-below fragments
/// sort first, unbounded-above fragments last, the null-element fragment
/// after everything, ties broken by mutual containment.
fn fragment_order<T>(a: &Range<T>, b: &Range<T>) -> Ordering
where
    T: PartialOrd,
{
    match (&a.inner, &b.inner) {
        (Inner::Null, Inner::Null) => return Ordering::Equal,
        (Inner::Null, _) => return Ordering::Greater,
        (_, Inner::Null) => return Ordering::Less,
        // An infinite fragment absorbs everything on merge, so its position
        // is irrelevant.
        (Inner::Infinite, _) | (_, Inner::Infinite) => return Ordering::Equal,
        _ => {}
    }
    match (
        a.lower_bound(),
        a.upper_bound(),
        b.lower_bound(),
        b.upper_bound(),
    ) {
        (Some(amin), None, Some(bmin), None) => {
            if !b.contains(amin) {
                Ordering::Less
            } else if a.contains(bmin) {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
        (_, None, _, Some(_)) => Ordering::Greater,
        (None, Some(amax), None, Some(bmax)) => {
            if !b.contains(amax) {
                Ordering::Greater
            } else if a.contains(bmax) {
                Ordering::Equal
            } else {
                Ordering::Less
            }
        }
        (None, Some(_), Some(_), _) => Ordering::Less,
        (Some(_), Some(_), None, _) => Ordering::Greater,
        (Some(_), Some(_), _, None) => Ordering::Less,
        (Some(amin), Some(amax), Some(bmin), Some(bmax)) => amin
            .partial_cmp(bmin)
            .unwrap_or(Ordering::Equal)
            .then(amax.partial_cmp(bmax).unwrap_or(Ordering::Equal)),
        // Fragments always carry at least one bound.
        (None, None, _, _) | (_, _, None, None) => Ordering::Equal,
    }
}

/// A fragment list of zero or one entries is not a multi-interval range.
fn collapse<T>(mut fragments: Vec<Range<T>>) -> Range<T> {
    match fragments.len() {
        0 => Range::empty(),
        1 => fragments.remove(0),
        _ => Range {
            inner: Inner::Multiple(fragments),
        },
    }
}

fn multi_subtract<T>(fragments: &[Range<T>], other: &Range<T>) -> Range<T>
where
    T: PartialOrd + Clone,
{
    let mut remaining = fragments.to_vec();
    subtract_fragment(&mut remaining, other);
    collapse(remaining)
}

/// Subtracts `other` from every fragment in place, splicing multi-interval
/// residues and dropping empty ones. Subtraction only ever shrinks
/// fragments, so the list stays sorted and unmergeable.
fn subtract_fragment<T>(fragments: &mut Vec<Range<T>>, other: &Range<T>)
where
    T: PartialOrd + Clone,
{
    let mut idx = 0;
    while idx < fragments.len() {
        let residue = fragments[idx].subtract(other);
        match residue.inner {
            Inner::Empty => {
                fragments.remove(idx);
            }
            Inner::Multiple(parts) => {
                fragments.remove(idx);
                for part in parts {
                    fragments.insert(idx, part);
                    idx += 1;
                }
            }
            inner => {
                fragments[idx] = Range { inner };
                idx += 1;
            }
        }
    }
}

/// Computes `range − (fragment₁ ∪ fragment₂ ∪ …)` by subtracting every
/// fragment from every surviving piece of `range`.
fn multi_subtract_from<T>(fragments: &[Range<T>], range: &Range<T>) -> Range<T>
where
    T: PartialOrd + Clone,
{
    let mut pieces = match &range.inner {
        Inner::Multiple(own) => own.clone(),
        _ => vec![range.clone()],
    };
    for fragment in fragments {
        subtract_fragment(&mut pieces, fragment);
    }
    collapse(pieces)
}

/// Intersects every fragment with every fragment of `other`, keeping the
/// non-empty pieces. Pieces cut from disjoint fragments cannot merge with
/// each other, so the survivors are already canonical.
fn multi_intersect<T>(fragments: &[Range<T>], other: &Range<T>) -> Range<T>
where
    T: PartialOrd + Clone,
{
    let others: &[Range<T>] = match &other.inner {
        Inner::Multiple(others) => others,
        _ => std::slice::from_ref(other),
    };
    let mut survivors = Vec::new();
    for fragment in fragments {
        for other_fragment in others {
            let piece = fragment.intersect(other_fragment);
            if !piece.is_empty() {
                survivors.push(piece);
            }
        }
    }
    collapse(survivors)
}

impl<T> fmt::Display for Range<T>
where
    T: fmt::Display,
{
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Empty => fmt.write_str("[]"),
            Inner::Infinite => fmt.write_str("(-\u{221E}, \u{221E})"),
            Inner::Null => fmt.write_str("[null]"),
            Inner::Single(value) => write!(fmt, "[{}]", value),
            Inner::Interval {
                min,
                max,
                inclusivity,
            } => fmt.write_str(&inclusivity.format_bounds(Some(min), Some(max))),
            Inner::Floor { min, inclusivity } => {
                fmt.write_str(&inclusivity.format_bounds(Some(min), None))
            }
            Inner::Ceiling { max, inclusivity } => {
                fmt.write_str(&inclusivity.format_bounds(None, Some(max)))
            }
            Inner::Multiple(fragments) => {
                if fragments.is_empty() {
                    return fmt.write_str("[]");
                }
                for (idx, fragment) in fragments.iter().enumerate() {
                    if idx > 0 {
                        fmt.write_str(" \u{222A} ")?;
                    }
                    write!(fmt, "{}", fragment)?;
                }
                Ok(())
            }
        }
    }
}
