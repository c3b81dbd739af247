//! Set algebra for ranges over ordered values.
//!
//! A [`Range`] is an immutable set of values of any `PartialOrd` type: a
//! bounded or half-bounded interval, a single element, everything, nothing,
//! the null-element singleton, or a disjoint union of intervals. Ranges
//! support containment tests, union, subtraction and intersection, and every
//! operation returns a new value.
//!
//! ```rust
//! use range_algebra::{range, Range};
//!
//! let reserved = range!('[' 1.0, 5.0; ')');
//! let released = range!('[' 2.0, 3.0; ']');
//! let remaining = reserved.subtract(&released);
//! assert!(remaining.contains(&1.5));
//! assert!(!remaining.contains(&3.0));
//! assert_eq!("[1, 2) \u{222A} (3, 5)", remaining.to_string());
//! ```
//!
//! Ranges also have a textual form. Expressions combine range literals with
//! union (`∪`, `u`, `union`, `+`), intersection (`∩`, `i`, `intersect`) and
//! subtraction (`-`) operators, folding left to right:
//!
//! ```rust
//! use range_algebra::Range;
//!
//! let range: Range<f64> = "(1, 2)+[2, 3)".parse().unwrap();
//! assert_eq!("(1, 3)", range.to_string());
//!
//! let range: Range<f64> = "(-\u{221E}, 55.1]".parse().unwrap();
//! assert!(range.contains(&-1e100));
//! ```

/// The `range!` macro can make it easier to create ranges. It roughly
/// mirrors traditional mathematic range syntax.
///
/// ## Example
///
/// ```rust
/// use range_algebra::{range, Range};
///
/// let mut r: Range<i32>;
/// // a closed interval
/// r = range!('[' 5, 10; ']');
/// // an open interval
/// r = range!('(' 5, 10; ')');
/// // half-open intervals
/// r = range!('(' 5, 10; ']');
/// r = range!('[' 5, 10; ')');
/// // a closed lower-bounded range
/// r = range!('[' 5,; ')');
/// // an open lower-bounded range
/// r = range!('(' 5,; ')');
/// // a closed upper-bounded range
/// r = range!('(', 10; ']');
/// // an open upper-bounded range
/// r = range!('(', 10; ')');
/// // an unbounded range
/// r = range!('(',; ')');
/// // a single element
/// r = range!('[' 5 ']');
/// // an empty range
/// r = range!(empty);
/// // the null-element range
/// r = range!(null);
/// ```
#[macro_export]
macro_rules! range {
    (empty) => ($crate::Range::empty());
    (null) => ($crate::Range::null_element());
    ('(',; ')') => ($crate::Range::infinite());
    ('[' $v:tt ']') => ($crate::Range::singleton($v));
    ('(' $l:expr,; ')') => ($crate::Range::floor($l, $crate::Inclusivity::Neither));
    ('[' $l:expr,; ')') => ($crate::Range::floor($l, $crate::Inclusivity::LowerOnly));
    ('(', $h:expr; ')') => ($crate::Range::ceiling($h, $crate::Inclusivity::Neither));
    ('(', $h:expr; ']') => ($crate::Range::ceiling($h, $crate::Inclusivity::UpperOnly));
    ('(' $l:expr, $h:expr; ')') => (
        $crate::Range::interval($l, $h, $crate::Inclusivity::Neither)
    );
    ('(' $l:expr, $h:expr; ']') => (
        $crate::Range::interval($l, $h, $crate::Inclusivity::UpperOnly)
    );
    ('[' $l:expr, $h:expr; ')') => (
        $crate::Range::interval($l, $h, $crate::Inclusivity::LowerOnly)
    );
    ('[' $l:expr, $h:expr; ']') => (
        $crate::Range::interval($l, $h, $crate::Inclusivity::Both)
    );
}

mod inclusivity;
mod parse;
mod range;

pub use crate::inclusivity::Inclusivity;
pub use crate::parse::{default_infinity_markers, ParseError};
pub use crate::range::Range;
