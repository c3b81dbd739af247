//! Parsing and evaluation of textual range expressions.
//!
//! An expression is a sequence of range literals (`(1, 2)`, `[2, 3)`,
//! `("quoted value")`, `[]`, `(null)`) separated by optional operators
//! (`∪`/`u`/`union`/`+`, `∩`/`i`/`intersect`/`intersection`, `-`). Literals
//! with no explicit operator between them are unioned; explicit operators
//! fold left to right.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::inclusivity::Inclusivity;
use crate::range::Range;

/// Failures raised while parsing a range expression.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The expression contained no range literal at all.
    #[error("expression contains no range literal")]
    EmptyExpression,
    /// Text that is not part of any literal or operator.
    #[error("unexpected input at byte {position}: {fragment:?}")]
    UnexpectedInput {
        /// Byte offset of the offending text in the input.
        position: usize,
        /// The offending text.
        fragment: String,
    },
    /// An operator with no range literal on its right-hand side.
    #[error("operator is missing its right-hand range")]
    DanglingOperator,
    /// A literal whose delimiters are not a `(`/`[` … `)`/`]` pair.
    #[error("mismatched delimiters in range literal {literal:?}")]
    MismatchedDelimiters {
        /// The offending literal text.
        literal: String,
    },
    /// The conversion function rejected a literal value.
    #[error("could not convert {literal:?} to a range element")]
    Conversion {
        /// The literal text handed to the conversion function.
        literal: String,
        /// The conversion function's error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// The default pattern recognizing unbounded literal values: `∞`, `inf`,
/// `infty` or `infinity`, optionally signed, case-insensitive.
pub fn default_infinity_markers() -> &'static Regex {
    static MARKERS: OnceLock<Regex> = OnceLock::new();
    MARKERS.get_or_init(|| {
        Regex::new(r"(?i)^[+-]?(?:infinity|infty|inf|\u{221E})$")
            .expect("infinity marker pattern is valid")
    })
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // A value is either bare (no whitespace, commas or closing
        // delimiters) or double-quoted with the usual escape alphabet.
        let quoted = |name: &str| format!("\"(?P<{}>(?:\\\\[tbnrf'\"\\\\]|[^\"\\\\])+?)\"", name);
        let interval = format!(
            r"[(\[]\s*(?:{}|(?P<blo>[^\s,]+?))\s*,\s*(?:{}|(?P<bhi>[^\s)\]]+?))\s*[)\]]",
            quoted("qlo"),
            quoted("qhi"),
        );
        let element = format!(r"[(\[]\s*(?:{}|(?P<bel>[^\s)\]]*?))\s*[)\]]", quoted("qel"));
        let operators = "(?P<union>union|[\u{222A}uU])\
                         |(?P<isect>intersection|intersect|[\u{2229}iI])\
                         |(?P<add>\\+)\
                         |(?P<sub>-)";
        let pattern = format!("{}|{}|{}", interval, operators, element);
        Regex::new(&pattern).expect("token pattern is valid")
    })
}

enum Token<T> {
    Literal(Range<T>),
    Operator(Operator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Union,
    Intersect,
    Subtract,
}

impl<T> Range<T>
where
    T: PartialOrd + Clone,
{
    /// Parses a range expression, converting literal values with `convert`
    /// and recognizing the default infinity markers.
    pub fn parse<F, E>(input: &str, convert: F) -> Result<Range<T>, ParseError>
    where
        F: FnMut(&str) -> Result<T, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Range::parse_with_markers(input, convert, default_infinity_markers())
    }

    /// Parses a range expression, treating interval values that match
    /// `infinity_markers` as unbounded on that side.
    ///
    /// The marker pattern is tested with [`Regex::is_match`], so it should
    /// be anchored the way [`default_infinity_markers`] is.
    pub fn parse_with_markers<F, E>(
        input: &str,
        mut convert: F,
        infinity_markers: &Regex,
    ) -> Result<Range<T>, ParseError>
    where
        F: FnMut(&str) -> Result<T, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let tokens = tokenize(input, &mut convert, infinity_markers)?;
        evaluate(tokens)
    }
}

impl<T> FromStr for Range<T>
where
    T: PartialOrd + Clone + FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Range<T>, ParseError> {
        Range::parse(input, T::from_str)
    }
}

fn tokenize<T, F, E>(
    input: &str,
    convert: &mut F,
    infinity_markers: &Regex,
) -> Result<Vec<Token<T>>, ParseError>
where
    T: PartialOrd,
    F: FnMut(&str) -> Result<T, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut tokens = Vec::new();
    let mut cursor = 0;
    for captures in token_pattern().captures_iter(input) {
        let whole = match captures.get(0) {
            Some(matched) => matched,
            None => continue,
        };
        let gap = &input[cursor..whole.start()];
        if !gap.trim().is_empty() {
            return Err(ParseError::UnexpectedInput {
                position: cursor,
                fragment: gap.trim().to_string(),
            });
        }
        cursor = whole.end();

        if captures.name("qlo").is_some() || captures.name("blo").is_some() {
            tokens.push(Token::Literal(interval_literal(
                &captures,
                whole.as_str(),
                convert,
                infinity_markers,
            )?));
        } else if captures.name("union").is_some() || captures.name("add").is_some() {
            tokens.push(Token::Operator(Operator::Union));
        } else if captures.name("isect").is_some() {
            tokens.push(Token::Operator(Operator::Intersect));
        } else if captures.name("sub").is_some() {
            tokens.push(Token::Operator(Operator::Subtract));
        } else {
            tokens.push(Token::Literal(element_literal(&captures, convert)?));
        }
    }
    let rest = &input[cursor..];
    if !rest.trim().is_empty() {
        return Err(ParseError::UnexpectedInput {
            position: cursor,
            fragment: rest.trim().to_string(),
        });
    }
    Ok(tokens)
}

/// Builds a bounded, half-bounded or infinite range from an interval
/// literal, depending on which of its values are infinity markers.
fn interval_literal<T, F, E>(
    captures: &Captures<'_>,
    literal: &str,
    convert: &mut F,
    infinity_markers: &Regex,
) -> Result<Range<T>, ParseError>
where
    T: PartialOrd,
    F: FnMut(&str) -> Result<T, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let inclusivity = match Inclusivity::from_delimiters(literal) {
        Some(inclusivity) => inclusivity,
        None => {
            return Err(ParseError::MismatchedDelimiters {
                literal: literal.to_string(),
            })
        }
    };
    let lower = capture_text(captures, "qlo", "blo");
    let upper = capture_text(captures, "qhi", "bhi");
    let range = match (
        infinity_markers.is_match(lower),
        infinity_markers.is_match(upper),
    ) {
        (true, true) => Range::infinite(),
        (true, false) => Range::ceiling(convert_value(convert, upper)?, inclusivity),
        (false, true) => Range::floor(convert_value(convert, lower)?, inclusivity),
        (false, false) => Range::interval(
            convert_value(convert, lower)?,
            convert_value(convert, upper)?,
            inclusivity,
        ),
    };
    Ok(range)
}

/// Builds a range from a single-value literal: an empty value is the empty
/// range, `null` the null-element range, anything else a singleton.
fn element_literal<T, F, E>(captures: &Captures<'_>, convert: &mut F) -> Result<Range<T>, ParseError>
where
    F: FnMut(&str) -> Result<T, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let value = capture_text(captures, "qel", "bel");
    if value.is_empty() {
        Ok(Range::empty())
    } else if value == "null" {
        Ok(Range::null_element())
    } else {
        Ok(Range::singleton(convert_value(convert, value)?))
    }
}

fn capture_text<'t>(captures: &Captures<'t>, quoted: &str, bare: &str) -> &'t str {
    captures
        .name(quoted)
        .or_else(|| captures.name(bare))
        .map_or("", |matched| matched.as_str())
}

fn convert_value<T, F, E>(convert: &mut F, literal: &str) -> Result<T, ParseError>
where
    F: FnMut(&str) -> Result<T, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    convert(literal).map_err(|error| ParseError::Conversion {
        literal: literal.to_string(),
        source: Box::new(error),
    })
}

/// Folds the token stream left to right. Bare literals union into the
/// accumulator; explicit operators apply to the accumulator and the next
/// literal. A leading operator applies against the empty range.
fn evaluate<T>(tokens: Vec<Token<T>>) -> Result<Range<T>, ParseError>
where
    T: PartialOrd + Clone,
{
    let mut iter = tokens.into_iter();
    let mut accumulator = match iter.next() {
        None => return Err(ParseError::EmptyExpression),
        Some(Token::Literal(range)) => range,
        Some(Token::Operator(operator)) => match iter.next() {
            Some(Token::Literal(range)) => apply(operator, &Range::empty(), &range),
            _ => return Err(ParseError::DanglingOperator),
        },
    };
    while let Some(token) = iter.next() {
        match token {
            Token::Literal(range) => accumulator = accumulator.union(&range),
            Token::Operator(operator) => match iter.next() {
                Some(Token::Literal(range)) => accumulator = apply(operator, &accumulator, &range),
                _ => return Err(ParseError::DanglingOperator),
            },
        }
    }
    Ok(accumulator)
}

fn apply<T>(operator: Operator, lhs: &Range<T>, rhs: &Range<T>) -> Range<T>
where
    T: PartialOrd + Clone,
{
    match operator {
        Operator::Union => lhs.union(rhs),
        Operator::Intersect => lhs.intersect(rhs),
        Operator::Subtract => lhs.subtract(rhs),
    }
}

#[cfg(test)]
mod test {
    use std::convert::Infallible;

    use super::ParseError;
    use crate::range::Range;

    fn parse(input: &str) -> Range<f64> {
        match input.parse() {
            Ok(range) => range,
            Err(error) => panic!("failed to parse {:?}: {}", input, error),
        }
    }

    #[test]
    fn test_parse_scenarios() {
        let tests = [
            ("(1, 2)+[2, 3)", "(1, 3)"),
            ("(-\u{221E}, 55.1]", "(-\u{221E}, 55.1]"),
            ("[]", "[]"),
            ("(\"2.0\")", "[2]"),
            ("(null)", "[null]"),
        ];
        for (input, expected) in &tests {
            assert_eq!(*expected, parse(input).to_string(), "input: {}", input);
        }
    }

    #[test]
    fn test_parse_infinity_markers() {
        assert_eq!("[55.1, \u{221E})", parse("[55.1, inf)").to_string());
        assert_eq!("(-\u{221E}, 55.1]", parse("(-Infinity, 55.1]").to_string());
        assert_eq!("(-\u{221E}, \u{221E})", parse("(-infty, +infty)").to_string());
        assert_eq!("(-\u{221E}, \u{221E})", parse("(-\u{221E}, \u{221E})").to_string());
        // A marker has to span the whole value to mean unbounded.
        assert!("(infx, 2)".parse::<Range<f64>>().is_err());
    }

    #[test]
    fn test_parse_operators() {
        assert_eq!("[3, 5]", parse("(1, 5] i [3, 7)").to_string());
        assert_eq!("[3, 5]", parse("(1, 5] intersect [3, 7)").to_string());
        assert_eq!("[3, 5]", parse("(1, 5] \u{2229} [3, 7)").to_string());
        assert_eq!("(1, 3]", parse("(1, 2) u [2, 3]").to_string());
        assert_eq!("(1, 3]", parse("(1, 2) union [2, 3]").to_string());
        assert_eq!(
            "[1, 2] \u{222A} [4, 10)",
            parse("[1, 10) - (2, 4)").to_string()
        );
        // Adjacent literals union implicitly.
        assert_eq!(
            "(1, 2) \u{222A} (3, 4)",
            parse("(1, 2) (3, 4)").to_string()
        );
        // A leading operator applies against the empty range.
        assert_eq!("(1, 2)", parse("+ (1, 2)").to_string());
        assert_eq!("[]", parse("- (3)").to_string());
    }

    #[test]
    fn test_parse_quoted_values() {
        let range = Range::parse("[\"new york\", \"san francisco\")", |text| {
            Ok::<_, Infallible>(text.to_string())
        });
        let range = match range {
            Ok(range) => range,
            Err(error) => panic!("failed to parse: {}", error),
        };
        assert!(range.contains(&"philadelphia".to_string()));
        assert!(!range.contains(&"seattle".to_string()));
        assert_eq!("[\"new york\", \"san francisco\")", range.to_string());
    }

    #[test]
    fn test_parse_round_trips() {
        let ranges = [
            "[]",
            "[null]",
            "[2]",
            "(1, 3)",
            "[1, 3]",
            "(1, 3]",
            "[1, 3)",
            "[1, \u{221E})",
            "(1, \u{221E})",
            "(-\u{221E}, 3]",
            "(-\u{221E}, 3)",
            "(-\u{221E}, \u{221E})",
        ];
        for text in &ranges {
            let range: Range<f64> = parse(text);
            assert_eq!(*text, range.to_string());
            assert_eq!(range, parse(&range.to_string()));
        }
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        fn parse_err(input: &str) -> ParseError {
            match input.parse::<Range<f64>>() {
                Ok(range) => panic!("expected {:?} to fail, got {}", input, range),
                Err(error) => error,
            }
        }

        assert!(matches!(parse_err(""), ParseError::EmptyExpression));
        assert!(matches!(parse_err("   "), ParseError::EmptyExpression));
        assert!(matches!(
            parse_err("(1, 2"),
            ParseError::UnexpectedInput { .. }
        ));
        assert!(matches!(
            parse_err("(1, 2) bogus (3, 4)"),
            ParseError::UnexpectedInput { .. }
        ));
        assert!(matches!(
            parse_err("(1, 2) + - (3, 4)"),
            ParseError::DanglingOperator
        ));
        assert!(matches!(parse_err("(1, 2) +"), ParseError::DanglingOperator));
        assert!(matches!(
            parse_err("(1, x)"),
            ParseError::Conversion { .. }
        ));
    }

    #[test]
    fn test_parse_with_custom_markers() {
        let markers = regex::Regex::new(r"^unbounded$").expect("pattern is valid");
        let range = Range::parse_with_markers("[1, unbounded)", |text| text.parse::<f64>(), &markers);
        let range = match range {
            Ok(range) => range,
            Err(error) => panic!("failed to parse: {}", error),
        };
        assert_eq!("[1, \u{221E})", range.to_string());
        // The default markers are plain values under the custom pattern.
        assert!(
            Range::parse_with_markers("[1, \u{221E})", |text| text.parse::<f64>(), &markers)
                .is_err()
        );
    }
}
