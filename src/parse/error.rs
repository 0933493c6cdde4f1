use crate::common::NonEmpty;
use std::fmt;
use std::ops::Range;

/// A formula the tokenizer rejected.
///
/// `span` and `slice` point into the normalized formula, i.e. after whitespace
/// was stripped and letters were lower-cased.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnrecognizedInput,
    InvalidDice,
    AdjacentOperands,
    AdjacentOperators { expected: NonEmpty<&'static str> },
    LeadingOperator { expected: NonEmpty<&'static str> },
    TrailingOperator,
    UnbalancedParenthesis,
    EmptyParentheses,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedInput => f.write_str("unrecognized input"),
            Self::InvalidDice => {
                f.write_str("invalid dice: count and sides must be positive integers")
            }
            Self::AdjacentOperands => f.write_str("missing operator between operands"),
            Self::AdjacentOperators { expected } => {
                write!(f, "operator follows another operator; expected ")?;
                fmt_expected(expected, f)
            }
            Self::LeadingOperator { expected } => {
                write!(f, "operator is missing its left operand; expected ")?;
                fmt_expected(expected, f)
            }
            Self::TrailingOperator => f.write_str("operator is missing its right operand"),
            Self::UnbalancedParenthesis => f.write_str("unbalanced parenthesis"),
            Self::EmptyParentheses => f.write_str("parentheses must enclose an expression"),
        }
    }
}

fn fmt_expected(expected: &[&str], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expected {
        [] => Ok(()),
        [a] => f.write_str(a),
        [a, b] => write!(f, "{} or {}", a, b),
        [init @ .., last] => {
            for exp in init {
                write!(f, "{}, ", exp)?;
            }
            write!(f, "or {}", last)
        }
    }
}

pub type PResult<T> = Result<T, ParseError>;
