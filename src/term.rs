use crate::common::*;
use enum_dispatch::enum_dispatch;
use std::fmt::{self, Write};

/// Coarse classification of a term, as far as neighbouring terms care.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TermClass {
    Operand,
    Operator,
    Open,
    Close,
}

#[enum_dispatch]
pub trait Lexeme {
    fn class(&self) -> TermClass;
}

/// One unit of a tokenized formula.
///
/// A formula is a flat sequence of terms; parentheses stay in the sequence as
/// markers and the evaluators rebuild the grouping with an operator stack.
#[enum_dispatch(Lexeme)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Term {
    Dice(DiceTerm),
    Number(NumberTerm),
    Operator(OperatorTerm),
    Paren(ParenTerm),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dice(x) => fmt::Display::fmt(x, f),
            Self::Number(x) => fmt::Display::fmt(x, f),
            Self::Operator(x) => fmt::Display::fmt(x, f),
            Self::Paren(x) => fmt::Display::fmt(x, f),
        }
    }
}

/// `count` dice with `sides` faces each, summed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DiceTerm {
    count: Num,
    sides: NonZeroUInt,
}

impl DiceTerm {
    /// Returns `None` if either `count` or `sides` is zero.
    pub fn new(count: usize, sides: UInt) -> Option<Self> {
        Some(Self {
            count: Num::new(count)?,
            sides: NonZeroUInt::new(sides)?,
        })
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    pub fn sides(&self) -> UInt {
        self.sides.get()
    }

    pub fn min(&self) -> Float {
        self.count() as Float
    }

    pub fn max(&self) -> Float {
        self.count() as Float * Float::from(self.sides())
    }

    pub fn average(&self) -> Float {
        self.count() as Float * (Float::from(self.sides()) + 1.0) / 2.0
    }
}

impl Lexeme for DiceTerm {
    fn class(&self) -> TermClass {
        TermClass::Operand
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// A constant, with any leading sign already folded into `value`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NumberTerm {
    pub value: Float,
    /// Set when the term was inserted by sign folding (the `-1` in `-1*1d6`)
    /// rather than written in the formula.
    pub implied: bool,
}

impl NumberTerm {
    pub const fn new(value: Float) -> Self {
        Self {
            value,
            implied: false,
        }
    }

    pub(crate) const fn implied(value: Float) -> Self {
        Self {
            value,
            implied: true,
        }
    }
}

impl Lexeme for NumberTerm {
    fn class(&self) -> TermClass {
        TermClass::Operand
    }
}

impl fmt::Display for NumberTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct OperatorTerm {
    pub op: BinaryOperator,
}

impl OperatorTerm {
    pub const fn new(op: BinaryOperator) -> Self {
        Self { op }
    }
}

impl Lexeme for OperatorTerm {
    fn class(&self) -> TermClass {
        TermClass::Operator
    }
}

impl fmt::Display for OperatorTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.op, f)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParenTerm {
    Open,
    Close,
}

impl Lexeme for ParenTerm {
    fn class(&self) -> TermClass {
        match self {
            Self::Open => TermClass::Open,
            Self::Close => TermClass::Close,
        }
    }
}

impl fmt::Display for ParenTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::Open => '(',
            Self::Close => ')',
        })
    }
}

/// Total number of dice rolled by a formula.
pub fn total_dice(terms: &[Term]) -> usize {
    terms
        .iter()
        .filter_map(|term| match term {
            Term::Dice(dice) => Some(dice.count()),
            Term::Number(_) | Term::Operator(_) | Term::Paren(_) => None,
        })
        .fold(0, usize::saturating_add)
}

/// Formats a term sequence back into a formula that tokenizes to the same terms.
pub struct DisplayTerms<'a>(pub &'a [Term]);

impl fmt::Display for DisplayTerms<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms = self.0.iter().peekable();
        while let Some(term) = terms.next() {
            match term {
                Term::Number(n) if n.implied => {
                    if n.value < 0.0 {
                        f.write_char('-')?;
                    }
                    if matches!(
                        terms.peek(),
                        Some(Term::Operator(OperatorTerm {
                            op: BinaryOperator::Mul
                        }))
                    ) {
                        terms.next();
                    }
                }
                other => fmt::Display::fmt(other, f)?,
            }
        }
        Ok(())
    }
}
