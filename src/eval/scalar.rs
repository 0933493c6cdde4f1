use super::error::{check_rolled_dice, EvalError};
use super::fold::{fold, Combine};
use super::roller::Roller;
use crate::common::*;
use crate::limits::Limits;
use crate::term::*;
use std::fmt;

/// How dice terms resolve to a scalar.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Every die shows 1.
    Min,
    /// Every die shows its highest face.
    Max,
    /// Every die contributes its mean, `(sides + 1) / 2`.
    Average,
    /// Every die is rolled.
    Roll,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Average => "average",
            Self::Roll => "roll",
        })
    }
}

pub struct Evaluator<'r, R> {
    mode: Mode,
    roller: &'r mut R,
    max_rolled_dice: usize,
}

impl<'r, R: Roller> Evaluator<'r, R> {
    pub fn new(mode: Mode, roller: &'r mut R) -> Self {
        Self::with_limits(mode, roller, &Limits::default())
    }

    pub fn with_limits(mode: Mode, roller: &'r mut R, limits: &Limits) -> Self {
        Self {
            mode,
            roller,
            max_rolled_dice: limits.max_rolled_dice,
        }
    }

    pub fn eval(&mut self, terms: &[Term]) -> Result<Float, EvalError> {
        if self.mode == Mode::Roll {
            check_rolled_dice(terms, self.max_rolled_dice)?;
        }
        match fold(terms, self)? {
            None => Ok(0.0),
            Some(values) if values.len() == 1 => Ok(*values.first()),
            Some(values) => Err(EvalError::LeftoverOperands(values.len())),
        }
    }
}

impl<R: Roller> Combine for Evaluator<'_, R> {
    type Value = Float;
    type Error = EvalError;

    fn visit_dice(&mut self, dice: &DiceTerm) -> Result<Float, EvalError> {
        Ok(match self.mode {
            Mode::Min => dice.min(),
            Mode::Max => dice.max(),
            Mode::Average => dice.average(),
            Mode::Roll => self.roller.roll_dice(dice).map(Float::from).sum(),
        })
    }

    fn visit_number(&mut self, number: &NumberTerm) -> Result<Float, EvalError> {
        Ok(number.value)
    }

    fn combine(&mut self, op: BinaryOperator, lhs: Float, rhs: Float) -> Result<Float, EvalError> {
        Ok(op.apply(lhs, rhs))
    }
}

/// Evaluates a term sequence to a single number.
///
/// An empty sequence evaluates to `0`. Division by zero does not fail; it
/// yields NaN, which carries through the rest of the formula.
///
/// # Errors
/// Returns an [`EvalError`] if the sequence is not a well-formed expression,
/// which cannot happen for sequences produced by [`tokenize`](crate::tokenize),
/// or if [`Mode::Roll`] would roll more than
/// [`Limits::DEFAULT_MAX_ROLLED_DICE`] dice.
pub fn evaluate(terms: &[Term], mode: Mode) -> Result<Float, EvalError> {
    evaluate_with(terms, mode, &mut rand::thread_rng())
}

/// [`evaluate`] with an explicit source of randomness for [`Mode::Roll`].
///
/// # Errors
/// See [`evaluate`].
pub fn evaluate_with<R: Roller>(
    terms: &[Term],
    mode: Mode,
    roller: &mut R,
) -> Result<Float, EvalError> {
    Evaluator::new(mode, roller).eval(terms)
}
