use crate::term::{total_dice, Term};
use thiserror::Error;

/// A failure while folding a term sequence.
///
/// The tokenizer rejects every formula that could cause a structural error,
/// so only [`EvalError::TooManyDice`] shows up for tokenized formulas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("mismatched parenthesis")]
    MismatchedParenthesis,
    #[error("operator is missing an operand")]
    MissingOperand,
    #[error("{0} operands were left without an operator")]
    LeftoverOperands(usize),
    #[error("formula rolls {total} dice, more than the {max} allowed")]
    TooManyDice { total: usize, max: usize },
}

impl EvalError {
    /// Whether the formula is well formed but too large to roll.
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::TooManyDice { .. })
    }
}

/// Refuses to roll more than `max` dice in total.
pub(crate) fn check_rolled_dice(terms: &[Term], max: usize) -> Result<(), EvalError> {
    let total = total_dice(terms);
    if total > max {
        return Err(EvalError::TooManyDice { total, max });
    }
    Ok(())
}
