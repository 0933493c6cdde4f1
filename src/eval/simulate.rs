use super::error::{check_rolled_dice, EvalError};
use super::fold::{fold, Combine};
use super::roller::Roller;
use crate::common::*;
use crate::limits::Limits;
use crate::term::*;
use log::{debug, warn};
use std::fmt;

/// The face shown by one die of a simulated roll.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DieRoll {
    pub value: UInt,
    pub sides: UInt,
}

/// One random realization of a formula.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollResult {
    pub total: Float,
    /// Every die rolled, in formula order.
    pub rolls: Vec<DieRoll>,
    /// Sum of the constants written in the formula, regardless of the
    /// operators applied to them.
    pub modifier: Float,
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, roll) in self.rolls.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} (d{})", roll.value, roll.sides)?;
        }
        write!(f, "] {:+} = {}", self.modifier, self.total)
    }
}

struct Simulation<'r, R> {
    roller: &'r mut R,
    rolls: Vec<DieRoll>,
    modifier: Float,
}

impl<R: Roller> Combine for Simulation<'_, R> {
    type Value = Float;
    type Error = EvalError;

    fn visit_dice(&mut self, dice: &DiceTerm) -> Result<Float, EvalError> {
        let sides = dice.sides();
        let start = self.rolls.len();
        self.rolls
            .extend(self.roller.roll_dice(dice).map(|value| DieRoll { value, sides }));
        Ok(self.rolls[start..]
            .iter()
            .map(|roll| Float::from(roll.value))
            .sum())
    }

    fn visit_number(&mut self, number: &NumberTerm) -> Result<Float, EvalError> {
        if !number.implied {
            self.modifier += number.value;
        }
        Ok(number.value)
    }

    fn combine(&mut self, op: BinaryOperator, lhs: Float, rhs: Float) -> Result<Float, EvalError> {
        Ok(op.apply(lhs, rhs))
    }
}

impl RollResult {
    /// # Errors
    /// Returns an [`EvalError`] for malformed term sequences, or when the
    /// formula rolls more than `limits.max_rolled_dice` dice.
    pub fn try_roll<R: Roller>(
        terms: &[Term],
        roller: &mut R,
        limits: &Limits,
    ) -> Result<Self, EvalError> {
        check_rolled_dice(terms, limits.max_rolled_dice)?;
        let mut sim = Simulation {
            roller,
            rolls: Vec::new(),
            modifier: 0.0,
        };
        let total = match fold(terms, &mut sim)? {
            None => 0.0,
            Some(values) if values.len() == 1 => *values.first(),
            Some(values) => return Err(EvalError::LeftoverOperands(values.len())),
        };
        debug!("rolled {} dice for a total of {}", sim.rolls.len(), total);
        Ok(Self {
            total,
            rolls: sim.rolls,
            modifier: sim.modifier,
        })
    }
}

/// Rolls every die of a formula once with the thread-local generator.
///
/// Malformed term sequences, and formulas rolling more than
/// [`Limits::DEFAULT_MAX_ROLLED_DICE`] dice, give an empty result with a total
/// of zero.
pub fn simulate_roll(terms: &[Term]) -> RollResult {
    simulate_roll_with(terms, &mut rand::thread_rng())
}

/// [`simulate_roll`] with an explicit source of randomness.
pub fn simulate_roll_with<R: Roller>(terms: &[Term], roller: &mut R) -> RollResult {
    RollResult::try_roll(terms, roller, &Limits::default()).unwrap_or_else(|why| {
        warn!("could not simulate roll: {}", why);
        RollResult::default()
    })
}
