mod error;
mod fold;
mod roller;
mod scalar;
mod simulate;
mod stats;

pub use error::EvalError;
pub use fold::{fold, Combine};
pub use roller::{DefaultRoller, Roller};
pub use scalar::{evaluate, evaluate_with, Evaluator, Mode};
pub use simulate::{simulate_roll, simulate_roll_with, DieRoll, RollResult};
pub use stats::{compute_stats, Stats};

#[cfg(test)]
pub(crate) use roller::FixedRoller;
