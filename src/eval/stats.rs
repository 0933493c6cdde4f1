use super::error::EvalError;
use super::roller::DefaultRoller;
use super::scalar::{Evaluator, Mode};
use crate::common::Float;
use crate::term::Term;
use log::warn;
use std::fmt;

/// The deterministic quantities of a formula.
///
/// `min` and `max` resolve every die to 1 or to its highest face at once, so
/// they bound the rolls only when no die is subtracted from another: `1d6-1d6`
/// has min and max 0 but rolls anywhere in `-5..=5`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub min: Float,
    pub max: Float,
    pub average: Float,
    pub average_floored: Float,
}

impl Stats {
    /// # Errors
    /// Returns an [`EvalError`] for malformed term sequences.
    pub fn try_from_terms(terms: &[Term]) -> Result<Self, EvalError> {
        // deterministic modes never touch the roller
        let mut roller = rand::thread_rng();
        let mut eval = |mode| Evaluator::<DefaultRoller>::new(mode, &mut roller).eval(terms);

        let lo = eval(Mode::Min)?;
        let hi = eval(Mode::Max)?;
        let average = eval(Mode::Average)?;

        // a negated dice term makes the all-ones resolution the larger one;
        // mixed signs as in `1d6-1d6` are not bounded by either resolution
        let (min, max) = if hi < lo { (hi, lo) } else { (lo, hi) };
        Ok(Self {
            min,
            max,
            average,
            average_floored: average.floor(),
        })
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min {}, max {}, average {} (floored {})",
            self.min, self.max, self.average, self.average_floored
        )
    }
}

/// Minimum, maximum, average and floored average of a formula.
///
/// Malformed term sequences give all zeros.
pub fn compute_stats(terms: &[Term]) -> Stats {
    Stats::try_from_terms(terms).unwrap_or_else(|why| {
        warn!("could not compute stats: {}", why);
        Stats::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::test_utils::*;

    fn stats(s: &str) -> Stats {
        compute_stats(&crate::tokenize(s).unwrap())
    }

    fn check(s: &str, min: Float, max: Float, average: Float, average_floored: Float) {
        assert_eq!(
            stats(s),
            Stats {
                min,
                max,
                average,
                average_floored
            },
            "{}",
            s
        );
    }

    #[test]
    fn test_stats() {
        check("2d6", 2.0, 12.0, 7.0, 7.0);
        check("3d8+4", 7.0, 28.0, 17.5, 17.0);
        check("2d6*2+1d10", 5.0, 34.0, 19.5, 19.0);
        check("(1d6+4)/2", 2.5, 5.0, 3.75, 3.0);
        check("1d20", 1.0, 20.0, 10.5, 10.0);
    }

    #[test]
    fn test_stats_empty() {
        check("", 0.0, 0.0, 0.0, 0.0);
    }

    #[test]
    fn test_stats_negated_dice() {
        check("-1d6", -6.0, -1.0, -3.5, -4.0);
    }

    #[test]
    fn test_stats_subtracted_dice() {
        check("1d6-1d6", 0.0, 0.0, 0.0, 0.0);
        check("2d4-1d6", 1.0, 2.0, 1.5, 1.0);
    }

    #[test]
    fn test_stats_many_dice() {
        check("9d6", 9.0, 54.0, 31.5, 31.0);
    }

    #[test]
    fn test_stats_malformed() {
        assert_eq!(compute_stats(&[num(1.0), num(2.0)]), Stats::default());
        assert_eq!(compute_stats(&[close()]), Stats::default());
    }
}
