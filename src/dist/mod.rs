mod distribution;

pub use distribution::{Distribution, Outcome, Probability, ProbabilityExt};

use crate::common::*;
use crate::eval::{fold, Combine, EvalError};
use crate::limits::Limits;
use crate::term::*;
use log::{debug, warn};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistError {
    #[error("formula rolls {total} dice, more than the {max} allowed")]
    TooManyDice { total: usize, max: usize },
    #[error("distribution would need more than {max} outcome pairs")]
    TooManyOutcomes { max: usize },
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl DistError {
    /// Whether the distribution was refused for its size rather than failing.
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::TooManyDice { .. } | Self::TooManyOutcomes { .. })
    }
}

/// Builds distributions for the terms of a formula and convolves them.
pub struct DistributionEngine<'l> {
    limits: &'l Limits,
}

impl<'l> DistributionEngine<'l> {
    pub fn new(limits: &'l Limits) -> Self {
        Self { limits }
    }

    /// # Errors
    /// Refuses formulas over the configured limits and fails on malformed
    /// term sequences.
    pub fn distribution(&mut self, terms: &[Term]) -> Result<Distribution, DistError> {
        let total = total_dice(terms);
        if total > self.limits.max_dice {
            return Err(DistError::TooManyDice {
                total,
                max: self.limits.max_dice,
            });
        }

        let values = match fold(terms, self)? {
            Some(values) => values,
            None => return Ok(Distribution::default()),
        };
        if values.len() > 1 {
            debug!(
                "{} sub-distributions left over, keeping the last",
                values.len()
            );
        }
        let ret = values.into_vec().pop().unwrap_or_default();
        debug!("distribution has {} outcomes", ret.len());
        Ok(ret)
    }
}

impl Combine for DistributionEngine<'_> {
    type Value = Distribution;
    type Error = DistError;

    fn visit_dice(&mut self, dice: &DiceTerm) -> Result<Distribution, DistError> {
        Distribution::dice(dice, self.limits)
    }

    fn visit_number(&mut self, number: &NumberTerm) -> Result<Distribution, DistError> {
        Ok(Distribution::point(number.value))
    }

    fn combine(
        &mut self,
        op: BinaryOperator,
        lhs: Distribution,
        rhs: Distribution,
    ) -> Result<Distribution, DistError> {
        lhs.combine(op, &rhs, self.limits)
    }
}

/// Exact, unnormalized distribution of a formula under `limits`.
///
/// # Errors
/// See [`DistributionEngine::distribution`].
pub fn distribution(terms: &[Term], limits: &Limits) -> Result<Distribution, DistError> {
    DistributionEngine::new(limits).distribution(terms)
}

/// Probability of every outcome of a formula, ascending by value.
///
/// Empty when the formula is empty, rolls more than
/// [`Limits::DEFAULT_MAX_DICE`] dice, or cannot be evaluated.
pub fn compute_distribution(terms: &[Term]) -> Vec<Probability> {
    compute_distribution_with(terms, &Limits::default())
}

/// [`compute_distribution`] under explicit limits.
pub fn compute_distribution_with(terms: &[Term], limits: &Limits) -> Vec<Probability> {
    match distribution(terms, limits) {
        Ok(dist) => dist.probabilities(),
        Err(why) => {
            warn!("no distribution: {}", why);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::test_utils::*;

    const EPSILON: Float = 1e-9;

    fn probs(s: &str) -> Vec<Probability> {
        compute_distribution(&crate::tokenize(s).unwrap())
    }

    fn values(probs: &[Probability]) -> Vec<Float> {
        probs.iter().map(|p| p.value).collect()
    }

    fn sum(probs: &[Probability]) -> Float {
        probs.iter().map(|p| p.probability).sum()
    }

    fn check(s: &str, expected: &[(Float, Float)]) {
        let actual = probs(s);
        assert_eq!(actual.len(), expected.len(), "{}: {:?}", s, actual);
        for (p, &(value, probability)) in actual.iter().zip(expected) {
            assert!((p.value - value).abs() < EPSILON, "{}: {} != {}", s, p.value, value);
            assert!(
                (p.probability - probability).abs() < EPSILON,
                "{}: P({}) = {}, expected {}",
                s,
                value,
                p.probability,
                probability
            );
        }
    }

    #[test]
    fn test_two_d6() {
        let dist = probs("2d6");
        assert_eq!(values(&dist), (2..=12).map(Float::from).collect::<Vec<_>>());
        assert!((dist[5].probability - 6.0 / 36.0).abs() < EPSILON);
        assert!((sum(&dist) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_precedence() {
        // (1d2 * 2) + 1, not 1d2 * 3
        check("1d2*2+1", &[(3.0, 0.5), (5.0, 0.5)]);
        check("(1d2+1)*2", &[(4.0, 0.5), (6.0, 0.5)]);
        check("-1d2", &[(-2.0, 0.5), (-1.0, 0.5)]);
    }

    #[test]
    fn test_division_coalesces() {
        check(
            "1d3/3+1d3/3",
            &[
                (2.0 / 3.0, 1.0 / 9.0),
                (1.0, 2.0 / 9.0),
                (4.0 / 3.0, 3.0 / 9.0),
                (5.0 / 3.0, 2.0 / 9.0),
                (2.0, 1.0 / 9.0),
            ],
        );
    }

    #[test]
    fn test_division_by_zero_dropped() {
        check("6/(1d2-1)", &[(6.0, 1.0)]);
        assert!(probs("1d6/0").is_empty());
    }

    #[test]
    fn test_values_are_rounded() {
        assert_eq!(values(&probs("1d2+0.1+0.2")), vec![1.3, 2.3]);
        assert_eq!(values(&probs("0.1+0.2")), vec![0.3]);
    }

    #[test]
    fn test_constant() {
        check("4", &[(4.0, 1.0)]);
        check("(1+2)*3", &[(9.0, 1.0)]);
    }

    #[test]
    fn test_empty() {
        assert!(probs("").is_empty());
    }

    #[test]
    fn test_too_many_dice() {
        assert!(probs("9d6").is_empty());
        assert!(probs("4d6+5d4").is_empty());
        assert!(!probs("4d6+4d4").is_empty());
        assert_eq!(
            distribution(&crate::tokenize("9d6").unwrap(), &Limits::default()),
            Err(DistError::TooManyDice { total: 9, max: 8 })
        );
    }

    #[test]
    fn test_custom_limits() {
        let terms = crate::tokenize("9d6").unwrap();
        let probs = compute_distribution_with(&terms, &Limits::new(10, 1_000_000));
        assert_eq!(probs.len(), 46);
        assert!((sum(&probs) - 1.0).abs() < EPSILON);

        let terms = crate::tokenize("1d100000*1d100").unwrap();
        let err = distribution(&terms, &Limits::default()).unwrap_err();
        assert!(err.is_refusal());
    }

    #[test]
    fn test_leftover_operands() {
        let terms = [num(1.0), num(2.0)];
        let dist = distribution(&terms, &Limits::default()).unwrap();
        assert_eq!(dist.iter().collect::<Vec<_>>(), vec![(2.0, 1.0)]);
    }

    #[test]
    fn test_malformed() {
        let terms = [open(), dice(1, 6)];
        assert_eq!(
            distribution(&terms, &Limits::default()),
            Err(DistError::Eval(EvalError::MismatchedParenthesis))
        );
        assert!(compute_distribution(&terms).is_empty());
    }
}
