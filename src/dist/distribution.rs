use super::DistError;
use crate::common::*;
use crate::limits::Limits;
use crate::term::DiceTerm;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Decimal digits kept in outcome values, so that e.g. `1/3 + 1/3` and `2/3`
/// land in the same bucket.
const OUTCOME_DIGITS: i32 = 9;

/// Past this magnitude an `f64` has no fractional digits left to round.
const EXACT_LIMIT: Float = 9_007_199.0;

/// An outcome value rounded for use as a bucket key.
#[derive(Debug, Copy, Clone)]
pub struct Outcome(Float);

impl Outcome {
    pub fn new(value: Float) -> Self {
        let value = if value.abs() < EXACT_LIMIT {
            let scale = Float::powi(10.0, OUTCOME_DIGITS);
            (value * scale).round() / scale
        } else {
            value
        };
        // folds -0.0 into 0.0
        Self(value + 0.0)
    }

    pub fn value(self) -> Float {
        self.0
    }
}

impl PartialEq for Outcome {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Outcome {}

impl PartialOrd for Outcome {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Outcome {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// One entry of a normalized distribution.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Probability {
    pub value: Float,
    pub probability: Float,
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.4}%", self.value, self.probability * 100.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Bucket {
    /// First unrounded value that landed in the bucket. Only used as an operand
    /// of later arithmetic, so rounding errors do not accumulate; reported
    /// values are the rounded keys.
    exact: Float,
    count: Float,
}

/// Unnormalized probability mass function: outcome → multiplicity.
///
/// Multiplicities are kept as floats since products of face counts quickly
/// overflow any integer type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    buckets: BTreeMap<Outcome, Bucket>,
}

impl Distribution {
    /// All weight on a single value.
    pub fn point(value: Float) -> Self {
        let mut ret = Self::default();
        ret.add(value, 1.0);
        ret
    }

    /// Exact distribution of the sum of `dice`, by folding in one die at a time.
    ///
    /// # Errors
    /// Refuses with [`DistError::TooManyOutcomes`] when one fold step would
    /// visit more than `limits.max_outcomes` pairs.
    pub fn dice(dice: &DiceTerm, limits: &Limits) -> Result<Self, DistError> {
        let sides = dice.sides();
        let mut ret = Self::point(0.0);
        for _ in 0..dice.count() {
            check_work(ret.len(), sides as usize, limits)?;
            let mut next = Self::default();
            for (sum, count) in ret.exact() {
                for face in 1..=sides {
                    next.add(sum + Float::from(face), count);
                }
            }
            ret = next;
        }
        Ok(ret)
    }

    /// Convolution of `self` and `rhs` under `op`.
    ///
    /// Pairs whose result is undefined (division by zero) are dropped.
    ///
    /// # Errors
    /// Refuses with [`DistError::TooManyOutcomes`] when the product of the two
    /// supports exceeds `limits.max_outcomes`.
    pub fn combine(&self, op: BinaryOperator, rhs: &Self, limits: &Limits) -> Result<Self, DistError> {
        check_work(self.len(), rhs.len(), limits)?;
        let mut ret = Self::default();
        for (lhs_value, lhs_count) in self.exact() {
            for (rhs_value, rhs_count) in rhs.exact() {
                if let Some(value) = op.checked_apply(lhs_value, rhs_value) {
                    ret.add(value, lhs_count * rhs_count);
                }
            }
        }
        Ok(ret)
    }

    fn add(&mut self, value: Float, count: Float) {
        self.buckets
            .entry(Outcome::new(value))
            .or_insert(Bucket {
                exact: value,
                count: 0.0,
            })
            .count += count;
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_count(&self) -> Float {
        self.buckets.values().map(|bucket| bucket.count).sum()
    }

    /// Outcomes, rounded to nine decimal digits, and their multiplicities,
    /// ascending by outcome.
    pub fn iter(&self) -> impl Iterator<Item = (Float, Float)> + '_ {
        self.buckets
            .iter()
            .map(|(outcome, bucket)| (outcome.value(), bucket.count))
    }

    fn exact(&self) -> impl Iterator<Item = (Float, Float)> + '_ {
        self.buckets
            .values()
            .map(|bucket| (bucket.exact, bucket.count))
    }

    /// Normalizes into probabilities, ascending by value, without zero entries.
    pub fn probabilities(&self) -> Vec<Probability> {
        let total = self.total_count();
        if total <= 0.0 {
            return Vec::new();
        }
        self.iter()
            .filter(|&(_, count)| count > 0.0)
            .map(|(value, count)| Probability {
                value,
                probability: count / total,
            })
            .collect()
    }
}

fn check_work(lhs: usize, rhs: usize, limits: &Limits) -> Result<(), DistError> {
    match lhs.checked_mul(rhs) {
        Some(work) if work <= limits.max_outcomes => Ok(()),
        _ => Err(DistError::TooManyOutcomes {
            max: limits.max_outcomes,
        }),
    }
}

/// Summaries over a normalized distribution.
pub trait ProbabilityExt {
    /// Expected value.
    fn mean(&self) -> Float;

    /// `P(X <= value)` for every value.
    fn cumulative(&self) -> Vec<Probability>;

    /// `P(X >= value)` for every value.
    fn at_least(&self) -> Vec<Probability>;
}

impl ProbabilityExt for [Probability] {
    fn mean(&self) -> Float {
        self.iter().map(|p| p.value * p.probability).sum()
    }

    fn cumulative(&self) -> Vec<Probability> {
        let mut acc: Float = 0.0;
        self.iter()
            .map(|p| {
                acc += p.probability;
                Probability {
                    value: p.value,
                    probability: acc.min(1.0),
                }
            })
            .collect()
    }

    fn at_least(&self) -> Vec<Probability> {
        let mut acc: Float = 0.0;
        let mut ret: Vec<_> = self
            .iter()
            .rev()
            .map(|p| {
                acc += p.probability;
                Probability {
                    value: p.value,
                    probability: acc.min(1.0),
                }
            })
            .collect();
        ret.reverse();
        ret
    }
}
