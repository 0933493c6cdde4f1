//! Statistics for tabletop dice formulas such as `2d6*2+1d10` or `(1d6+4)/2`.
//!
//! A formula is first [tokenized](tokenize) into a flat sequence of [`Term`]s,
//! which then feeds [`compute_stats`], [`simulate_roll`] and
//! [`compute_distribution`].

mod common;
mod dist;
mod error;
mod eval;
mod limits;
mod parse;
mod summary;
mod term;

#[cfg(test)]
mod formula_test_strategies;

pub use common::{BinaryOperator, Float, UInt, UnaryOperator};
pub use dist::{
    compute_distribution, compute_distribution_with, distribution, DistError, Distribution,
    DistributionEngine, Probability, ProbabilityExt,
};
pub use error::Error;
pub use eval::{
    compute_stats, evaluate, evaluate_with, fold, simulate_roll, simulate_roll_with, Combine,
    DefaultRoller, DieRoll, EvalError, Evaluator, Mode, RollResult, Roller, Stats,
};
pub use limits::Limits;
pub use parse::{normalize, tokenize, ParseError, ParseErrorKind, Tokenizer};
pub use summary::Summary;
pub use term::{
    total_dice, DiceTerm, DisplayTerms, Lexeme, NumberTerm, OperatorTerm, ParenTerm, Term,
    TermClass,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula_test_strategies::*;
    use proptest::prelude::*;

    const EPSILON: Float = 1e-9;

    fn stats(s: &str) -> Stats {
        compute_stats(&tokenize(s).unwrap())
    }

    #[test]
    fn test_two_d6() {
        let terms = tokenize("2d6").unwrap();
        assert_eq!(
            compute_stats(&terms),
            Stats {
                min: 2.0,
                max: 12.0,
                average: 7.0,
                average_floored: 7.0
            }
        );
        let dist = compute_distribution(&terms);
        let support: Vec<_> = dist.iter().map(|p| p.value).collect();
        assert_eq!(support, (2..=12).map(Float::from).collect::<Vec<_>>());
        assert!((dist[5].probability - 6.0 / 36.0).abs() < EPSILON);
    }

    #[test]
    fn test_stats_examples() {
        let s = stats("3d8+4");
        assert_eq!((s.min, s.max, s.average), (7.0, 28.0, 17.5));
        let s = stats("2d6*2+1d10");
        assert_eq!((s.min, s.max), (5.0, 34.0));
        let s = stats("(1d6+4)/2");
        assert_eq!((s.min, s.max), (2.5, 5.0));
    }

    #[test]
    fn test_rejected() {
        for s in ["2d6++3", "(1d6+4", "1d0", "d6 d6"] {
            assert!(tokenize(s).is_err(), "{}", s);
        }
    }

    #[test]
    fn test_too_many_dice() {
        let terms = tokenize("9d6").unwrap();
        assert!(compute_distribution(&terms).is_empty());
        assert_eq!(compute_stats(&terms).max, 54.0);
    }

    #[test]
    fn test_empty_formula() {
        let terms = tokenize("   ").unwrap();
        assert!(terms.is_empty());
        assert_eq!(compute_stats(&terms), Stats::default());
        assert!(compute_distribution(&terms).is_empty());
        assert_eq!(simulate_roll(&terms).total, 0.0);
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = tokenize("1d0").unwrap_err().into();
        assert!(matches!(err, Error::InvalidFormula(_)));
        let err: Error = EvalError::MissingOperand.into();
        assert_eq!(err, Error::EvaluationFailure(EvalError::MissingOperand));
    }

    proptest! {
        #[test]
        fn test_tokenize_is_deterministic(formula in formula_strategy()) {
            let first = tokenize(&formula);
            prop_assert!(first.is_ok(), "{}: {:?}", formula, first);
            prop_assert_eq!(first, tokenize(&formula));
        }

        #[test]
        fn test_display_round_trip(formula in formula_strategy()) {
            let terms = tokenize(&formula).unwrap();
            let shown = DisplayTerms(&terms).to_string();
            prop_assert_eq!(tokenize(&shown).unwrap(), terms);
        }

        #[test]
        fn test_roll_within_stats(formula in dice_with_modifier_strategy()) {
            let terms = tokenize(&formula).unwrap();
            let stats = compute_stats(&terms);
            let roll = simulate_roll(&terms);
            prop_assert!(stats.min <= roll.total && roll.total <= stats.max);
        }

        #[test]
        fn test_average_of_dice(count in 1usize..=100, sides in 1u32..=1000) {
            let terms = tokenize(&format!("{}d{}", count, sides)).unwrap();
            let expected = count as Float * (Float::from(sides) + 1.0) / 2.0;
            prop_assert!((compute_stats(&terms).average - expected).abs() < EPSILON);
        }

        #[test]
        fn test_distribution_sums_to_one(formula in small_formula_strategy()) {
            let terms = tokenize(&formula).unwrap();
            let dist = compute_distribution(&terms);
            if !dist.is_empty() {
                let total: Float = dist.iter().map(|p| p.probability).sum();
                prop_assert!((total - 1.0).abs() < 1e-6, "{}: {}", formula, total);
                prop_assert!(dist.windows(2).all(|w| w[0].value < w[1].value));
            }
        }
    }
}
