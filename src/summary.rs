use crate::dist::{self, DistError, Probability};
use crate::error::Result;
use crate::eval::{RollResult, Roller, Stats};
use crate::limits::Limits;
use crate::term::{DisplayTerms, Term};
use log::warn;
use std::fmt;

/// Everything the engine derives from one formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub terms: Vec<Term>,
    pub stats: Stats,
    pub roll: RollResult,
    /// Empty when the formula is over the distribution limits.
    pub distribution: Vec<Probability>,
}

impl Summary {
    /// Tokenizes `formula` once and computes stats, a roll and the distribution.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormula`](crate::Error::InvalidFormula) for
    /// malformed formulas.
    pub fn of(formula: &str) -> Result<Self> {
        Self::with(formula, &Limits::default(), &mut rand::thread_rng())
    }

    /// [`Summary::of`] with explicit limits and source of randomness.
    ///
    /// # Errors
    /// See [`Summary::of`].
    pub fn with<R: Roller>(formula: &str, limits: &Limits, roller: &mut R) -> Result<Self> {
        let terms = crate::parse::tokenize(formula)?;
        let stats = Stats::try_from_terms(&terms)?;
        let roll = match RollResult::try_roll(&terms, roller, limits) {
            Ok(roll) => roll,
            Err(why) if why.is_refusal() => {
                warn!("skipping roll: {}", why);
                RollResult::default()
            }
            Err(why) => return Err(why.into()),
        };
        let distribution = match dist::distribution(&terms, limits) {
            Ok(dist) => dist.probabilities(),
            Err(DistError::Eval(why)) => return Err(why.into()),
            Err(why) => {
                warn!("skipping distribution: {}", why);
                Vec::new()
            }
        };
        Ok(Self {
            terms,
            stats,
            roll,
            distribution,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", DisplayTerms(&self.terms))?;
        writeln!(f, "{}", self.stats)?;
        write!(f, "rolled {}", self.roll)
    }
}
