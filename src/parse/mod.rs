mod error;
mod lexer;
mod tokenizer;

pub use error::{ParseError, ParseErrorKind};
pub use tokenizer::Tokenizer;

use crate::term::Term;
use log::debug;

/// Strips whitespace and lower-cases a raw formula.
pub fn normalize(formula: &str) -> String {
    formula
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Converts a formula into its term sequence.
///
/// Whitespace-only input is valid and gives an empty sequence.
///
/// # Errors
/// Returns a [`ParseError`] when the formula is malformed.
///
/// # Examples
/// ```
/// let terms = dice_stats::tokenize("2d6 + 4").unwrap();
/// assert_eq!(terms.len(), 3);
/// assert!(dice_stats::tokenize("2d6++4").is_err());
/// ```
pub fn tokenize(formula: &str) -> Result<Vec<Term>, ParseError> {
    let source = normalize(formula);
    let terms = Tokenizer::new(&source).tokenize()?;
    debug!("tokenized {:?} into {} terms", source, terms.len());
    Ok(terms)
}
