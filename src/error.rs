use crate::eval::EvalError;
use crate::parse::ParseError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid formula: {0}")]
    InvalidFormula(#[from] ParseError),
    #[error("evaluation failed: {0}")]
    EvaluationFailure(#[from] EvalError),
}

pub type Result<T> = std::result::Result<T, Error>;
