use super::error::EvalError;
use crate::common::{BinaryOperator, NonEmpty};
use crate::term::*;

/// Value type and operations driven by [`fold`].
///
/// The scalar evaluator, the roll simulation and the distribution engine all
/// share the same precedence handling and differ only in these hooks.
pub trait Combine {
    type Value;
    type Error: From<EvalError>;

    fn visit_dice(&mut self, dice: &DiceTerm) -> Result<Self::Value, Self::Error>;

    fn visit_number(&mut self, number: &NumberTerm) -> Result<Self::Value, Self::Error>;

    fn combine(
        &mut self,
        op: BinaryOperator,
        lhs: Self::Value,
        rhs: Self::Value,
    ) -> Result<Self::Value, Self::Error>;
}

#[derive(Debug, Copy, Clone)]
enum Pending {
    Barrier,
    Op(BinaryOperator),
}

/// Shunting-yard fold over a term sequence.
///
/// Returns every operand left on the value stack, in order; a well-formed
/// sequence leaves exactly one. An empty sequence gives `None`.
pub fn fold<C: Combine + ?Sized>(
    terms: &[Term],
    c: &mut C,
) -> Result<Option<NonEmpty<C::Value>>, C::Error> {
    let mut values = Vec::new();
    let mut ops = Vec::new();

    for term in terms {
        match term {
            Term::Dice(dice) => values.push(c.visit_dice(dice)?),
            Term::Number(number) => values.push(c.visit_number(number)?),
            Term::Operator(OperatorTerm { op }) => {
                while let Some(&Pending::Op(top)) = ops.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    ops.pop();
                    reduce(c, &mut values, top)?;
                }
                ops.push(Pending::Op(*op));
            }
            Term::Paren(ParenTerm::Open) => ops.push(Pending::Barrier),
            Term::Paren(ParenTerm::Close) => loop {
                match ops.pop() {
                    Some(Pending::Barrier) => break,
                    Some(Pending::Op(op)) => reduce(c, &mut values, op)?,
                    None => return Err(EvalError::MismatchedParenthesis.into()),
                }
            },
        }
    }

    while let Some(pending) = ops.pop() {
        match pending {
            Pending::Op(op) => reduce(c, &mut values, op)?,
            Pending::Barrier => return Err(EvalError::MismatchedParenthesis.into()),
        }
    }

    Ok(NonEmpty::try_from_vec(values).ok())
}

fn reduce<C: Combine + ?Sized>(
    c: &mut C,
    values: &mut Vec<C::Value>,
    op: BinaryOperator,
) -> Result<(), C::Error> {
    let rhs = values.pop();
    let lhs = values.pop();
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => {
            values.push(c.combine(op, lhs, rhs)?);
            Ok(())
        }
        _ => Err(EvalError::MissingOperand.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Float;
    use crate::term::test_utils::*;

    /// Renders the fold as a fully parenthesized string.
    struct Show;

    impl Combine for Show {
        type Value = String;
        type Error = EvalError;

        fn visit_dice(&mut self, dice: &DiceTerm) -> Result<String, EvalError> {
            Ok(dice.to_string())
        }

        fn visit_number(&mut self, number: &NumberTerm) -> Result<String, EvalError> {
            Ok(number.to_string())
        }

        fn combine(&mut self, op: BinaryOperator, l: String, r: String) -> Result<String, EvalError> {
            Ok(format!("({}{}{})", l, op, r))
        }
    }

    fn show(terms: &[Term]) -> Result<Vec<String>, EvalError> {
        Ok(fold(terms, &mut Show)?.map_or_else(Vec::new, NonEmpty::into_vec))
    }

    fn check(s: &str, expected: &str) {
        let terms = crate::parse::tokenize(s).unwrap();
        assert_eq!(show(&terms).unwrap(), vec![expected.to_string()]);
    }

    #[test]
    fn test_fold_precedence() {
        check("1+2*3", "(1+(2*3))");
        check("1*2+3", "((1*2)+3)");
        check("2d6*2+1d10", "((2d6*2)+1d10)");
    }

    #[test]
    fn test_fold_left_associative() {
        check("1-2-3", "((1-2)-3)");
        check("8/4/2", "((8/4)/2)");
        check("1-2+3", "((1-2)+3)");
    }

    #[test]
    fn test_fold_parens() {
        check("(1d6+4)/2", "((1d6+4)/2)");
        check("2*(1+(3-1))", "(2*(1+(3-1)))");
        check("-(1d6+1)", "(-1*(1d6+1))");
    }

    #[test]
    fn test_fold_empty() {
        assert_eq!(show(&[]).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_fold_leftover() {
        let terms = [num(1.0), num(2.0), op(Add), num(3.0)];
        assert_eq!(show(&terms).unwrap(), vec!["1", "(2+3)"]);
    }

    #[test]
    fn test_fold_errors() {
        assert_eq!(
            show(&[num(1.0), close()]),
            Err(EvalError::MismatchedParenthesis)
        );
        assert_eq!(
            show(&[open(), num(1.0)]),
            Err(EvalError::MismatchedParenthesis)
        );
        assert_eq!(show(&[num(1.0), op(Add)]), Err(EvalError::MissingOperand));
        assert_eq!(show(&[op(Mul)]), Err(EvalError::MissingOperand));
    }

    #[test]
    fn test_fold_value_type() {
        struct Sum;

        impl Combine for Sum {
            type Value = Float;
            type Error = EvalError;

            fn visit_dice(&mut self, dice: &DiceTerm) -> Result<Float, EvalError> {
                Ok(dice.max())
            }

            fn visit_number(&mut self, number: &NumberTerm) -> Result<Float, EvalError> {
                Ok(number.value)
            }

            fn combine(&mut self, op: BinaryOperator, l: Float, r: Float) -> Result<Float, EvalError> {
                Ok(op.apply(l, r))
            }
        }

        let terms = [dice(2, 6), op(Mul), num(2.0)];
        let values = fold(&terms, &mut Sum).unwrap().unwrap();
        assert_eq!(*values.first(), 24.0);
    }
}
