use super::error::{PResult, ParseError, ParseErrorKind};
use super::lexer::*;
use crate::common::*;
use crate::term::*;
use log::trace;
use std::ops::Range;

/// Turns a normalized formula into a validated term sequence.
///
/// Signs are folded while lexing: a `+` or `-` is a sign when it starts the
/// formula, follows `(`, or follows `*` or `/`. After `+` or `-` only a `-` is
/// a sign, so `1d20+-1` folds while `2d6++3` is an error.
pub struct Tokenizer<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    terms: Vec<Term>,
    depth: usize,
}

impl<'a> Tokenizer<'a> {
    const OPERAND_START: [&'static str; 3] = ["<number>", "<dice>", "'('"];

    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lexer: lexer(source),
            terms: Vec::new(),
            depth: 0,
        }
    }

    pub fn tokenize(mut self) -> PResult<Vec<Term>> {
        while let Some(kind) = self.advance() {
            self.token(kind)?;
        }
        self.finish()
    }

    fn advance(&mut self) -> Option<TokenKind> {
        let kind = self.lexer.next()?;
        trace!("lexed {} at {:?}", kind, self.lexer.span());
        Some(kind)
    }

    fn error<T>(&self, kind: ParseErrorKind) -> PResult<T> {
        Err(ParseError {
            kind,
            span: self.lexer.span(),
            slice: self.lexer.slice().to_string(),
        })
    }

    fn error_at<T>(&self, kind: ParseErrorKind, span: Range<usize>) -> PResult<T> {
        Err(ParseError {
            kind,
            slice: self.source.get(span.clone()).unwrap_or_default().to_string(),
            span,
        })
    }

    fn error_at_end<T>(&self, kind: ParseErrorKind) -> PResult<T> {
        let end = self.source.len();
        self.error_at(kind, end..end)
    }

    fn expected() -> NonEmpty<&'static str> {
        vec1![
            Self::OPERAND_START[0],
            Self::OPERAND_START[1],
            Self::OPERAND_START[2]
        ]
    }

    fn last_class(&self) -> Option<TermClass> {
        self.terms.last().map(Lexeme::class)
    }

    fn accepts_sign(&self, kind: TokenKind) -> bool {
        match self.terms.last() {
            None | Some(Term::Paren(ParenTerm::Open)) => true,
            Some(Term::Operator(operator)) => {
                operator.op.is_multiplicative() || kind == TokenKind::Minus
            }
            Some(Term::Dice(_) | Term::Number(_) | Term::Paren(ParenTerm::Close)) => false,
        }
    }

    fn token(&mut self, kind: TokenKind) -> PResult<()> {
        match kind {
            TokenKind::Plus | TokenKind::Minus if self.accepts_sign(kind) => match kind.as_unary_op() {
                Some(sign) => self.signed(sign),
                None => self.error(ParseErrorKind::UnrecognizedInput),
            },
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash => {
                match kind.as_binary_op() {
                    Some(op) => self.operator(op),
                    None => self.error(ParseErrorKind::UnrecognizedInput),
                }
            }
            TokenKind::Number(value) => self.operand(NumberTerm::new(value).into()),
            TokenKind::Dice => {
                let dice = self.dice()?;
                self.operand(dice.into())
            }
            TokenKind::LeftParen => self.open(),
            TokenKind::RightParen => self.close(),
            TokenKind::Error => self.error(ParseErrorKind::UnrecognizedInput),
        }
    }

    /// Handles the operand following a sign, folding the sign into it.
    fn signed(&mut self, sign: UnaryOperator) -> PResult<()> {
        match self.advance() {
            Some(TokenKind::Number(value)) => self.operand(NumberTerm::new(sign.apply(value)).into()),
            Some(TokenKind::Dice) => {
                let dice = self.dice()?;
                self.coefficient(sign);
                self.operand(dice.into())
            }
            Some(TokenKind::LeftParen) => {
                self.coefficient(sign);
                self.open()
            }
            Some(TokenKind::Error) => self.error(ParseErrorKind::UnrecognizedInput),
            Some(TokenKind::RightParen) => self.error(ParseErrorKind::TrailingOperator),
            Some(_) => self.error(ParseErrorKind::AdjacentOperators {
                expected: Self::expected(),
            }),
            None => self.error_at_end(ParseErrorKind::TrailingOperator),
        }
    }

    fn coefficient(&mut self, sign: UnaryOperator) {
        if sign == UnaryOperator::Neg {
            self.terms.push(NumberTerm::implied(sign.coefficient()).into());
            self.terms.push(OperatorTerm::new(BinaryOperator::Mul).into());
        }
    }

    fn dice(&self) -> PResult<DiceTerm> {
        match parse_dice(self.lexer.slice()) {
            Some(dice) => Ok(dice),
            None => self.error(ParseErrorKind::InvalidDice),
        }
    }

    fn operand(&mut self, term: Term) -> PResult<()> {
        match self.last_class() {
            Some(TermClass::Operand | TermClass::Close) => {
                self.error(ParseErrorKind::AdjacentOperands)
            }
            None | Some(TermClass::Operator | TermClass::Open) => {
                self.terms.push(term);
                Ok(())
            }
        }
    }

    fn operator(&mut self, op: BinaryOperator) -> PResult<()> {
        match self.last_class() {
            None | Some(TermClass::Open) => {
                return self.error(ParseErrorKind::LeadingOperator {
                    expected: Self::expected(),
                })
            }
            Some(TermClass::Operator) => {
                return self.error(ParseErrorKind::AdjacentOperators {
                    expected: Self::expected(),
                })
            }
            Some(TermClass::Operand | TermClass::Close) => {}
        }
        let span = self.lexer.span();
        if self.lexer.peek().is_none() {
            return self.error_at(ParseErrorKind::TrailingOperator, span);
        }
        self.terms.push(OperatorTerm::new(op).into());
        Ok(())
    }

    fn open(&mut self) -> PResult<()> {
        self.operand(ParenTerm::Open.into())?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) -> PResult<()> {
        if self.depth == 0 {
            return self.error(ParseErrorKind::UnbalancedParenthesis);
        }
        match self.last_class() {
            Some(TermClass::Open) => return self.error(ParseErrorKind::EmptyParentheses),
            Some(TermClass::Operator) => return self.error(ParseErrorKind::TrailingOperator),
            None | Some(TermClass::Operand | TermClass::Close) => {}
        }
        self.depth -= 1;
        self.terms.push(ParenTerm::Close.into());
        Ok(())
    }

    fn finish(self) -> PResult<Vec<Term>> {
        if self.depth != 0 {
            return self.error_at_end(ParseErrorKind::UnbalancedParenthesis);
        }
        Ok(self.terms)
    }
}

/// Parses `<count>d<sides>`; the count defaults to one.
fn parse_dice(s: &str) -> Option<DiceTerm> {
    let (count, sides) = s.split_once('d')?;
    let count = if count.is_empty() {
        1
    } else {
        count.parse().ok()?
    };
    DiceTerm::new(count, sides.parse().ok()?)
}
