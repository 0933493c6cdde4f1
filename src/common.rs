use std::fmt::{self, Write};
use std::num::{NonZeroU32, NonZeroUsize};

pub use vec1::vec1;

pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type Float = f64;

/// The type used for the number of dice in a single term.
pub type Num = NonZeroUsize;

pub type NonEmpty<T> = vec1::Vec1<T>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnaryOperator {
    Pos,
    Neg,
}

impl UnaryOperator {
    pub const fn coefficient(self) -> Float {
        match self {
            Self::Pos => 1.0,
            Self::Neg => -1.0,
        }
    }

    pub fn apply(self, x: Float) -> Float {
        match self {
            Self::Pos => x,
            Self::Neg => -x,
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Pos => '+',
            Self::Neg => '-',
        };
        f.write_char(c)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    /// Binding strength; operators of equal precedence associate to the left.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }

    pub const fn is_multiplicative(self) -> bool {
        matches!(self, Self::Mul | Self::Div)
    }

    /// Applies the operator to two scalars.
    ///
    /// Dividing by zero gives NaN instead of an infinity, and the NaN is left to
    /// propagate through whatever is computed from it.
    pub fn apply(self, lhs: Float, rhs: Float) -> Float {
        self.checked_apply(lhs, rhs).unwrap_or(Float::NAN)
    }

    /// Like [`apply`](Self::apply), but returns `None` when the result is undefined.
    pub fn checked_apply(self, lhs: Float, rhs: Float) -> Option<Float> {
        let value = match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div if rhs == 0.0 => return None,
            Self::Div => lhs / rhs,
        };
        (!value.is_nan()).then(|| value)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        };
        f.write_char(c)
    }
}
