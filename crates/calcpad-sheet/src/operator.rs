//! Built-in numeric operators available to sheet formulas.

use std::fmt;
use std::str::FromStr;

/// Number of arguments an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exactly(usize),
    /// This many arguments or more.
    AtLeast(usize),
}

impl Arity {
    /// Check an argument count against this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(1) => write!(f, "exactly 1 argument"),
            Self::Exactly(n) => write!(f, "exactly {n} arguments"),
            Self::AtLeast(1) => write!(f, "at least 1 argument"),
            Self::AtLeast(n) => write!(f, "at least {n} arguments"),
        }
    }
}

/// A built-in operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Sum,
    Product,
    Min,
    Max,
    Mean,
    Neg,
    Abs,
    Sub,
    Div,
    /// Constant taken from the formula's `value` field.
    Const,
}

impl Operator {
    /// All operators, in documentation order.
    pub const ALL: [Operator; 10] = [
        Self::Sum,
        Self::Product,
        Self::Min,
        Self::Max,
        Self::Mean,
        Self::Neg,
        Self::Abs,
        Self::Sub,
        Self::Div,
        Self::Const,
    ];

    /// Name used in sheet documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Product => "product",
            Self::Min => "min",
            Self::Max => "max",
            Self::Mean => "mean",
            Self::Neg => "neg",
            Self::Abs => "abs",
            Self::Sub => "sub",
            Self::Div => "div",
            Self::Const => "const",
        }
    }

    /// Accepted argument count.
    pub fn arity(self) -> Arity {
        match self {
            Self::Sum | Self::Product => Arity::AtLeast(0),
            Self::Min | Self::Max | Self::Mean => Arity::AtLeast(1),
            Self::Neg | Self::Abs => Arity::Exactly(1),
            Self::Sub | Self::Div => Arity::Exactly(2),
            Self::Const => Arity::Exactly(0),
        }
    }

    /// Apply the operator to arguments already checked against [`Operator::arity`].
    ///
    /// `Const` is resolved at load time and never applied here.
    pub fn apply(self, args: &[f64]) -> f64 {
        match (self, args) {
            (Self::Sum, _) => args.iter().sum(),
            (Self::Product, _) => args.iter().product(),
            (Self::Min, _) => args.iter().copied().fold(f64::INFINITY, f64::min),
            (Self::Max, _) => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            (Self::Mean, _) => args.iter().sum::<f64>() / args.len() as f64,
            (Self::Neg, [x]) => -x,
            (Self::Abs, [x]) => x.abs(),
            (Self::Sub, [x, y]) => x - y,
            (Self::Div, [x, y]) => x / y,
            (op, args) => unreachable!("{op} applied to {} arguments", args.len()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| s.to_string())
    }
}
