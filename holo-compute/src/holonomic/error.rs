//! Error kinds produced by operator and holonomic function operations.
//!
//! The [`Error`]s built here carry a rendering of the failing operation as their source, such as
//! `((1)Dx) * ((x)Dx)`, with spans pointing at the operands.

use ariadne::Fmt;
use holo_attrs::ErrorKind;
use holo_error::{Error, ErrorKind, EXPR};
use std::ops::Range;

/// A differential operator was built from an empty coefficient list.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "a differential operator needs at least one coefficient",
    labels = ["this coefficient list is empty"],
    help = format!("the zero operator is written as {}", "[0]".fg(EXPR)),
)]
pub struct EmptyCoefficients;

/// A value could not be converted into an element of the base ring.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot coerce this value into {}", self.ring),
    labels = [format!("{}", self.reason)],
)]
pub struct CoercionFailed {
    /// The base ring that was coerced into.
    pub ring: String,

    /// Why the value was rejected.
    pub reason: String,
}

/// The operands of a binary operation belong to different operator algebras.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot combine operators from different algebras",
    labels = [
        format!("this operator is over {}", self.lhs),
        String::new(),
        format!("this operator is over {}", self.rhs),
    ],
    help = "build both operands from the same `OperatorAlgebra`; algebras are distinct even if their base rings look the same",
)]
pub struct IncompatibleAlgebras {
    /// The base ring of the left operand.
    pub lhs: String,

    /// The base ring of the right operand.
    pub rhs: String,
}

/// Two holonomic functions are functions of different variables.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("holonomic functions of `{}` and `{}` cannot be combined", self.lhs, self.rhs),
    labels = [
        format!("this is a function of `{}`", self.lhs),
        String::new(),
        format!("this is a function of `{}`", self.rhs),
    ],
)]
pub struct VariableMismatch {
    /// The variable of the left operand.
    pub lhs: String,

    /// The variable of the right operand.
    pub rhs: String,
}

/// An operator was raised to a power that is not a non-negative integer.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot raise a differential operator to the power `{}`", self.exponent),
    labels = ["this operator", "", "this exponent"],
    help = "differential operators are not invertible; only non-negative integer exponents are supported",
)]
pub struct UnsupportedExponent {
    /// The exponent that was given.
    pub exponent: String,
}

/// The coefficient list of an operator power would not fit in memory.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the power `{}` of this operator has too many coefficients to store", self.exponent),
    labels = ["this operator", "", "this exponent"],
    help = "the order of `L**n` is `n` times the order of `L`",
)]
pub struct ExponentTooLarge {
    /// The exponent that was given.
    pub exponent: String,
}

/// A closure search did not find an annihilator within the configured limit.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("no annihilator of order at most {} found for this {}", self.max_order, self.operation),
    labels = ["this function", "", "this function"],
    help = "raise `SearchLimits::max_order` to search further",
)]
pub struct ComputationLimitExceeded {
    /// The closure operation that was searching.
    pub operation: &'static str,

    /// The limit that was reached.
    pub max_order: usize,
}

/// A holonomic function was given the zero operator as its annihilator.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the zero operator annihilates every function",
    labels = ["this annihilator is zero"],
    help = "a holonomic function needs an annihilator with at least one non-zero coefficient",
)]
pub struct ZeroAnnihilator;

/// An operator could not be applied to an expression because a derivative of it is unknown.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot differentiate `{}`", self.expr),
    labels = ["while applying this operator", "", "to this expression"],
    help = "only sums, products, integer powers, and `sin`, `cos`, `exp`, `ln` and `sqrt` can be differentiated",
)]
pub struct UnsupportedDerivative {
    /// The sub-expression that could not be differentiated.
    pub expr: String,
}

/// Renders the binary operation `(lhs) op (rhs)`, returning the rendering and the spans of the
/// left operand, the operator and the right operand. Spans are in characters, as `ariadne`
/// expects.
pub(crate) fn binary_source(lhs: &str, op: &str, rhs: &str) -> (String, Vec<Range<usize>>) {
    let lhs_span = 0..lhs.chars().count() + 2;
    let op_span = lhs_span.end + 1..lhs_span.end + 1 + op.chars().count();
    let rhs_span = op_span.end + 1..op_span.end + 3 + rhs.chars().count();
    (format!("({}) {} ({})", lhs, op, rhs), vec![lhs_span, op_span, rhs_span])
}

/// Builds an error whose source is the binary operation `(lhs) op (rhs)`.
pub(crate) fn binary_error(lhs: &str, op: &str, rhs: &str, kind: impl ErrorKind + 'static) -> Error {
    let (source, spans) = binary_source(lhs, op, rhs);
    Error::new(source, spans, kind)
}
