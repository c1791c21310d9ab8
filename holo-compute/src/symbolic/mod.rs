//! Symbolic expressions and the operations this crate performs on them.
//!
//! Expressions are represented as a tree of [`SymExpr`] nodes (see [`mod@expr`]). They are the
//! symbolic input from which base-ring elements are coerced (see
//! [`PolyRing::coerce`](crate::poly::PolyRing::coerce)), and the functions that differential
//! operators act on.
//!
//! [`derivative()`] differentiates an expression with respect to a variable, and
//! [`eval()`](eval::eval) evaluates one numerically at a point. Together they allow checking
//! that an annihilator `L` really satisfies `L·f = 0` for a closed-form `f`:
//!
//! ```
//! use holo_compute::primitive::float;
//! use holo_compute::symbolic::{derivative, eval::eval, SymExpr};
//!
//! // f = exp(2x), f' - 2f = 0
//! let x = SymExpr::symbol("x");
//! let f = SymExpr::call("exp", vec![SymExpr::int(2) * x]);
//! let residual = derivative(&f, "x").unwrap() - SymExpr::int(2) * f;
//! let value = eval(&residual, "x", &float(0.75)).unwrap();
//! assert!(value.to_f64().abs() < 1e-12);
//! ```

pub mod derivative;
pub mod eval;
pub mod expr;
pub(crate) mod fraction;

pub use derivative::{derivative, SymbolicDerivativeError};
pub use expr::{Primary, SymExpr};
