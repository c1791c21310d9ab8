//! Computer algebra for linear differential equations with polynomial coefficients.
//!
//! This crate implements the ring of differential operators over univariate polynomials or
//! rational functions (an Ore algebra), and holonomic functions: functions given by a linear
//! differential equation they satisfy, closed under addition, multiplication and
//! integration.
//!
//! - [`poly`]: the base rings ℤ\[x\], ℚ\[x\] and ℚ(x).
//! - [`holonomic`]: operator algebras, differential operators and holonomic functions.
//! - [`symbolic`]: symbolic expressions, used to build coefficients and to check annihilators.
//! - [`linalg`]: the exact linear algebra behind the closure algorithms.
//!
//! Errors are reported as [`holo_error::Error`]s, and the closure searches emit [`tracing`]
//! events; no subscriber is installed by this crate.

pub mod holonomic;
pub mod linalg;
pub mod poly;
pub mod primitive;
pub mod symbolic;

pub use holonomic::{DifferentialOperator, HolonomicFunction, OperatorAlgebra, SearchLimits};
pub use poly::{Coefficient, Domain, PolyRing, RationalFunction};
