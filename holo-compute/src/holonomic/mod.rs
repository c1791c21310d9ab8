//! Differential operator algebras and holonomic functions.
//!
//! An [`OperatorAlgebra`] over a base ring `R` (see [`PolyRing`](crate::poly::PolyRing)) is the
//! ring of [`DifferentialOperator`]s `Σ cᵢ·Dxⁱ` with `cᵢ ∈ R`, where `Dx` does not commute with
//! the coefficients: `Dx·a = a·Dx + a'`. A [`HolonomicFunction`] is a function described by an
//! operator that annihilates it.
//!
//! ```
//! use holo_compute::holonomic::{HolonomicFunction, OperatorAlgebra};
//! use holo_compute::poly::PolyRing;
//!
//! let (_, dx) = OperatorAlgebra::new(PolyRing::rationals("x"), None);
//!
//! // exp(x) and exp(2x)
//! let f = HolonomicFunction::new(dx.sub_scalar(1).unwrap(), "x").unwrap();
//! let g = HolonomicFunction::new(dx.sub_scalar(2).unwrap(), "x").unwrap();
//!
//! let sum = f.add(&g).unwrap();
//! assert_eq!(sum.to_string(), "Holonomic((2) + (-3)Dx + (1)Dx**2, x)");
//! ```

mod algebra;
pub mod error;
mod function;
mod limits;
mod normalize;
mod operator;

#[cfg(test)]
mod proptests;

pub use algebra::{AlgebraId, OperatorAlgebra};
pub use function::{HolonomicFunction, InitialConditions};
pub use limits::SearchLimits;
pub use normalize::normalize;
pub use operator::DifferentialOperator;
