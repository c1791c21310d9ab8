use crate::poly::{PolyRing, RationalFunction};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use super::DifferentialOperator;

static NEXT_ALGEBRA_ID: AtomicUsize = AtomicUsize::new(0);

/// Opaque identity of an [`OperatorAlgebra`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlgebraId(usize);

/// The ring of differential operators `Σ cᵢ·Dxⁱ` over a base ring, with the commutation rule
/// `Dx·a = a·Dx + a'`.
///
/// Algebras are created with [`OperatorAlgebra::new`], which returns the algebra behind an
/// [`Rc`] together with its generator `Dx`. Every [`DifferentialOperator`] keeps a handle to
/// the algebra it was built in, and operators of different algebras cannot be combined.
#[derive(Debug)]
pub struct OperatorAlgebra {
    id: AlgebraId,
    base: PolyRing,
    generator: String,
}

impl OperatorAlgebra {
    /// Creates the operator algebra over `base`, returning it along with its derivative
    /// operator `Dx`. The generator is displayed as `generator`, or `Dx` if none is given.
    pub fn new(base: PolyRing, generator: Option<&str>) -> (Rc<Self>, DifferentialOperator) {
        let algebra = Rc::new(Self {
            id: AlgebraId(NEXT_ALGEBRA_ID.fetch_add(1, Ordering::Relaxed)),
            base,
            generator: generator.unwrap_or("Dx").to_string(),
        });
        let dx = Self::derivative_operator(&algebra);
        (algebra, dx)
    }

    pub fn id(&self) -> AlgebraId {
        self.id
    }

    /// The base ring of the coefficients.
    pub fn base(&self) -> &PolyRing {
        &self.base
    }

    /// The symbol the generator is displayed as.
    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// The operator `Dx = [0, 1]`, which acts on a function by differentiating it.
    pub fn derivative_operator(this: &Rc<Self>) -> DifferentialOperator {
        DifferentialOperator::from_elements(
            vec![RationalFunction::zero(), RationalFunction::one()],
            this,
        )
    }
}

/// Algebras are equal when they are the same algebra over the same ring.
impl PartialEq for OperatorAlgebra {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.base.id() == other.base.id()
    }
}

impl Eq for OperatorAlgebra {}

impl fmt::Display for OperatorAlgebra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Univariate Differential Operator Algebra in intermediate {} over the base ring {}",
            self.generator,
            self.base,
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn display() {
        let (algebra, _) = OperatorAlgebra::new(PolyRing::integers("x"), None);
        assert_eq!(
            algebra.to_string(),
            "Univariate Differential Operator Algebra in intermediate Dx over the base ring ZZ[x]",
        );

        let (algebra, _) = OperatorAlgebra::new(PolyRing::rationals("t"), Some("Dt"));
        assert_eq!(
            algebra.to_string(),
            "Univariate Differential Operator Algebra in intermediate Dt over the base ring QQ[t]",
        );
    }

    #[test]
    fn generator_is_dx() {
        let (algebra, dx) = OperatorAlgebra::new(PolyRing::integers("x"), None);
        assert_eq!(dx.coefficients(), &[RationalFunction::zero(), RationalFunction::one()]);
        assert_eq!(dx.order(), 1);
        assert_eq!(dx, OperatorAlgebra::derivative_operator(&algebra));
        assert_eq!(dx.to_string(), "(1)Dx");
    }

    #[test]
    fn identity() {
        let ring = PolyRing::integers("x");
        let (a, _) = OperatorAlgebra::new(ring.clone(), None);
        let (b, _) = OperatorAlgebra::new(ring, None);
        assert_eq!(*a, *a);
        assert!(*a != *b);
    }
}
