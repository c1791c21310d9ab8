//! Property-based tests for the operator algebra and the normalizer.

use proptest::prelude::*;
use std::rc::Rc;

use crate::poly::{Poly, PolyRing, RationalFunction};
use crate::primitive::rat;
use super::{normalize, DifferentialOperator, OperatorAlgebra};

// Strategy for small integer polynomials of degree at most 2
fn small_poly() -> impl Strategy<Value = RationalFunction> {
    prop::collection::vec(-5i64..=5, 0..=3)
        .prop_map(|coeffs| RationalFunction::from(Poly::new(coeffs.into_iter().map(rat).collect())))
}

// Strategy for coefficient lists of operators of order at most 2
fn small_coeffs() -> impl Strategy<Value = Vec<RationalFunction>> {
    prop::collection::vec(small_poly(), 1..=3)
}

fn algebra() -> (Rc<OperatorAlgebra>, DifferentialOperator) {
    OperatorAlgebra::new(PolyRing::integers("x"), None)
}

fn operator(algebra: &Rc<OperatorAlgebra>, coeffs: Vec<RationalFunction>) -> DifferentialOperator {
    DifferentialOperator::new(coeffs, algebra).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mul_associative(a in small_coeffs(), b in small_coeffs(), c in small_coeffs()) {
        let (algebra, _) = algebra();
        let (a, b, c) = (operator(&algebra, a), operator(&algebra, b), operator(&algebra, c));
        prop_assert_eq!(
            a.mul(&b).unwrap().mul(&c).unwrap(),
            a.mul(&b.mul(&c).unwrap()).unwrap()
        );
    }

    #[test]
    fn mul_distributes_over_add(a in small_coeffs(), b in small_coeffs(), c in small_coeffs()) {
        let (algebra, _) = algebra();
        let (a, b, c) = (operator(&algebra, a), operator(&algebra, b), operator(&algebra, c));
        let lhs = a.mul(&b.add(&c).unwrap()).unwrap();
        let rhs = a.mul(&b).unwrap().add(&a.mul(&c).unwrap()).unwrap();
        prop_assert_eq!(lhs.trimmed(), rhs.trimmed());
    }

    #[test]
    fn commutation_law(p in small_poly()) {
        // Dx·p = p·Dx + p'
        let (_, dx) = algebra();
        let lhs = dx.mul_scalar(&p).unwrap();
        let rhs = dx.scale(&p).unwrap().add_scalar(p.derivative()).unwrap();
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn pow_matches_repeated_mul(coeffs in small_coeffs(), n in 0i64..=4) {
        let (algebra, _) = algebra();
        let l = operator(&algebra, coeffs);
        let mut expected = operator(&algebra, vec![RationalFunction::one()]);
        for _ in 0..n {
            expected = expected.mul(&l).unwrap();
        }
        prop_assert_eq!(l.pow(n).unwrap().trimmed(), expected.trimmed());
    }

    #[test]
    fn normalize_idempotent_up_to_sign(coeffs in small_coeffs()) {
        let once = normalize(&coeffs, true);
        let negated = once.iter().map(|c| -c).collect::<Vec<_>>();
        prop_assert_eq!(normalize(&once, true), negated);
        prop_assert_eq!(normalize(&once, false), once);
    }
}
