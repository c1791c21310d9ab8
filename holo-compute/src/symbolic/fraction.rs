//! Tools to help build fractions.

use crate::symbolic::expr::SymExpr;

/// Create a [`SymExpr`] representing a fraction with the given numerator and denominator.
///
/// The representation is a [`SymExpr::Mul`] containing two factors. The first factor is the
/// numerator, and the second factor is the denominator raised to the power of -1. A numerator
/// of `1` is left out.
pub(crate) fn make_fraction(numerator: SymExpr, denominator: SymExpr) -> SymExpr {
    let recip = SymExpr::Exp(Box::new(denominator), Box::new(SymExpr::int(-1)));
    if numerator.as_integer().is_some_and(|n| *n == 1) {
        recip
    } else {
        numerator * recip
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn fraction_shape() {
        let half = make_fraction(SymExpr::symbol("x"), SymExpr::int(2));
        assert_eq!(half, SymExpr::Mul(vec![
            SymExpr::symbol("x"),
            SymExpr::Exp(Box::new(SymExpr::int(2)), Box::new(SymExpr::int(-1))),
        ]));
        assert_eq!(
            make_fraction(SymExpr::int(1), SymExpr::int(3)),
            SymExpr::Exp(Box::new(SymExpr::int(3)), Box::new(SymExpr::int(-1))),
        );
    }
}
