use crate::poly::{Poly, RationalFunction};

/// Scales a list of coefficients so that they become polynomials with integer coefficients and
/// no common factor.
///
/// Every coefficient is written as `(a * P) / (b * Q)` with integer polynomials (see
/// [`RationalFunction::integer_form`]). The list is multiplied by the least common multiple of
/// the denominators `b * Q` (negated if `negative` is true), then divided by the greatest common
/// divisor of the resulting numerators, taken with a positive leading coefficient.
///
/// The sign convention is applied on every call, so normalizing twice with `negative` set flips
/// the sign back: the result is only idempotent up to sign. If every coefficient is zero, the
/// list is returned unchanged.
pub fn normalize(coefficients: &[RationalFunction], negative: bool) -> Vec<RationalFunction> {
    let mut lcm = Poly::one();
    for c in coefficients {
        let (_, denom) = c.integer_form();
        lcm = lcm.integer_lcm(&denom);
    }
    if negative {
        lcm = -lcm;
    }

    let lcm = RationalFunction::from_poly(lcm);
    let scaled = coefficients.iter().map(|c| c * &lcm).collect::<Vec<_>>();

    let Some(last) = scaled.last() else {
        return scaled;
    };
    let gcd = scaled
        .iter()
        .fold(last.integer_form().0, |gcd, c| gcd.integer_gcd(&c.integer_form().0));

    match RationalFunction::from_poly(gcd).recip() {
        Some(inv) => scaled.iter().map(|c| c * &inv).collect(),
        None => scaled,
    }
}
