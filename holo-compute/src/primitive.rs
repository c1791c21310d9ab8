//! Functions to construct [`Integer`]s, [`Rational`]s, and [`Float`]s from various types.

use rug::{Assign, Float, Integer, Rational};

/// The number of bits of precision to use when evaluating expressions numerically.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
pub fn rat<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates the [`Rational`] `numer / denom`.
///
/// # Panics
///
/// Panics if `denom` is zero.
pub fn frac(numer: i64, denom: i64) -> Rational {
    Rational::from((numer, denom))
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frac_is_reduced() {
        let half = frac(3, 6);
        assert_eq!(half, rat((1, 2)));
        assert_eq!(*half.denom(), 2);
    }

    #[test]
    fn frac_moves_sign_to_numerator() {
        let r = frac(1, -3);
        assert_eq!(*r.numer(), -1);
        assert_eq!(*r.denom(), 3);
    }

    #[test]
    fn float_from_rational() {
        let f = float(&frac(1, 4));
        assert_eq!(f.to_f64(), 0.25);
    }
}
