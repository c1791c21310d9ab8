use rug::Rational;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use super::Poly;

/// A rational function `P / Q` over ℚ in canonical form.
///
/// The denominator is non-zero and monic, and `gcd(P, Q) = 1`. The zero function is `0 / 1`.
/// With this form, two rational functions are equal exactly when their numerators and
/// denominators are equal, so [`PartialEq`] is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationalFunction {
    num: Poly,
    den: Poly,
}

impl RationalFunction {
    /// Creates the rational function `num / den`, or [`None`] if `den` is zero.
    pub fn new(num: Poly, den: Poly) -> Option<Self> {
        if den.is_zero() {
            None
        } else {
            Some(Self::reduced(num, den))
        }
    }

    /// Brings `num / den` into canonical form. `den` must be non-zero.
    fn reduced(num: Poly, den: Poly) -> Self {
        if num.is_zero() {
            return Self::zero();
        }

        let gcd = num.gcd(&den);
        let (num, den) = match (num.div_rem(&gcd), den.div_rem(&gcd)) {
            (Some((num, _)), Some((den, _))) => (num, den),
            _ => (num, den),
        };

        match den.leading_coefficient() {
            Some(lead) if *lead != 1 => {
                let inv = Rational::from(lead.recip_ref());
                Self { num: num.scale(&inv), den: den.scale(&inv) }
            },
            _ => Self { num, den },
        }
    }

    /// The zero function.
    pub fn zero() -> Self {
        Self { num: Poly::zero(), den: Poly::one() }
    }

    /// The constant function `1`.
    pub fn one() -> Self {
        Self::from_poly(Poly::one())
    }

    /// The constant function `c`.
    pub fn constant(c: Rational) -> Self {
        Self::from_poly(Poly::constant(c))
    }

    /// The indeterminate `x`.
    pub fn x() -> Self {
        Self::from_poly(Poly::x())
    }

    /// The polynomial `p`, viewed as a rational function.
    pub fn from_poly(p: Poly) -> Self {
        Self { num: p, den: Poly::one() }
    }

    /// The numerator.
    pub fn numer(&self) -> &Poly {
        &self.num
    }

    /// The (monic) denominator.
    pub fn denom(&self) -> &Poly {
        &self.den
    }

    /// Returns true if this is the zero function.
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Returns true if this is the constant function `1`.
    pub fn is_one(&self) -> bool {
        self.num.is_one() && self.den.is_one()
    }

    /// Returns true if the denominator is `1`.
    pub fn is_polynomial(&self) -> bool {
        self.den.is_one()
    }

    /// If the function is a polynomial, returns it.
    pub fn as_poly(&self) -> Option<&Poly> {
        self.is_polynomial().then_some(&self.num)
    }

    /// The multiplicative inverse, or [`None`] for zero.
    pub fn recip(&self) -> Option<Self> {
        Self::new(self.den.clone(), self.num.clone())
    }

    /// Divides by `rhs`, or returns [`None`] if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> Option<Self> {
        Some(self * &rhs.recip()?)
    }

    /// Raises the function to an integer power. Returns [`None`] for a negative power of zero.
    pub fn pow(&self, n: i64) -> Option<Self> {
        let exp = u32::try_from(n.unsigned_abs()).ok()?;
        let raised = Self::reduced(self.num.pow(exp), self.den.pow(exp));
        if n < 0 {
            raised.recip()
        } else {
            Some(raised)
        }
    }

    /// Multiplies by a rational constant.
    pub fn scale(&self, c: &Rational) -> Self {
        if c.cmp0().is_eq() {
            Self::zero()
        } else {
            Self { num: self.num.scale(c), den: self.den.clone() }
        }
    }

    /// The derivative with respect to `x`, `(P'Q - PQ') / Q^2`.
    pub fn derivative(&self) -> Self {
        if self.is_polynomial() {
            return Self::from_poly(self.num.derivative());
        }
        let num = &(&self.num.derivative() * &self.den) - &(&self.num * &self.den.derivative());
        Self::reduced(num, &self.den * &self.den)
    }

    /// Splits the function into a numerator and denominator with integer coefficients,
    /// `(a * P, b * Q)`, where `P` and `Q` are primitive, `Q` has a positive leading
    /// coefficient, and `a / b` is a reduced fraction with `b > 0`.
    ///
    /// This is the form in which annihilators are normalized, and in which non-polynomial
    /// functions are displayed.
    pub fn integer_form(&self) -> (Poly, Poly) {
        let (num_content, p) = self.num.primitive_decomposition();
        let (den_content, q) = self.den.primitive_decomposition();
        let ratio = num_content / den_content;
        let (a, b) = ratio.into_numer_denom();
        (p.scale(&Rational::from(a)), q.scale(&Rational::from(b)))
    }

    /// Writes the function in the indeterminate `var`.
    pub(crate) fn fmt_in(&self, var: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_polynomial() {
            return self.num.fmt_in(var, f);
        }

        let (num, den) = self.integer_form();
        if num.is_monomial() {
            num.fmt_in(var, f)?;
        } else {
            write!(f, "(")?;
            num.fmt_in(var, f)?;
            write!(f, ")")?;
        }
        write!(f, "/")?;
        if den.is_atom() {
            den.fmt_in(var, f)
        } else {
            write!(f, "(")?;
            den.fmt_in(var, f)?;
            write!(f, ")")
        }
    }
}

impl Default for RationalFunction {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Poly> for RationalFunction {
    fn from(p: Poly) -> Self {
        Self::from_poly(p)
    }
}

impl From<Rational> for RationalFunction {
    fn from(c: Rational) -> Self {
        Self::constant(c)
    }
}

impl From<i64> for RationalFunction {
    fn from(c: i64) -> Self {
        Self::constant(Rational::from(c))
    }
}

impl Add for &RationalFunction {
    type Output = RationalFunction;

    fn add(self, rhs: Self) -> RationalFunction {
        if self.den == rhs.den {
            return RationalFunction::reduced(&self.num + &rhs.num, self.den.clone());
        }
        let num = &(&self.num * &rhs.den) + &(&rhs.num * &self.den);
        RationalFunction::reduced(num, &self.den * &rhs.den)
    }
}

impl Sub for &RationalFunction {
    type Output = RationalFunction;

    fn sub(self, rhs: Self) -> RationalFunction {
        self + &-rhs
    }
}

impl Mul for &RationalFunction {
    type Output = RationalFunction;

    fn mul(self, rhs: Self) -> RationalFunction {
        if self.is_polynomial() && rhs.is_polynomial() {
            return RationalFunction::from_poly(&self.num * &rhs.num);
        }
        RationalFunction::reduced(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl Neg for &RationalFunction {
    type Output = RationalFunction;

    fn neg(self) -> RationalFunction {
        RationalFunction { num: -&self.num, den: self.den.clone() }
    }
}

impl Add for RationalFunction {
    type Output = RationalFunction;

    fn add(self, rhs: Self) -> RationalFunction {
        &self + &rhs
    }
}

impl Sub for RationalFunction {
    type Output = RationalFunction;

    fn sub(self, rhs: Self) -> RationalFunction {
        &self - &rhs
    }
}

impl Mul for RationalFunction {
    type Output = RationalFunction;

    fn mul(self, rhs: Self) -> RationalFunction {
        &self * &rhs
    }
}

impl Neg for RationalFunction {
    type Output = RationalFunction;

    fn neg(self) -> RationalFunction {
        -&self
    }
}

impl fmt::Display for RationalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_in("x", f)
    }
}

#[cfg(test)]
mod tests {
    use crate::primitive::{frac, rat};
    use pretty_assertions::assert_eq;
    use super::*;

    fn p(coeffs: &[i64]) -> Poly {
        Poly::new(coeffs.iter().map(|&c| rat(c)).collect())
    }

    fn rf(num: &[i64], den: &[i64]) -> RationalFunction {
        RationalFunction::new(p(num), p(den)).unwrap()
    }

    #[test]
    fn canonical_form() {
        // (2x + 2) / (4x^2 - 4) = (1/2) / (x - 1)
        let f = rf(&[2, 2], &[-4, 0, 4]);
        assert_eq!(f.numer(), &Poly::constant(frac(1, 2)));
        assert_eq!(f.denom(), &p(&[-1, 1]));
        assert_eq!(f, rf(&[1], &[-2, 2]));
        assert_eq!(rf(&[0], &[1, 1]), RationalFunction::zero());
        assert_eq!(RationalFunction::new(p(&[1]), Poly::zero()), None);
    }

    #[test]
    fn field_operations() {
        let a = rf(&[1], &[1, 1]);
        let b = rf(&[1], &[-1, 1]);
        // 1/(x+1) + 1/(x-1) = 2x / (x^2 - 1)
        assert_eq!(&a + &b, rf(&[0, 2], &[-1, 0, 1]));
        assert_eq!(&a - &a, RationalFunction::zero());
        assert_eq!(&a * &b, rf(&[1], &[-1, 0, 1]));
        assert_eq!(a.checked_div(&b), Some(rf(&[-1, 1], &[1, 1])));
        assert_eq!(a.checked_div(&RationalFunction::zero()), None);
        assert_eq!(a.pow(-2), Some(rf(&[1, 2, 1], &[1])));
        assert_eq!(RationalFunction::zero().pow(-1), None);
    }

    #[test]
    fn derivative() {
        // (1/x)' = -1/x^2
        assert_eq!(rf(&[1], &[0, 1]).derivative(), rf(&[-1], &[0, 0, 1]));
        // (x/(x+1))' = 1/(x+1)^2
        assert_eq!(rf(&[0, 1], &[1, 1]).derivative(), rf(&[1], &[1, 2, 1]));
    }

    #[test]
    fn integer_form() {
        // 1 / (x + 1/2) = 2 / (2x + 1)
        let f = RationalFunction::new(Poly::one(), Poly::new(vec![frac(1, 2), rat(1)])).unwrap();
        assert_eq!(f.integer_form(), (p(&[2]), p(&[1, 2])));

        // x/3
        let g = RationalFunction::from_poly(Poly::new(vec![rat(0), frac(1, 3)]));
        assert_eq!(g.integer_form(), (p(&[0, 1]), p(&[3])));
    }

    #[test]
    fn display() {
        assert_eq!(rf(&[0, 1], &[1, 1]).to_string(), "x/(x + 1)");
        assert_eq!(rf(&[1], &[-1, 0, 1]).to_string(), "1/(x**2 - 1)");
        assert_eq!(rf(&[1, 1], &[0, 0, 1]).to_string(), "(x + 1)/x**2");
        assert_eq!(rf(&[1], &[1, 2]).to_string(), "1/(2*x + 1)");
        assert_eq!(RationalFunction::from_poly(p(&[0, 0, 1])).to_string(), "x**2");
    }
}
