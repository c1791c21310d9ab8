//! Univariate polynomials and rational functions over ℚ, and the base rings built from them.
//!
//! [`Poly`] is a dense polynomial with [`Rational`] coefficients, stored from the constant term
//! upwards with no trailing zeros. [`RationalFunction`] is a reduced quotient of two [`Poly`]s
//! and is the single representation of base-ring elements: [`PolyRing`] only decides which
//! rational functions it admits.

mod rational;
mod ring;

pub use rational::RationalFunction;
pub use ring::{Coefficient, CoercionError, Domain, PolyRing, RingId};

use rug::{Integer, Rational};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A dense univariate polynomial with rational coefficients.
///
/// `coeffs[k]` is the coefficient of `x^k`. The list never ends in a zero, so the zero
/// polynomial is the empty list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Poly {
    coeffs: Vec<Rational>,
}

impl Poly {
    /// Creates a polynomial from its coefficients, lowest degree first.
    pub fn new(mut coeffs: Vec<Rational>) -> Self {
        while coeffs.last().is_some_and(|c| c.cmp0().is_eq()) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The constant polynomial `1`.
    pub fn one() -> Self {
        Self::constant(Rational::from(1))
    }

    /// The constant polynomial `c`.
    pub fn constant(c: Rational) -> Self {
        Self::new(vec![c])
    }

    /// The polynomial `x`.
    pub fn x() -> Self {
        Self::monomial(Rational::from(1), 1)
    }

    /// The polynomial `c * x^k`.
    pub fn monomial(c: Rational, k: usize) -> Self {
        let mut coeffs = vec![Rational::new(); k];
        coeffs.push(c);
        Self::new(coeffs)
    }

    /// The coefficients, lowest degree first.
    pub fn coefficients(&self) -> &[Rational] {
        &self.coeffs
    }

    /// Returns true if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Returns true if this is the constant polynomial `1`.
    pub fn is_one(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0] == 1
    }

    /// The degree of the polynomial, or [`None`] for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// The coefficient of the highest power of `x`, or [`None`] for the zero polynomial.
    pub fn leading_coefficient(&self) -> Option<&Rational> {
        self.coeffs.last()
    }

    /// Multiplies every coefficient by `c`.
    pub fn scale(&self, c: &Rational) -> Self {
        Self::new(self.coeffs.iter().map(|a| Rational::from(a * c)).collect())
    }

    /// The formal derivative with respect to `x`.
    pub fn derivative(&self) -> Self {
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, c)| c.clone() * Rational::from(k as u64))
                .collect(),
        )
    }

    /// Raises the polynomial to the power `n`.
    pub fn pow(&self, n: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut n = n;
        while n > 0 {
            if n & 1 == 1 {
                result = &result * &base;
            }
            n >>= 1;
            if n > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// Polynomial long division. Returns `(quotient, remainder)` such that
    /// `self = quotient * divisor + remainder` and `deg(remainder) < deg(divisor)`, or [`None`]
    /// if the divisor is zero.
    pub fn div_rem(&self, divisor: &Self) -> Option<(Self, Self)> {
        let divisor_degree = divisor.degree()?;
        let lead = divisor.leading_coefficient()?;

        let mut rem = self.coeffs.clone();
        let Some(quot_len) = (rem.len() + 1).checked_sub(divisor.coeffs.len()) else {
            return Some((Self::zero(), self.clone()));
        };
        let mut quot = vec![Rational::new(); quot_len];

        for k in (0..quot_len).rev() {
            let top = &rem[k + divisor_degree];
            if top.cmp0().is_eq() {
                continue;
            }
            let factor = Rational::from(top / lead);
            for (i, d) in divisor.coeffs.iter().enumerate() {
                rem[k + i] -= Rational::from(&factor * d);
            }
            quot[k] = factor;
        }

        rem.truncate(divisor_degree);
        Some((Self::new(quot), Self::new(rem)))
    }

    /// Divides by the leading coefficient. The zero polynomial is returned unchanged.
    pub fn monic(&self) -> Self {
        match self.leading_coefficient() {
            Some(lead) => self.scale(&Rational::from(lead.recip_ref())),
            None => Self::zero(),
        }
    }

    /// The monic greatest common divisor over ℚ, computed with the Euclidean algorithm. The gcd
    /// of two zero polynomials is zero.
    pub fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();
        while let Some((_, rem)) = a.div_rem(&b) {
            a = b;
            b = rem;
        }
        a.monic()
    }

    /// Splits the polynomial into `c * P`, where `P` has coprime integer coefficients and a
    /// positive leading coefficient. Returns `(c, P)`; the zero polynomial gives `(0, 0)`.
    pub fn primitive_decomposition(&self) -> (Rational, Self) {
        let Some(lead) = self.leading_coefficient() else {
            return (Rational::new(), Self::zero());
        };

        let mut numer_gcd = Integer::new();
        let mut denom_lcm = Integer::from(1);
        for c in &self.coeffs {
            numer_gcd = numer_gcd.gcd(c.numer());
            denom_lcm = denom_lcm.lcm(c.denom());
        }

        let mut content = Rational::from((numer_gcd, denom_lcm));
        if lead.cmp0().is_lt() {
            content = -content;
        }

        let primitive = self.scale(&Rational::from(content.recip_ref()));
        (content, primitive)
    }

    /// The greatest common divisor of two polynomials with integer coefficients, with a
    /// positive leading coefficient. The integer content takes part in the gcd, so
    /// `integer_gcd(2x, 4x^2) = 2x`.
    pub(crate) fn integer_gcd(&self, other: &Self) -> Self {
        if self.is_zero() && other.is_zero() {
            return Self::zero();
        }

        let (c1, p1) = self.primitive_decomposition();
        let (c2, p2) = other.primitive_decomposition();
        let content = rational_gcd(&c1, &c2);
        let (_, primitive) = p1.gcd(&p2).primitive_decomposition();
        primitive.scale(&content)
    }

    /// The least common multiple of two polynomials with integer coefficients, with a positive
    /// leading coefficient. The lcm with zero is zero.
    pub(crate) fn integer_lcm(&self, other: &Self) -> Self {
        let product = self * other;
        let gcd = self.integer_gcd(other);
        let Some((quotient, _)) = product.div_rem(&gcd) else {
            return Self::zero();
        };
        let (content, primitive) = quotient.primitive_decomposition();
        primitive.scale(&content.abs())
    }
}

/// The gcd of two rationals, taken as `gcd(numerators) / lcm(denominators)`. Always
/// non-negative.
fn rational_gcd(a: &Rational, b: &Rational) -> Rational {
    let numer = a.numer().clone().gcd(b.numer());
    let denom = a.denom().clone().lcm(b.denom());
    Rational::from((numer, denom))
}

impl From<Rational> for Poly {
    fn from(c: Rational) -> Self {
        Self::constant(c)
    }
}

impl From<i64> for Poly {
    fn from(c: i64) -> Self {
        Self::constant(Rational::from(c))
    }
}

impl Add for &Poly {
    type Output = Poly;

    fn add(self, rhs: Self) -> Poly {
        let (long, short) = if self.coeffs.len() >= rhs.coeffs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut coeffs = long.coeffs.clone();
        for (c, s) in coeffs.iter_mut().zip(&short.coeffs) {
            *c += s;
        }
        Poly::new(coeffs)
    }
}

impl Sub for &Poly {
    type Output = Poly;

    fn sub(self, rhs: Self) -> Poly {
        self + &-rhs
    }
}

impl Mul for &Poly {
    type Output = Poly;

    fn mul(self, rhs: Self) -> Poly {
        if self.is_zero() || rhs.is_zero() {
            return Poly::zero();
        }

        let mut coeffs = vec![Rational::new(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += Rational::from(a * b);
            }
        }
        Poly::new(coeffs)
    }
}

impl Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        Poly { coeffs: self.coeffs.iter().map(|c| Rational::from(-c)).collect() }
    }
}

impl Add for Poly {
    type Output = Poly;

    fn add(self, rhs: Self) -> Poly {
        &self + &rhs
    }
}

impl Sub for Poly {
    type Output = Poly;

    fn sub(self, rhs: Self) -> Poly {
        &self - &rhs
    }
}

impl Mul for Poly {
    type Output = Poly;

    fn mul(self, rhs: Self) -> Poly {
        &self * &rhs
    }
}

impl Neg for Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        -&self
    }
}

impl Poly {
    /// Writes the polynomial in the indeterminate `var`, highest degree first, e.g.
    /// `x**4 - 6*x - 2` or `1/2*x**2 + x`.
    pub(crate) fn fmt_in(&self, var: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut first = true;
        for (k, c) in self.coeffs.iter().enumerate().rev() {
            if c.cmp0().is_eq() {
                continue;
            }

            let negative = c.cmp0().is_lt();
            if first {
                if negative {
                    write!(f, "-")?;
                }
            } else if negative {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            first = false;

            let abs = Rational::from(c.abs_ref());
            match k {
                0 => write!(f, "{}", abs)?,
                _ => {
                    if abs != 1 {
                        write!(f, "{}*", abs)?;
                    }
                    write!(f, "{}", var)?;
                    if k > 1 {
                        write!(f, "**{}", k)?;
                    }
                },
            }
        }

        Ok(())
    }

    /// Returns true if the polynomial prints as a single factor, so it needs no parentheses
    /// as a denominator.
    pub(crate) fn is_atom(&self) -> bool {
        let nonzero = self.coeffs.iter().filter(|c| c.cmp0().is_ne()).count();
        match (nonzero, self.degree()) {
            (0, _) | (_, Some(0)) => true,
            (1, _) => self.leading_coefficient().is_some_and(|c| *c == 1),
            _ => false,
        }
    }

    /// Returns true if the polynomial prints as a single term.
    pub(crate) fn is_monomial(&self) -> bool {
        self.coeffs.iter().filter(|c| c.cmp0().is_ne()).count() <= 1
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_in("x", f)
    }
}
