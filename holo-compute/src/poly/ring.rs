use crate::symbolic::{fraction::make_fraction, Primary, SymExpr};
use rug::{Integer, Rational};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use super::{Poly, RationalFunction};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static NEXT_RING_ID: AtomicUsize = AtomicUsize::new(0);

/// Opaque identity of a [`PolyRing`]. Every call to [`PolyRing::new`] produces a fresh id, so
/// two rings over the same variable and domain are still distinct rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingId(usize);

impl RingId {
    fn fresh() -> Self {
        Self(NEXT_RING_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The coefficients admitted by a [`PolyRing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Domain {
    /// ℤ\[x\]: polynomials with integer coefficients.
    Integers,

    /// ℚ\[x\]: polynomials with rational coefficients.
    Rationals,

    /// ℚ(x): rational functions.
    Fractions,
}

/// Value that [`PolyRing::coerce`] could not turn into a ring element.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// The value is a rational function, but the ring does not contain it.
    NotInDomain { value: String, ring: String },

    /// The value divides by zero.
    DivisionByZero,

    /// The value mentions a symbol other than the ring's indeterminate.
    UnknownSymbol(String),

    /// The value raises something to a power that is not an integer.
    NonIntegerExponent(String),

    /// The value is not a rational function of the indeterminate at all, e.g. `sin(x)`.
    NotRational(String),
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInDomain { value, ring } => write!(f, "`{}` is not an element of {}", value, ring),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::UnknownSymbol(sym) => write!(f, "unknown symbol `{}`", sym),
            Self::NonIntegerExponent(expr) => write!(f, "`{}` has a non-integer exponent", expr),
            Self::NotRational(expr) => write!(f, "`{}` is not a rational function", expr),
        }
    }
}

/// A value that can be coerced into an element of a [`PolyRing`].
#[derive(Debug, Clone, PartialEq)]
pub enum Coefficient {
    Integer(Integer),
    Rational(Rational),
    Expr(SymExpr),
    Element(RationalFunction),
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Rational(r) => write!(f, "{}", r),
            Self::Expr(expr) => write!(f, "{}", expr),
            Self::Element(element) => write!(f, "{}", element),
        }
    }
}

impl From<i32> for Coefficient {
    fn from(n: i32) -> Self {
        Self::Integer(Integer::from(n))
    }
}

impl From<i64> for Coefficient {
    fn from(n: i64) -> Self {
        Self::Integer(Integer::from(n))
    }
}

impl From<Integer> for Coefficient {
    fn from(n: Integer) -> Self {
        Self::Integer(n)
    }
}

impl From<Rational> for Coefficient {
    fn from(r: Rational) -> Self {
        Self::Rational(r)
    }
}

impl From<SymExpr> for Coefficient {
    fn from(expr: SymExpr) -> Self {
        Self::Expr(expr)
    }
}

impl From<RationalFunction> for Coefficient {
    fn from(f: RationalFunction) -> Self {
        Self::Element(f)
    }
}

impl From<&RationalFunction> for Coefficient {
    fn from(f: &RationalFunction) -> Self {
        Self::Element(f.clone())
    }
}

/// A univariate base ring: ℤ\[x\], ℚ\[x\] or ℚ(x) in a named indeterminate.
///
/// All elements are represented as [`RationalFunction`]s; the [`Domain`] only restricts which
/// values [`PolyRing::coerce`] admits. Results of ring arithmetic (for example, the reduction
/// steps of a closure search) may leave the domain, and are kept as they are.
#[derive(Debug, Clone)]
pub struct PolyRing {
    id: RingId,
    var: String,
    domain: Domain,
}

impl PolyRing {
    /// Creates a new ring with a fresh identity.
    pub fn new(var: impl Into<String>, domain: Domain) -> Self {
        Self { id: RingId::fresh(), var: var.into(), domain }
    }

    /// ℤ\[var\].
    pub fn integers(var: impl Into<String>) -> Self {
        Self::new(var, Domain::Integers)
    }

    /// ℚ\[var\].
    pub fn rationals(var: impl Into<String>) -> Self {
        Self::new(var, Domain::Rationals)
    }

    /// ℚ(var).
    pub fn fractions(var: impl Into<String>) -> Self {
        Self::new(var, Domain::Fractions)
    }

    pub fn id(&self) -> RingId {
        self.id
    }

    /// The name of the indeterminate.
    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn zero(&self) -> RationalFunction {
        RationalFunction::zero()
    }

    pub fn one(&self) -> RationalFunction {
        RationalFunction::one()
    }

    /// The indeterminate as a ring element.
    pub fn gen(&self) -> RationalFunction {
        RationalFunction::x()
    }

    /// Returns true if the domain of this ring admits `f`.
    pub fn contains(&self, f: &RationalFunction) -> bool {
        match self.domain {
            Domain::Fractions => true,
            Domain::Rationals => f.is_polynomial(),
            Domain::Integers => {
                f.as_poly().is_some_and(|p| p.coefficients().iter().all(|c| *c.denom() == 1))
            },
        }
    }

    /// Converts a value into an element of this ring.
    pub fn coerce(&self, value: impl Into<Coefficient>) -> Result<RationalFunction, CoercionError> {
        let element = match value.into() {
            Coefficient::Integer(n) => return Ok(RationalFunction::constant(Rational::from(n))),
            Coefficient::Rational(r) => RationalFunction::constant(r),
            Coefficient::Expr(expr) => self.from_sym(&expr)?,
            Coefficient::Element(f) => f,
        };

        if self.contains(&element) {
            Ok(element)
        } else {
            Err(CoercionError::NotInDomain {
                value: self.display(&element).to_string(),
                ring: self.to_string(),
            })
        }
    }

    /// Interprets a symbolic expression as a rational function of the indeterminate.
    pub fn from_sym(&self, expr: &SymExpr) -> Result<RationalFunction, CoercionError> {
        match expr {
            SymExpr::Primary(Primary::Integer(n)) => Ok(RationalFunction::constant(Rational::from(n))),
            SymExpr::Primary(Primary::Symbol(sym)) => {
                if *sym == self.var {
                    Ok(RationalFunction::x())
                } else {
                    Err(CoercionError::UnknownSymbol(sym.clone()))
                }
            },
            SymExpr::Primary(Primary::Call(..)) => Err(CoercionError::NotRational(expr.to_string())),
            SymExpr::Add(terms) => terms.iter().try_fold(RationalFunction::zero(), |acc, term| {
                Ok(&acc + &self.from_sym(term)?)
            }),
            SymExpr::Mul(factors) => factors.iter().try_fold(RationalFunction::one(), |acc, factor| {
                Ok(&acc * &self.from_sym(factor)?)
            }),
            SymExpr::Exp(base, exp) => {
                let n = exp
                    .as_integer()
                    .and_then(Integer::to_i64)
                    .ok_or_else(|| CoercionError::NonIntegerExponent(expr.to_string()))?;
                self.from_sym(base)?.pow(n).ok_or(CoercionError::DivisionByZero)
            },
        }
    }

    /// Converts a ring element into a symbolic expression in the indeterminate.
    pub fn to_sym(&self, f: &RationalFunction) -> SymExpr {
        let num = self.poly_to_sym(f.numer());
        if f.is_polynomial() {
            num
        } else {
            make_fraction(num, self.poly_to_sym(f.denom()))
        }
    }

    fn poly_to_sym(&self, p: &Poly) -> SymExpr {
        let mut terms = Vec::new();
        for (k, c) in p.coefficients().iter().enumerate() {
            if c.cmp0().is_eq() {
                continue;
            }

            let power = match k {
                0 => None,
                1 => Some(SymExpr::symbol(&self.var)),
                _ => Some(SymExpr::symbol(&self.var).pow(SymExpr::int(k as u64))),
            };
            let coeff = rational_to_sym(c);
            terms.push(match power {
                None => coeff,
                Some(power) if *c == 1 => power,
                Some(power) => coeff * power,
            });
        }
        SymExpr::Add(terms).downgrade()
    }

    /// Displays an element of this ring using the ring's indeterminate.
    pub fn display<'a>(&'a self, f: &'a RationalFunction) -> impl fmt::Display + 'a {
        ElementDisplay { var: &self.var, element: f }
    }
}

fn rational_to_sym(c: &Rational) -> SymExpr {
    if *c.denom() == 1 {
        SymExpr::from(c.numer().clone())
    } else {
        make_fraction(SymExpr::from(c.numer().clone()), SymExpr::from(c.denom().clone()))
    }
}

struct ElementDisplay<'a> {
    var: &'a str,
    element: &'a RationalFunction,
}

impl fmt::Display for ElementDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.element.fmt_in(self.var, f)
    }
}

/// Rings are equal when they are the same ring, i.e. have the same [`RingId`].
impl PartialEq for PolyRing {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PolyRing {}

impl fmt::Display for PolyRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.domain {
            Domain::Integers => write!(f, "ZZ[{}]", self.var),
            Domain::Rationals => write!(f, "QQ[{}]", self.var),
            Domain::Fractions => write!(f, "QQ({})", self.var),
        }
    }
}
