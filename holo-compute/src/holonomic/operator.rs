use crate::poly::{Coefficient, RationalFunction};
use crate::symbolic::derivative::{derivative, MultBuilder, SumBuilder};
use crate::symbolic::SymExpr;
use holo_error::Error;
use std::fmt;
use std::rc::Rc;
use super::error::{
    binary_error,
    CoercionFailed,
    EmptyCoefficients,
    ExponentTooLarge,
    IncompatibleAlgebras,
    UnsupportedDerivative,
    UnsupportedExponent,
};
use super::OperatorAlgebra;

/// Sums two coefficient lists elementwise over their common prefix; the tail of the longer list
/// is appended unchanged.
pub(crate) fn add_lists(lhs: &[RationalFunction], rhs: &[RationalFunction]) -> Vec<RationalFunction> {
    let (long, short) = if lhs.len() >= rhs.len() { (lhs, rhs) } else { (rhs, lhs) };
    let mut sum = long.to_vec();
    for (s, c) in sum.iter_mut().zip(short) {
        *s = &*s + c;
    }
    sum
}

/// Computes the coefficients of `Dx · L` from those of `L`, using `Dx·c = c·Dx + c'`.
fn dx_times(coeffs: &[RationalFunction]) -> Vec<RationalFunction> {
    let shifted = std::iter::once(RationalFunction::zero())
        .chain(coeffs.iter().cloned())
        .collect::<Vec<_>>();
    let derived = coeffs.iter().map(RationalFunction::derivative).collect::<Vec<_>>();
    add_lists(&shifted, &derived)
}

/// A differential operator `Σ cᵢ·Dxⁱ` with coefficients in the base ring of its
/// [`OperatorAlgebra`].
///
/// The coefficient list is never empty; `coefficients()[i]` is the coefficient of `Dxⁱ`.
/// Trailing zero coefficients are kept as they are, so the [`order`](Self::order) is the length
/// of the list minus one, and two operators are only equal if their lists are.
///
/// Operators are values: every operation returns a new operator. Binary operations fail with
/// [`IncompatibleAlgebras`] if the operands come from different algebras, and operations taking
/// a scalar fail with [`CoercionFailed`] if the base ring does not admit it.
#[derive(Debug, Clone)]
pub struct DifferentialOperator {
    coeffs: Vec<RationalFunction>,
    algebra: Rc<OperatorAlgebra>,
}

#[allow(clippy::should_implement_trait)]
impl DifferentialOperator {
    /// Creates an operator from its coefficients, lowest power of `Dx` first. Each coefficient
    /// is coerced into the base ring of the algebra.
    pub fn new<C: Into<Coefficient>>(
        coefficients: impl IntoIterator<Item = C>,
        algebra: &Rc<OperatorAlgebra>,
    ) -> Result<Self, Error> {
        let coeffs = coefficients
            .into_iter()
            .map(|c| coerce(algebra, c))
            .collect::<Result<Vec<_>, _>>()?;

        if coeffs.is_empty() {
            return Err(Error::whole("[]", EmptyCoefficients));
        }

        Ok(Self { coeffs, algebra: Rc::clone(algebra) })
    }

    /// Creates an operator from coefficients that are already ring elements. An empty list is
    /// treated as the zero operator.
    pub(crate) fn from_elements(mut coeffs: Vec<RationalFunction>, algebra: &Rc<OperatorAlgebra>) -> Self {
        if coeffs.is_empty() {
            coeffs.push(RationalFunction::zero());
        }
        Self { coeffs, algebra: Rc::clone(algebra) }
    }

    /// The coefficients, lowest power of `Dx` first.
    pub fn coefficients(&self) -> &[RationalFunction] {
        &self.coeffs
    }

    /// The length of the coefficient list minus one.
    pub fn order(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn algebra(&self) -> &Rc<OperatorAlgebra> {
        &self.algebra
    }

    /// Returns true if every coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(RationalFunction::is_zero)
    }

    /// The coefficient of the highest power of `Dx` with a non-zero coefficient, or [`None`] for
    /// the zero operator.
    pub fn leading_coefficient(&self) -> Option<&RationalFunction> {
        self.coeffs.iter().rev().find(|c| !c.is_zero())
    }

    /// Returns the same operator without trailing zero coefficients. The zero operator becomes
    /// `[0]`.
    pub fn trimmed(&self) -> Self {
        let len = self.coeffs.iter().rposition(|c| !c.is_zero()).map_or(1, |i| i + 1);
        Self { coeffs: self.coeffs[..len].to_vec(), algebra: Rc::clone(&self.algebra) }
    }

    /// Returns an error if `other` does not belong to the same algebra as `self`.
    pub(crate) fn check_algebra(&self, op: &str, other: &Self) -> Result<(), Error> {
        if *self.algebra == *other.algebra {
            Ok(())
        } else {
            Err(binary_error(
                &self.to_string(),
                op,
                &other.to_string(),
                IncompatibleAlgebras {
                    lhs: self.algebra.base().to_string(),
                    rhs: other.algebra.base().to_string(),
                },
            ))
        }
    }

    /// Multiplies two operators of the same algebra, `self · other`.
    pub fn mul(&self, other: &Self) -> Result<Self, Error> {
        self.check_algebra("*", other)?;
        Ok(self.mul_unchecked(other))
    }

    /// Ore multiplication. Writing `self = Σ aᵢ·Dxⁱ`, the product is `Σ aᵢ·(Dxⁱ·other)`, where
    /// `Dxⁱ·other` is built up one `Dx` at a time.
    pub(crate) fn mul_unchecked(&self, other: &Self) -> Self {
        self.mul_list(&other.coeffs)
    }

    fn mul_list(&self, other: &[RationalFunction]) -> Self {
        let mut product = other.iter().map(|c| &self.coeffs[0] * c).collect::<Vec<_>>();
        let mut dx_pow_other = other.to_vec();

        for a in &self.coeffs[1..] {
            dx_pow_other = dx_times(&dx_pow_other);
            let term = dx_pow_other.iter().map(|c| a * c).collect::<Vec<_>>();
            product = add_lists(&product, &term);
        }

        Self::from_elements(product, &self.algebra)
    }

    /// Left-multiplies every coefficient by the scalar `c`, giving `c · self`.
    pub fn scale(&self, c: impl Into<Coefficient>) -> Result<Self, Error> {
        let c = coerce(&self.algebra, c)?;
        Ok(self.scale_element(&c))
    }

    fn scale_element(&self, c: &RationalFunction) -> Self {
        let coeffs = self.coeffs.iter().map(|a| c * a).collect();
        Self::from_elements(coeffs, &self.algebra)
    }

    /// Right-multiplies by the scalar `c`, giving `self · c`. Unlike [`scale`](Self::scale),
    /// this differentiates `c`: `Dx · x = x·Dx + 1`.
    pub fn mul_scalar(&self, c: impl Into<Coefficient>) -> Result<Self, Error> {
        let c = coerce(&self.algebra, c)?;
        Ok(self.mul_list(&[c]))
    }

    /// Adds two operators of the same algebra.
    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        self.check_algebra("+", other)?;
        Ok(Self::from_elements(add_lists(&self.coeffs, &other.coeffs), &self.algebra))
    }

    /// Adds the scalar `c`, which only changes the coefficient of `Dx⁰`.
    pub fn add_scalar(&self, c: impl Into<Coefficient>) -> Result<Self, Error> {
        let c = coerce(&self.algebra, c)?;
        Ok(self.add_element(&c))
    }

    fn add_element(&self, c: &RationalFunction) -> Self {
        let mut coeffs = self.coeffs.clone();
        coeffs[0] = &coeffs[0] + c;
        Self::from_elements(coeffs, &self.algebra)
    }

    /// Subtracts two operators of the same algebra, `self + (-1)·other`.
    pub fn sub(&self, other: &Self) -> Result<Self, Error> {
        self.check_algebra("-", other)?;
        Ok(Self::from_elements(add_lists(&self.coeffs, &other.neg().coeffs), &self.algebra))
    }

    /// Subtracts the scalar `c`, giving `self - c`.
    pub fn sub_scalar(&self, c: impl Into<Coefficient>) -> Result<Self, Error> {
        let c = coerce(&self.algebra, c)?;
        Ok(self.add_element(&-c))
    }

    /// Subtracts this operator from the scalar `c`, giving `c - self`.
    pub fn rsub_scalar(&self, c: impl Into<Coefficient>) -> Result<Self, Error> {
        let c = coerce(&self.algebra, c)?;
        Ok(self.neg().add_element(&c))
    }

    /// Negates every coefficient.
    pub fn neg(&self) -> Self {
        let coeffs = self.coeffs.iter().map(|c| -c).collect();
        Self::from_elements(coeffs, &self.algebra)
    }

    /// Raises the operator to a non-negative integer power by repeated squaring.
    pub fn pow(&self, n: i64) -> Result<Self, Error> {
        match u64::try_from(n) {
            Ok(n) => self.checked_pow(n),
            Err(_) => Err(binary_error(
                &self.to_string(),
                "**",
                &n.to_string(),
                UnsupportedExponent { exponent: n.to_string() },
            )),
        }
    }

    /// Raises the operator to the power given by an expression, which must be a non-negative
    /// integer.
    pub fn pow_expr(&self, n: &SymExpr) -> Result<Self, Error> {
        match n.as_integer().and_then(|n| n.to_u64()) {
            Some(n) => self.checked_pow(n),
            None => Err(binary_error(
                &self.to_string(),
                "**",
                &n.to_string(),
                UnsupportedExponent { exponent: n.to_string() },
            )),
        }
    }

    /// Fails with [`ExponentTooLarge`] if the coefficient list of `self**n` cannot be allocated.
    fn checked_pow(&self, n: u64) -> Result<Self, Error> {
        let len = usize::try_from(n)
            .ok()
            .and_then(|n| n.checked_mul(self.order()))
            .and_then(|order| order.checked_add(1));
        let mut coeffs = Vec::new();
        let Some(len) = len.filter(|&len| coeffs.try_reserve_exact(len).is_ok()) else {
            return Err(binary_error(
                &self.to_string(),
                "**",
                &n.to_string(),
                ExponentTooLarge { exponent: n.to_string() },
            ));
        };

        // Dx**n = [0, ..., 0, 1]
        if n > 1 && self.is_derivative_operator() {
            coeffs.resize(len - 1, RationalFunction::zero());
            coeffs.push(RationalFunction::one());
            return Ok(Self::from_elements(coeffs, &self.algebra));
        }
        Ok(self.square_and_multiply(n))
    }

    fn square_and_multiply(&self, n: u64) -> Self {
        match n {
            0 => Self::from_elements(vec![RationalFunction::one()], &self.algebra),
            1 => self.clone(),
            _ if n % 2 == 1 => self.square_and_multiply(n - 1).mul_unchecked(self),
            _ => {
                let half = self.square_and_multiply(n / 2);
                half.mul_unchecked(&half)
            },
        }
    }

    fn is_derivative_operator(&self) -> bool {
        matches!(self.coeffs.as_slice(), [zero, one] if zero.is_zero() && one.is_one())
    }

    /// Applies the operator to an expression in the base ring's indeterminate, computing
    /// `Σ cᵢ · dⁱf/dxⁱ`.
    pub fn apply(&self, f: &SymExpr) -> Result<SymExpr, Error> {
        let base = self.algebra.base();
        let var = base.var();

        let mut sum = SumBuilder::default();
        let mut nth_derivative = f.clone();
        for (i, c) in self.coeffs.iter().enumerate() {
            if i > 0 {
                nth_derivative = derivative(&nth_derivative, var).map_err(|err| {
                    binary_error(
                        &self.to_string(),
                        "·",
                        &f.to_string(),
                        UnsupportedDerivative { expr: err.expr().to_string() },
                    )
                })?;
            }

            if !c.is_zero() {
                let mut term = MultBuilder::default();
                term.mult(base.to_sym(c));
                term.mult(nth_derivative.clone());
                sum.add(term.into());
            }
        }

        Ok(sum.into())
    }
}

/// Coerces a scalar into the base ring of `algebra`.
fn coerce(algebra: &OperatorAlgebra, value: impl Into<Coefficient>) -> Result<RationalFunction, Error> {
    let value = value.into();
    let rendered = value.to_string();
    algebra.base().coerce(value).map_err(|err| {
        Error::whole(
            rendered,
            CoercionFailed { ring: algebra.base().to_string(), reason: err.to_string() },
        )
    })
}

/// Operators are equal when they have the same coefficient list and belong to the same algebra.
impl PartialEq for DifferentialOperator {
    fn eq(&self, other: &Self) -> bool {
        self.coeffs == other.coeffs && *self.algebra == *other.algebra
    }
}

/// An operator equals a scalar when it has order zero and its only coefficient is the scalar.
impl PartialEq<RationalFunction> for DifferentialOperator {
    fn eq(&self, other: &RationalFunction) -> bool {
        matches!(self.coeffs.as_slice(), [c] if c == other)
    }
}

impl fmt::Display for DifferentialOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.algebra.base();
        let generator = self.algebra.generator();
        let mut first = true;

        for (i, c) in self.coeffs.iter().enumerate() {
            if c.is_zero() {
                continue;
            }

            if !first {
                write!(f, " + ")?;
            }
            first = false;

            write!(f, "({})", base.display(c))?;
            match i {
                0 => {},
                1 => write!(f, "{}", generator)?,
                _ => write!(f, "{}**{}", generator, i)?,
            }
        }

        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
