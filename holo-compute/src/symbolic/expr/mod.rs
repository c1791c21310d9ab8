//! A representation of mathematical expressions that is easy to manipulate.
//!
//! [`SymExpr`] is the symbolic currency of this crate: coefficients of differential operators are
//! converted from and to it, and differential operators act on it (see
//! [`DifferentialOperator::apply`](crate::holonomic::DifferentialOperator::apply)). The tree is
//! **flattened**: `x + (y + z)` is a single [`SymExpr::Add`] node with three children, so that
//! terms and factors sit at the same level and are easy to walk.
//!
//! Fractions are represented canonically as a product of the numerator and the denominator
//! raised to the power of `-1` (see [`make_fraction`]).
//!
//! # Strict equality
//!
//! Deciding whether two expressions are mathematically equal is hard in general (`x^2 + 2x + 1`
//! and `(x + 1)^2` are equal, but only after expansion). [`SymExpr`] therefore implements a
//! subset of semantic equality, called **strict equality**. Two expressions are strictly equal
//! if:
//!
//! - They are the same type of expression (i.e. both [`SymExpr::Primary`], both
//! [`SymExpr::Add`], etc.).
//! - If both are [`SymExpr::Primary`], both expressions must have strictly equal values.
//! - If both are [`SymExpr::Add`] or [`SymExpr::Mul`], both expressions must have strictly equal
//! terms / factors, in any order.
//! - If both are [`SymExpr::Exp`], both expressions must have strictly equal base and exponent.
//!
//! Strict equality can **never** report false positives, which is all that the exact arithmetic
//! of [`RationalFunction`](crate::poly::RationalFunction) needs: anything that must be compared
//! semantically is converted into the base ring first.

mod iter;

use crate::primitive::int;
use crate::symbolic::fraction::make_fraction;
use iter::ExprIter;
use rug::Integer;
use std::{cmp::Ordering, ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub}};

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primary {
    /// An integer, such as `2` or `144`.
    Integer(Integer),

    /// A variable, such as `x` or `y`.
    Symbol(String),

    /// A function call, such as `sin(x)` or `exp(2 * x)`.
    Call(String, Vec<SymExpr>),
}

impl std::fmt::Display for Primary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(num) => write!(f, "{}", num),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

/// Adds two [`Primary`]s together. If both are integers, the numbers are added together.
/// Otherwise, the two [`Primary`]s are wrapped in an [`SymExpr::Add`].
impl Add<Primary> for Primary {
    type Output = SymExpr;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs + rhs))
            },
            (lhs, rhs) => SymExpr::Add(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// Multiplies two [`Primary`]s together. If both are integers, the numbers are multiplied
/// together. Otherwise, the two [`Primary`]s are wrapped in an [`SymExpr::Mul`].
impl Mul<Primary> for Primary {
    type Output = SymExpr;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs * rhs))
            },
            (lhs, rhs) => SymExpr::Mul(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// A mathematical expression with information about its terms and factors.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, Eq)]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

impl std::fmt::Display for SymExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        write!(f, " + {}", term)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut iter = factors.iter();
                if let Some(factor) = iter.next() {
                    if matches!(factor.cmp_precedence(self), Ordering::Less) {
                        write!(f, "({})", factor)?;
                    } else {
                        write!(f, "{}", factor)?;
                    }
                    for factor in iter {
                        if matches!(factor.cmp_precedence(self), Ordering::Less) {
                            write!(f, " * ({})", factor)?;
                        } else {
                            write!(f, " * {}", factor)?;
                        }
                    }
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                // `^` is right-associative, so a power in the base must be parenthesized
                if !matches!(base.cmp_precedence(self), Ordering::Greater) {
                    write!(f, "({})", base)?;
                } else {
                    write!(f, "{}", base)?;
                }
                write!(f, "^")?;
                if matches!(exp.cmp_precedence(self), Ordering::Less) {
                    write!(f, "({})", exp)?;
                } else {
                    write!(f, "{}", exp)?;
                }
                Ok(())
            },
        }
    }
}

impl SymExpr {
    /// Creates an integer expression.
    pub fn int<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Primary(Primary::Integer(int(n)))
    }

    /// Creates a symbol expression.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// Creates a function call expression, such as `exp(x)`.
    pub fn call(name: impl Into<String>, args: Vec<SymExpr>) -> Self {
        Self::Primary(Primary::Call(name.into(), args))
    }

    /// Creates the fraction `numerator / denominator`. No simplification is done.
    pub fn frac(numerator: SymExpr, denominator: SymExpr) -> Self {
        make_fraction(numerator, denominator)
    }

    /// Raises this expression to the given power. No simplification is done.
    pub fn pow(self, exp: SymExpr) -> Self {
        Self::Exp(Box::new(self), Box::new(exp))
    }

    /// Returns the binding strength of the expression when printed. Higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Self::Add(_) => 0,
            Self::Mul(_) => 1,
            Self::Exp(_, _) => 2,
            Self::Primary(Primary::Integer(n)) if *n < 0 => 0,
            Self::Primary(_) => 3,
        }
    }

    /// Compares the precedence of this expression with the given expression.
    ///
    /// This is used to determine if parentheses are needed around the given expression when
    /// printing.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.precedence().cmp(&other.precedence())
    }

    /// If the expression is a [`Primary::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// Returns true if the symbol `name` occurs anywhere in the expression.
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|expr| expr.as_symbol() == Some(name))
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`SymExpr::Add`] with zero / one term, or an
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or an [`SymExpr::Primary`]
    /// containing the integer 0 or 1.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::int(0)
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::int(1)
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns the square root of this expression. No simplification is done.
    pub fn sqrt(self) -> Self {
        self.pow(make_fraction(Self::int(1), Self::int(2)))
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                lhs.len() == rhs.len()
                    && lhs.iter().all(|lhs| rhs.contains(lhs))
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

impl From<i64> for SymExpr {
    fn from(n: i64) -> Self {
        Self::int(n)
    }
}

impl From<Integer> for SymExpr {
    fn from(n: Integer) -> Self {
        Self::Primary(Primary::Integer(n))
    }
}

/// Adds two [`SymExpr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Primary`] and / or [`SymExpr::Add`], in which case both are combined
/// in one list of terms (flattening).
impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs + rhs,
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) | (other, Self::Add(mut terms)) => {
                terms.push(other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

/// Adds two [`SymExpr`]s together. The behavior is the same as [`Add`], except we can reuse the
/// allocated memory of `self` if possible.
impl AddAssign for SymExpr {
    fn add_assign(&mut self, rhs: Self) {
        match (self, rhs) {
            (Self::Primary(Primary::Integer(lhs)), Self::Primary(Primary::Integer(rhs))) => {
                *lhs += rhs;
            },
            (Self::Add(terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
            },
            (Self::Add(terms), other) => {
                terms.push(other);
            },
            (other, Self::Add(mut terms)) => {
                let owned = std::mem::replace(other, Self::Add(Vec::new()));
                terms.push(owned);
                *other = Self::Add(terms);
            },
            (lhs, rhs) => {
                let owned = std::mem::replace(lhs, Self::Add(Vec::new()));
                *lhs = Self::Add(vec![owned, rhs]);
            },
        }
    }
}

/// Subtracts two [`SymExpr`]s, as `lhs + -1 * rhs`.
impl Sub for SymExpr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + rhs.neg()
    }
}

/// Multiplies two [`SymExpr`]s together. No simplification is done, except for the case where
/// the operands are a mix of [`Primary`] and / or [`SymExpr::Mul`], in which case both are
/// combined in one list of factors (flattening).
impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs * rhs,
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) | (other, Self::Mul(mut factors)) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for SymExpr {
    fn mul_assign(&mut self, rhs: Self) {
        match (self, rhs) {
            (Self::Primary(Primary::Integer(lhs)), Self::Primary(Primary::Integer(rhs))) => {
                *lhs *= rhs;
            },
            (Self::Mul(factors), Self::Mul(rhs_factors)) => {
                factors.extend(rhs_factors);
            },
            (Self::Mul(factors), other) => {
                factors.push(other);
            },
            (other, Self::Mul(mut factors)) => {
                let owned = std::mem::replace(other, Self::Mul(Vec::new()));
                factors.push(owned);
                *other = Self::Mul(factors);
            },
            (lhs, rhs) => {
                let owned = std::mem::replace(lhs, Self::Mul(Vec::new()));
                *lhs = Self::Mul(vec![owned, rhs]);
            },
        }
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is an integer, in which case the number is negated.
impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Integer(int)) => Self::Primary(Primary::Integer(-int)),
            expr => Self::int(-1) * expr,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn y() -> SymExpr {
        SymExpr::symbol("y")
    }

    #[test]
    fn strict_equality() {
        // 2 * (x + (y - 5)) and (y - 5 + x) * 2
        let a = SymExpr::int(2) * (x() + (y() - SymExpr::int(5)));
        let b = (y() - SymExpr::int(5) + x()) * SymExpr::int(2);
        assert_eq!(a, b);
    }

    #[test]
    fn strict_equality_2() {
        // these are NOT strictly equal (but are semantically equal)
        let a = SymExpr::int(2) * (x() + y());
        let b = SymExpr::int(2) * x() + SymExpr::int(2) * y();
        assert_ne!(a, b);
    }

    #[test]
    fn flattens_sums_and_products() {
        let sum = x() + (y() + SymExpr::int(3));
        assert_eq!(sum, SymExpr::Add(vec![x(), y(), SymExpr::int(3)]));

        let product = (x() * y()) * (SymExpr::int(2) * x());
        assert_eq!(product, SymExpr::Mul(vec![x(), y(), SymExpr::int(2), x()]));
    }

    #[test]
    fn integers_fold() {
        assert_eq!(SymExpr::int(2) + SymExpr::int(5), SymExpr::int(7));
        assert_eq!(SymExpr::int(2) * SymExpr::int(-5), SymExpr::int(-10));
        assert_eq!(-SymExpr::int(4), SymExpr::int(-4));

        let mut acc = SymExpr::int(1);
        acc += SymExpr::int(2);
        acc *= SymExpr::int(3);
        assert_eq!(acc, SymExpr::int(9));
    }

    #[test]
    fn assign_ops_flatten() {
        let mut acc = x();
        acc += y();
        acc += SymExpr::int(1);
        assert_eq!(acc, SymExpr::Add(vec![x(), y(), SymExpr::int(1)]));

        let mut acc = x();
        acc *= SymExpr::Mul(vec![y(), SymExpr::int(2)]);
        assert_eq!(acc, SymExpr::Mul(vec![y(), SymExpr::int(2), x()]));
    }

    #[test]
    fn downgrade_trivial_nodes() {
        assert_eq!(SymExpr::Add(vec![]).downgrade(), SymExpr::int(0));
        assert_eq!(SymExpr::Mul(vec![]).downgrade(), SymExpr::int(1));
        assert_eq!(SymExpr::Mul(vec![x()]).downgrade(), x());
    }

    #[test]
    fn contains_symbol() {
        let expr = SymExpr::call("exp", vec![SymExpr::int(2) * x()]) + y().pow(SymExpr::int(3));
        assert!(expr.contains_symbol("x"));
        assert!(expr.contains_symbol("y"));
        assert!(!expr.contains_symbol("z"));
    }

    #[test]
    fn fmt_expr() {
        let expr = SymExpr::int(8) * x().pow(SymExpr::int(73))
            * SymExpr::call("sqrt", vec![SymExpr::int(2634) * x()]);
        assert_eq!(expr.to_string(), "8 * x^73 * sqrt(2634 * x)");
    }

    #[test]
    fn fmt_expr_2() {
        let expr = (x() + y()).pow(SymExpr::int(-1)) * SymExpr::int(-3);
        assert_eq!(expr.to_string(), "(x + y)^(-1) * (-3)");
    }
}
