use crate::primitive::int;

use super::expr::Primary;
use super::fraction::make_fraction;
use super::SymExpr;

mod function;

/// Returns `true` if the given [`SymExpr`] is "clearly" zero. This is intended to clean up
/// expression trees and is not mathematically rigorous.
fn is_trivially_zero(e: &SymExpr) -> bool {
    match e {
        SymExpr::Primary(Primary::Integer(i)) => i.is_zero(),
        SymExpr::Add(sum) => sum.iter().all(is_trivially_zero),
        SymExpr::Mul(mul) => mul.iter().any(is_trivially_zero),
        SymExpr::Exp(base, exponent) => is_trivially_zero(base) && !is_trivially_zero(exponent),
        _ => false,
    }
}

/// Returns `true` if the given [`SymExpr`] is "clearly" one. This is intended to clean up
/// expression trees and is not mathematically rigorous.
fn is_trivially_unity(e: &SymExpr) -> bool {
    match e {
        SymExpr::Primary(Primary::Integer(i)) => *i == 1,
        SymExpr::Mul(exprs) => exprs.iter().all(is_trivially_unity),
        SymExpr::Exp(base, exponent) => is_trivially_zero(exponent) || is_trivially_unity(base),
        SymExpr::Add(exprs) => exprs.len() == 1 && is_trivially_unity(&exprs[0]),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
pub(crate) struct MultBuilder(Vec<SymExpr>);

impl From<MultBuilder> for SymExpr {
    fn from(value: MultBuilder) -> Self {
        SymExpr::Mul(value.0).downgrade()
    }
}

impl MultBuilder {
    pub(crate) fn mult(&mut self, e: SymExpr) {
        if is_trivially_zero(&e) || self.0.first().is_some_and(is_trivially_zero) {
            self.0 = vec![SymExpr::int(0)];
            return;
        }

        if !is_trivially_unity(&e) {
            self.0.push(e)
        }
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum.
#[derive(Default)]
pub(crate) struct SumBuilder(Vec<SymExpr>);

impl From<SumBuilder> for SymExpr {
    fn from(value: SumBuilder) -> Self {
        SymExpr::Add(value.0).downgrade()
    }
}

impl SumBuilder {
    pub(crate) fn add(&mut self, e: SymExpr) {
        if !is_trivially_zero(&e) {
            self.0.push(e)
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(exprs: &[SymExpr], with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let mut sum = SumBuilder::default();
    for elem in exprs {
        sum.add(derivative(elem, with)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(product: &[SymExpr], with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let mut outer_sum = SumBuilder::default();

    for derivative_index in 0..product.len() {
        let mut inner_mult = MultBuilder::default();
        for (term_index, term) in product.iter().enumerate() {
            if derivative_index == term_index {
                inner_mult.mult(derivative(term, with)?);
            } else {
                inner_mult.mult(term.clone());
            }
        }

        outer_sum.add(inner_mult.into());
    }

    Ok(outer_sum.into())
}

/// `(u^c)' = c * u^(c - 1) * u'` when `c` does not depend on the variable, and
/// `(a^v)' = a^v * ln(a) * v'` when `a` does not.
fn power_rule(base: &SymExpr, exp: &SymExpr, with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let mut mult_group = MultBuilder::default();
    match (base.contains_symbol(with), exp.contains_symbol(with)) {
        (_, false) => {
            let lowered = match exp.as_integer() {
                Some(n) => SymExpr::from(n.clone() - int(1)),
                None => exp.clone() + SymExpr::int(-1),
            };
            mult_group.mult(exp.clone());
            mult_group.mult(base.clone().pow(lowered));
            mult_group.mult(derivative(base, with)?);
        },
        (false, true) => {
            mult_group.mult(base.clone().pow(exp.clone()));
            mult_group.mult(SymExpr::call("ln", vec![base.clone()]));
            mult_group.mult(derivative(exp, with)?);
        },
        (true, true) => {
            return Err(SymbolicDerivativeError::Unsupported(base.clone().pow(exp.clone())));
        },
    }
    Ok(mult_group.into())
}

/// Reasons a derivative could not be computed symbolically.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicDerivativeError {
    /// The function may be differentiable, but we do not support symbolically computing it yet.
    Unsupported(SymExpr),

    /// The provided sub-expression is not differentiable (for example, a known function called
    /// with the wrong number of arguments).
    Undifferentiable(SymExpr),
}

impl SymbolicDerivativeError {
    /// The sub-expression that could not be differentiated.
    pub fn expr(&self) -> &SymExpr {
        match self {
            Self::Unsupported(expr) | Self::Undifferentiable(expr) => expr,
        }
    }
}

/// Computes the derivative of the given expression with respect to the variable `with`. Returns
/// [`Err`] if the derivative could not be symbolically computed.
pub fn derivative(f: &SymExpr, with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    if is_trivially_zero(f) {
        return Ok(SymExpr::int(0));
    }

    let expr = match f {
        SymExpr::Primary(Primary::Integer(_)) => SymExpr::int(0),
        SymExpr::Primary(Primary::Symbol(sym)) => {
            if sym == with {
                SymExpr::int(1)
            } else {
                SymExpr::int(0)
            }
        },
        SymExpr::Primary(Primary::Call(func, args)) => function::function_derivative(func, args, with)?,
        SymExpr::Add(exprs) => sum_rule(exprs, with)?,
        SymExpr::Mul(exprs) => product_rule(exprs, with)?,
        SymExpr::Exp(base, exp) => power_rule(base, exp, with)?,
    };

    if is_trivially_zero(&expr) {
        Ok(SymExpr::int(0))
    } else {
        Ok(expr)
    }
}

/// Computes the `n`-th derivative of the given expression with respect to `with`.
pub fn nth_derivative(f: &SymExpr, with: &str, n: usize) -> Result<SymExpr, SymbolicDerivativeError> {
    let mut current = f.clone();
    for _ in 0..n {
        current = derivative(&current, with)?;
    }
    Ok(current)
}

/// `1 / u` as an expression.
pub(crate) fn recip(u: SymExpr) -> SymExpr {
    make_fraction(SymExpr::int(1), u)
}

#[cfg(test)]
mod tests {
    use crate::primitive::float;
    use crate::symbolic::eval::eval;
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    /// Evaluates an expression at `x = at` as a 64-bit float.
    fn eval_x(e: &SymExpr, at: f64) -> f64 {
        eval(e, "x", &float(at)).expect("expression should evaluate").to_f64()
    }

    /// Performs a central finite difference to approximate the derivative of the expression.
    fn finite_difference(e: &SymExpr, at: f64) -> f64 {
        const DX: f64 = 0.00001;
        (eval_x(e, at + DX) - eval_x(e, at - DX)) / (2.0 * DX)
    }

    fn test_for_function(function: &SymExpr, points: impl IntoIterator<Item = f64>) {
        const TOL: f64 = 0.0001;

        let symbolic = derivative(function, "x")
            .unwrap_or_else(|err| panic!("derivative of {function} failed: {err:?}"));

        for point in points.into_iter() {
            let symbolically_computed = eval_x(&symbolic, point);
            let numerically_computed = finite_difference(function, point);

            assert!(
                (symbolically_computed - numerically_computed).abs() < TOL,
                "For \"{function}\" at x={point}, symbolically computed derivative was {symbolically_computed} but numerically computed derivative was {numerically_computed}, which was out of tolerance {TOL}",
            );
        }
    }

    #[test]
    fn constants_and_symbols() {
        assert_eq!(derivative(&SymExpr::int(5), "x").unwrap(), SymExpr::int(0));
        assert_eq!(derivative(&x(), "x").unwrap(), SymExpr::int(1));
        assert_eq!(derivative(&SymExpr::symbol("y"), "x").unwrap(), SymExpr::int(0));
    }

    #[test]
    fn power_rule_integer() {
        // d/dx x^3 = 3 * x^2
        let d = derivative(&x().pow(SymExpr::int(3)), "x").unwrap();
        assert_eq!(d, SymExpr::Mul(vec![SymExpr::int(3), x().pow(SymExpr::int(2))]));
    }

    #[test]
    fn polynomial() {
        let p = x().pow(SymExpr::int(2)) + x() + SymExpr::int(1);
        test_for_function(&p, [0., 1., 2., 5., 8.]);
    }

    #[test]
    fn trig_and_exp() {
        let f = SymExpr::call("sin", vec![x()]) * SymExpr::call("exp", vec![SymExpr::int(2) * x()]);
        test_for_function(&f, [-1., 0., 0.5, 1.5]);

        let g = SymExpr::call("cos", vec![x().pow(SymExpr::int(2))]);
        test_for_function(&g, [-1., 0.25, 1.]);
    }

    #[test]
    fn logarithm_and_roots() {
        let f = SymExpr::call("ln", vec![x()]) + SymExpr::call("sqrt", vec![x() + SymExpr::int(1)]);
        test_for_function(&f, [0.5, 1., 3.]);
    }

    #[test]
    fn rational_function() {
        // x / (x^2 + 1)
        let f = x() * recip(x().pow(SymExpr::int(2)) + SymExpr::int(1));
        test_for_function(&f, [-2., 0., 0.5, 3.]);
    }

    #[test]
    fn exponential_with_constant_base() {
        // 2^x
        test_for_function(&SymExpr::int(2).pow(x()), [0., 1., 2.5]);
    }

    #[test]
    fn call_in_exponent() {
        // 2^sin(x), sin(x)^2
        let sin = SymExpr::call("sin", vec![x()]);
        test_for_function(&SymExpr::int(2).pow(sin.clone()), [-1., 0., 1.3]);
        test_for_function(&sin.clone().pow(SymExpr::int(2)), [-1., 0., 1.3]);

        // x^sin(x), sin(x)^x
        let f = x().pow(sin.clone());
        assert!(matches!(derivative(&f, "x"), Err(SymbolicDerivativeError::Unsupported(_))));
        let g = sin.pow(x());
        assert!(matches!(derivative(&g, "x"), Err(SymbolicDerivativeError::Unsupported(_))));
    }

    #[test]
    fn nth_derivative_of_exp() {
        let f = SymExpr::call("exp", vec![SymExpr::int(3) * x()]);
        let d3 = nth_derivative(&f, "x", 3).unwrap();
        let expected = 27.0 * 1.2f64.exp();
        assert!((eval_x(&d3, 0.4) - expected).abs() < 1e-9);
    }

    #[test]
    fn unsupported_forms() {
        // x^x
        let f = x().pow(x());
        assert!(matches!(derivative(&f, "x"), Err(SymbolicDerivativeError::Unsupported(_))));

        let g = SymExpr::call("gamma", vec![x()]);
        assert!(matches!(derivative(&g, "x"), Err(SymbolicDerivativeError::Unsupported(_))));

        let h = SymExpr::call("sin", vec![x(), x()]);
        assert!(matches!(derivative(&h, "x"), Err(SymbolicDerivativeError::Undifferentiable(_))));
    }
}
