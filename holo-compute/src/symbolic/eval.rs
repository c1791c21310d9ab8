//! Numerical evaluation of [`SymExpr`]s.

use crate::primitive::{float, PRECISION};
use rug::{ops::Pow, Float};
use super::{Primary, SymExpr};

/// Evaluates the expression at `var = at`, using [`PRECISION`] bits of precision.
///
/// Returns [`None`] if the expression contains a symbol other than `var`, calls a function that
/// is not one of `sin`, `cos`, `exp`, `ln` and `sqrt`, or if the result is not a number (for
/// example, `ln(-1)`).
pub fn eval(expr: &SymExpr, var: &str, at: &Float) -> Option<Float> {
    let value = match expr {
        SymExpr::Primary(Primary::Integer(n)) => float(n),
        SymExpr::Primary(Primary::Symbol(sym)) => {
            if sym != var {
                return None;
            }
            Float::with_val(PRECISION, at)
        },
        SymExpr::Primary(Primary::Call(func, args)) => {
            let [arg] = args.as_slice() else {
                return None;
            };
            let arg = eval(arg, var, at)?;
            match func.as_str() {
                "sin" => arg.sin(),
                "cos" => arg.cos(),
                "exp" => arg.exp(),
                "ln" => arg.ln(),
                "sqrt" => arg.sqrt(),
                _ => return None,
            }
        },
        SymExpr::Add(terms) => {
            let mut sum = float(0);
            for term in terms {
                sum += eval(term, var, at)?;
            }
            sum
        },
        SymExpr::Mul(factors) => {
            let mut product = float(1);
            for factor in factors {
                product *= eval(factor, var, at)?;
            }
            product
        },
        SymExpr::Exp(base, exp) => {
            let base = eval(base, var, at)?;
            // integer powers of negative numbers are fine, but `Float::pow(Float)` would not be
            match exp.as_integer().and_then(|n| n.to_i32()) {
                Some(n) => base.pow(n),
                None => base.pow(eval(exp, var, at)?),
            }
        },
    };

    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}
