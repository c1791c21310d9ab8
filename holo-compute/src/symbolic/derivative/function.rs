//! Symbolic derivatives of the elementary functions understood by [`eval`](crate::symbolic::eval).

use crate::symbolic::SymExpr;

use super::{derivative, recip, MultBuilder, SymbolicDerivativeError};

/// Returns the single argument of a call, or [`SymbolicDerivativeError::Undifferentiable`] if
/// the call has a different number of arguments.
fn single_arg<'a>(func: &str, args: &'a [SymExpr]) -> Result<&'a SymExpr, SymbolicDerivativeError> {
    match args {
        [arg] => Ok(arg),
        _ => Err(SymbolicDerivativeError::Undifferentiable(SymExpr::call(func, args.to_vec()))),
    }
}

/// Computes the derivative of a supported function and performs the chain rule.
pub(super) fn function_derivative(func: &str, args: &[SymExpr], with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let mut mult_group = MultBuilder::default();

    match func {
        "sqrt" => {
            let arg = single_arg(func, args)?;
            return derivative(&arg.clone().sqrt(), with);
        },
        "sin" => {
            let arg = single_arg(func, args)?;
            mult_group.mult(derivative(arg, with)?);
            mult_group.mult(SymExpr::call("cos", vec![arg.clone()]));
        },
        "cos" => {
            let arg = single_arg(func, args)?;
            mult_group.mult(derivative(arg, with)?);
            mult_group.mult(SymExpr::int(-1));
            mult_group.mult(SymExpr::call("sin", vec![arg.clone()]));
        },
        "exp" => {
            let arg = single_arg(func, args)?;
            mult_group.mult(derivative(arg, with)?);
            mult_group.mult(SymExpr::call("exp", vec![arg.clone()]));
        },
        "ln" => {
            let arg = single_arg(func, args)?;
            mult_group.mult(derivative(arg, with)?);
            mult_group.mult(recip(arg.clone()));
        },
        _ => {
            return Err(SymbolicDerivativeError::Unsupported(SymExpr::call(func, args.to_vec())));
        },
    };

    Ok(mult_group.into())
}
