use crate::linalg::DenseMatrix;
use crate::poly::RationalFunction;
use crate::symbolic::SymExpr;
use holo_error::Error;
use std::fmt;
use tracing::{debug, trace, warn};
use super::error::{binary_error, ComputationLimitExceeded, VariableMismatch, ZeroAnnihilator};
use super::{normalize, DifferentialOperator, OperatorAlgebra, SearchLimits};

/// Initial values `f(point), f'(point), …` of a holonomic function.
///
/// They are stored for the caller's benefit only: they are not checked against the order of
/// the annihilator, and the results of [`HolonomicFunction::add`], [`HolonomicFunction::mul`]
/// and [`HolonomicFunction::integrate`] carry none.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditions {
    /// The values of the function and its derivatives, in increasing order.
    pub values: Vec<SymExpr>,

    /// The point the values are taken at.
    pub point: SymExpr,
}

impl InitialConditions {
    /// Initial values at the point `0`.
    pub fn at_zero(values: Vec<SymExpr>) -> Self {
        Self { values, point: SymExpr::int(0) }
    }
}

/// A function defined as a solution of the linear differential equation `L·f = 0`, where `L`
/// is its annihilator.
///
/// Sums, products and antiderivatives of holonomic functions are holonomic again; their
/// annihilators are computed by [`add`](Self::add), [`mul`](Self::mul) and
/// [`integrate`](Self::integrate).
#[derive(Debug, Clone)]
pub struct HolonomicFunction {
    annihilator: DifferentialOperator,
    var: String,
    initial_conditions: Option<InitialConditions>,
}

#[allow(clippy::should_implement_trait)]
impl HolonomicFunction {
    /// Creates the holonomic function annihilated by `annihilator`, a function of `var`.
    ///
    /// `var` must be the indeterminate of the annihilator's base ring, and the annihilator must
    /// not be the zero operator.
    pub fn new(annihilator: DifferentialOperator, var: impl Into<String>) -> Result<Self, Error> {
        let var = var.into();
        let ring_var = annihilator.algebra().base().var();
        if var != ring_var {
            return Err(binary_error(
                &annihilator.to_string(),
                ",",
                &var,
                VariableMismatch { lhs: ring_var.to_string(), rhs: var.clone() },
            ));
        }

        if annihilator.is_zero() {
            return Err(Error::whole(annihilator.to_string(), ZeroAnnihilator));
        }

        Ok(Self { annihilator, var, initial_conditions: None })
    }

    /// Attaches initial conditions to the function.
    pub fn with_initial_conditions(mut self, conditions: InitialConditions) -> Self {
        self.initial_conditions = Some(conditions);
        self
    }

    pub fn annihilator(&self) -> &DifferentialOperator {
        &self.annihilator
    }

    /// The name of the independent variable.
    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn initial_conditions(&self) -> Option<&InitialConditions> {
        self.initial_conditions.as_ref()
    }

    /// Builds a closure result. Closure results never carry initial conditions.
    fn closure(&self, annihilator: DifferentialOperator) -> Self {
        Self { annihilator, var: self.var.clone(), initial_conditions: None }
    }

    fn limit_exceeded(&self, op: &str, other: &Self, operation: &'static str, limits: &SearchLimits) -> Error {
        binary_error(
            &self.to_string(),
            op,
            &other.to_string(),
            ComputationLimitExceeded { operation, max_order: limits.max_order },
        )
    }

    /// Computes an annihilator of `f + g` with the default [`SearchLimits`].
    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        self.add_with(other, &SearchLimits::default())
    }

    /// Computes an annihilator of `f + g`.
    ///
    /// With `L_f` of order `d₁` and `L_g` of order `d₂`, the search looks for operators `A` of
    /// order `dim - d₁` and `B` of order `dim - d₂` such that `A·L_f + B·L_g = 0`, starting at
    /// `dim = max(d₁, d₂)`. Then `A·L_f` annihilates both `f` and `g`, and hence `f + g`. The
    /// coefficient vectors of `Dxⁱ·L_f` and `Dxʲ·L_g` form the columns of a linear system whose
    /// kernel gives the coefficients of `A` and `B`; `dim` grows until the kernel is
    /// non-trivial.
    pub fn add_with(&self, other: &Self, limits: &SearchLimits) -> Result<Self, Error> {
        self.annihilator.check_algebra("+", &other.annihilator)?;

        let algebra = self.annihilator.algebra();
        let dx = OperatorAlgebra::derivative_operator(algebra);
        let lhs = self.annihilator.trimmed();
        let rhs = other.annihilator.trimmed();
        let (deg1, deg2) = (lhs.order(), rhs.order());
        let mut dim = deg1.max(deg2);

        let mut chain_lhs = vec![lhs.clone()];
        let mut chain_rhs = vec![rhs];
        for _ in deg1..dim {
            let next = dx.mul_unchecked(&chain_lhs[chain_lhs.len() - 1]);
            chain_lhs.push(next);
        }
        for _ in deg2..dim {
            let next = dx.mul_unchecked(&chain_rhs[chain_rhs.len() - 1]);
            chain_rhs.push(next);
        }

        let solution = loop {
            if dim > limits.max_order {
                return Err(self.limit_exceeded("+", other, "sum", limits));
            }

            let columns = chain_lhs
                .iter()
                .chain(&chain_rhs)
                .map(|op| {
                    let mut column = op.coefficients().to_vec();
                    column.resize(dim + 1, RationalFunction::zero());
                    column
                })
                .collect::<Vec<_>>();
            trace!(dim, rows = dim + 1, cols = columns.len(), "solving addition ansatz");

            let kernel = DenseMatrix::from_columns(columns).null_space();
            if let Some(solution) = choose_kernel_vector(kernel) {
                break solution;
            }

            dim += 1;
            debug!(dim, "no annihilator of the sum found, growing ansatz");
            let next = dx.mul_unchecked(&chain_lhs[chain_lhs.len() - 1]);
            chain_lhs.push(next);
            let next = dx.mul_unchecked(&chain_rhs[chain_rhs.len() - 1]);
            chain_rhs.push(next);
        };

        let coeffs = normalize(&solution[..dim + 1 - deg1], true);
        let multiplier = DifferentialOperator::from_elements(coeffs, algebra);
        let annihilator = multiplier.mul_unchecked(&lhs);
        debug!(order = annihilator.order(), "found annihilator of the sum");

        Ok(self.closure(annihilator))
    }

    /// Computes an annihilator of `f · g` with the default [`SearchLimits`].
    pub fn mul(&self, other: &Self) -> Result<Self, Error> {
        self.mul_with(other, &SearchLimits::default())
    }

    /// Computes an annihilator of `f · g`.
    ///
    /// With `L_f` of order `a` and `L_g` of order `b`, every derivative `Dxᵏ(f·g)` is a
    /// combination of the products `Dxⁱf · Dxʲg` with `i < a` and `j < b`, once `Dxᵃf` and
    /// `Dxᵇg` are rewritten in lower derivatives using the annihilators. The search takes
    /// derivatives until the coefficient vectors of `Dx⁰(f·g), …, Dxᵏ(f·g)` are linearly
    /// dependent; the dependency is the annihilator.
    pub fn mul_with(&self, other: &Self, limits: &SearchLimits) -> Result<Self, Error> {
        self.annihilator.check_algebra("*", &other.annihilator)?;

        let algebra = self.annihilator.algebra();
        let lhs = self.annihilator.trimmed();
        let rhs = other.annihilator.trimmed();
        let (a, b) = (lhs.order(), rhs.order());

        let lhs_red = reduction(&lhs).ok_or_else(|| Error::whole(lhs.to_string(), ZeroAnnihilator))?;
        let rhs_red = reduction(&rhs).ok_or_else(|| Error::whole(rhs.to_string(), ZeroAnnihilator))?;

        // coeff_mul[i][j] is the coefficient of Dxⁱf · Dxʲg in the current derivative of f·g
        let mut coeff_mul = vec![vec![RationalFunction::zero(); b + 1]; a + 1];
        coeff_mul[0][0] = RationalFunction::one();

        let mut lin_sys = vec![flatten(&coeff_mul, a, b)];

        let solution = loop {
            trace!(rows = a * b, cols = lin_sys.len(), "solving multiplication ansatz");
            let kernel = DenseMatrix::from_columns(lin_sys.clone()).null_space();
            if let Some(solution) = choose_kernel_vector(kernel) {
                break solution;
            }

            if lin_sys.len() > limits.max_order {
                return Err(self.limit_exceeded("*", other, "product", limits));
            }
            debug!(derivatives = lin_sys.len(), "no annihilator of the product found, differentiating");

            // product rule, highest terms first so that each term is moved up before it is
            // differentiated in place
            for i in (0..a).rev() {
                for j in (0..b).rev() {
                    let c = coeff_mul[i][j].clone();
                    coeff_mul[i][j + 1] = &coeff_mul[i][j + 1] + &c;
                    coeff_mul[i + 1][j] = &coeff_mul[i + 1][j] + &c;
                    coeff_mul[i][j] = c.derivative();
                }
            }

            // Dxᵇg = Σ rhs_red[j]·Dxʲg
            for row in coeff_mul.iter_mut() {
                let top = std::mem::take(&mut row[b]);
                if !top.is_zero() {
                    for (entry, red) in row.iter_mut().zip(&rhs_red) {
                        *entry = &*entry + &(red * &top);
                    }
                }
            }

            // Dxᵃf = Σ lhs_red[i]·Dxⁱf
            for j in 0..b {
                let top = std::mem::take(&mut coeff_mul[a][j]);
                if !top.is_zero() {
                    for (i, red) in lhs_red.iter().enumerate() {
                        coeff_mul[i][j] = &coeff_mul[i][j] + &(red * &top);
                    }
                }
            }

            lin_sys.push(flatten(&coeff_mul, a, b));
        };

        let coeffs = normalize(&solution, false);
        let annihilator = DifferentialOperator::from_elements(coeffs, algebra);
        debug!(order = annihilator.order(), "found annihilator of the product");

        Ok(self.closure(annihilator))
    }

    /// Computes an annihilator of an antiderivative of `f`. If `L·f = 0`, then `L·Dx` annihilates
    /// every `F` with `F' = f`.
    pub fn integrate(&self) -> Self {
        let dx = OperatorAlgebra::derivative_operator(self.annihilator.algebra());
        self.closure(self.annihilator.mul_unchecked(&dx))
    }
}

/// The coefficients `-aᵢ / a_lead` that rewrite the highest derivative in terms of the lower
/// ones, or [`None`] for the zero operator.
fn reduction(op: &DifferentialOperator) -> Option<Vec<RationalFunction>> {
    let (lead, rest) = op.coefficients().split_last()?;
    let inv = lead.recip()?;
    Some(rest.iter().map(|c| -&(c * &inv)).collect())
}

/// The entries `coeff_mul[i][j]` with `i < a` and `j < b`, row by row.
fn flatten(coeff_mul: &[Vec<RationalFunction>], a: usize, b: usize) -> Vec<RationalFunction> {
    coeff_mul[..a]
        .iter()
        .flat_map(|row| row[..b].iter().cloned())
        .collect()
}

/// Picks the kernel vector whose first free parameter is `1` and the others `0`.
fn choose_kernel_vector(kernel: Vec<Vec<RationalFunction>>) -> Option<Vec<RationalFunction>> {
    if kernel.len() > 1 {
        warn!(params = kernel.len(), "kernel has several free parameters, choosing the first");
    }
    kernel.into_iter().next()
}

/// Functions are equal when their annihilators and variables are equal. Initial conditions are
/// not compared.
impl PartialEq for HolonomicFunction {
    fn eq(&self, other: &Self) -> bool {
        self.annihilator == other.annihilator && self.var == other.var
    }
}

impl fmt::Display for HolonomicFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Holonomic({}, {})", self.annihilator, self.var)
    }
}

#[cfg(test)]
mod tests {
    use crate::poly::{Poly, PolyRing};
    use crate::primitive::{float, rat};
    use crate::symbolic::eval::eval;
    use assert_float_eq::{
        afe_abs,
        afe_absolute_error_msg,
        afe_is_absolute_eq,
        assert_float_absolute_eq,
    };
    use pretty_assertions::assert_eq;
    use std::rc::Rc;
    use super::*;
    use crate::holonomic::error::IncompatibleAlgebras;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn exp(arg: SymExpr) -> SymExpr {
        SymExpr::call("exp", vec![arg])
    }

    fn p(coeffs: &[i64]) -> RationalFunction {
        RationalFunction::from(Poly::new(coeffs.iter().map(|&c| rat(c)).collect()))
    }

    fn op(algebra: &Rc<OperatorAlgebra>, coeffs: &[&[i64]]) -> DifferentialOperator {
        DifferentialOperator::new(coeffs.iter().map(|c| p(c)), algebra).unwrap()
    }

    fn holo(algebra: &Rc<OperatorAlgebra>, coeffs: &[&[i64]]) -> HolonomicFunction {
        HolonomicFunction::new(op(algebra, coeffs), "x").unwrap()
    }

    fn qq() -> Rc<OperatorAlgebra> {
        OperatorAlgebra::new(PolyRing::rationals("x"), None).0
    }

    /// Asserts that `annihilator` maps `f` to zero at a few sample points.
    fn assert_annihilates(annihilator: &DifferentialOperator, f: &SymExpr) {
        let residual = annihilator.apply(f).unwrap();
        for point in [-0.8, 0.3, 1.1] {
            let value = eval(&residual, "x", &float(point)).unwrap().to_f64();
            assert_float_absolute_eq!(value, 0.0, 1e-9);
        }
    }

    #[test]
    fn construction_checks() {
        let algebra = qq();
        let err = HolonomicFunction::new(op(&algebra, &[&[-1], &[1]]), "y").unwrap_err();
        assert!(err.is::<VariableMismatch>());

        let err = HolonomicFunction::new(op(&algebra, &[&[], &[]]), "x").unwrap_err();
        assert!(err.is::<ZeroAnnihilator>());
    }

    #[test]
    fn display_and_equality() {
        let algebra = qq();
        let f = holo(&algebra, &[&[-1], &[1]]);
        assert_eq!(f.to_string(), "Holonomic((-1) + (1)Dx, x)");
        assert_eq!(f, holo(&algebra, &[&[-1], &[1]]));
        assert!(f != holo(&algebra, &[&[-2], &[1]]));

        let with_ics = f.clone().with_initial_conditions(InitialConditions::at_zero(vec![SymExpr::int(1)]));
        assert_eq!(with_ics, f);
        assert_eq!(with_ics.initial_conditions().unwrap().point, SymExpr::int(0));
    }

    #[test]
    fn sum_of_exponentials() {
        // exp(x) + exp(2x)
        let algebra = qq();
        let f = holo(&algebra, &[&[-1], &[1]]);
        let g = holo(&algebra, &[&[-2], &[1]]);
        let sum = f.add(&g).unwrap();
        assert_eq!(sum.annihilator(), &op(&algebra, &[&[2], &[-3], &[1]]));
        assert_eq!(sum.annihilator().to_string(), "(2) + (-3)Dx + (1)Dx**2");
        assert_annihilates(sum.annihilator(), &(exp(x()) + exp(SymExpr::int(2) * x())));
    }

    #[test]
    fn sum_of_sine_and_exponential() {
        let algebra = qq();
        let sin = holo(&algebra, &[&[1], &[], &[1]]);
        let e = holo(&algebra, &[&[-1], &[1]]);
        let sum = sin.add(&e).unwrap();
        assert_eq!(sum.annihilator(), &op(&algebra, &[&[-1], &[1], &[-1], &[1]]));
        assert_annihilates(sum.annihilator(), &(SymExpr::call("sin", vec![x()]) + exp(x())));
    }

    #[test]
    fn sum_with_polynomial_coefficients() {
        let algebra = qq();
        // exp(x^2 / 2) + exp(x)
        let gaussian = holo(&algebra, &[&[0, -1], &[1]]);
        let e = holo(&algebra, &[&[-1], &[1]]);
        let sum = gaussian.add(&e).unwrap();
        assert_eq!(sum.annihilator(), &op(&algebra, &[&[1, -1, 1], &[0, 0, -1], &[-1, 1]]));
        let half_x2 = SymExpr::frac(x().pow(SymExpr::int(2)), SymExpr::int(2));
        assert_annihilates(sum.annihilator(), &(exp(half_x2) + exp(x())));

        // x + exp(x)
        let linear = holo(&algebra, &[&[], &[], &[1]]);
        let sum = linear.add(&e).unwrap();
        assert_eq!(sum.annihilator(), &op(&algebra, &[&[], &[], &[-1], &[1]]));
    }

    #[test]
    fn sum_with_airy() {
        let algebra = qq();
        let airy = holo(&algebra, &[&[0, -1], &[], &[1]]);
        let e = holo(&algebra, &[&[-1], &[1]]);
        let sum = airy.add(&e).unwrap();
        assert_eq!(
            sum.annihilator(),
            &op(&algebra, &[&[1, -1, 1], &[0, 1, -1], &[0, -1], &[-1, 1]]),
        );
    }

    #[test]
    fn products() {
        let algebra = qq();
        let e = holo(&algebra, &[&[-1], &[1]]);
        let e2 = holo(&algebra, &[&[-2], &[1]]);
        let sin = holo(&algebra, &[&[1], &[], &[1]]);
        let gaussian = holo(&algebra, &[&[0, -1], &[1]]);

        let product = e.mul(&e2).unwrap();
        assert_eq!(product.annihilator(), &op(&algebra, &[&[-3], &[1]]));

        let product = sin.mul(&e).unwrap();
        assert_eq!(product.annihilator(), &op(&algebra, &[&[2], &[-2], &[1]]));
        assert_annihilates(product.annihilator(), &(SymExpr::call("sin", vec![x()]) * exp(x())));

        // sin(x) * cos(x) = sin(2x) / 2
        let product = sin.mul(&sin).unwrap();
        assert_eq!(product.annihilator(), &op(&algebra, &[&[], &[4], &[], &[1]]));
        let sin_cos = SymExpr::call("sin", vec![x()]) * SymExpr::call("cos", vec![x()]);
        assert_annihilates(product.annihilator(), &sin_cos);

        let product = gaussian.mul(&e).unwrap();
        assert_eq!(product.annihilator(), &op(&algebra, &[&[-1, -1], &[1]]));
    }

    /// `1 / (x + 1)`, annihilated by `(x + 1)Dx + 1`.
    fn reciprocal(algebra: &Rc<OperatorAlgebra>) -> (HolonomicFunction, SymExpr) {
        let f = holo(algebra, &[&[1], &[1, 1]]);
        (f, SymExpr::frac(SymExpr::int(1), x() + SymExpr::int(1)))
    }

    #[test]
    fn product_with_non_constant_leading_coefficient() {
        let algebra = qq();
        let (recip, recip_expr) = reciprocal(&algebra);
        assert_annihilates(recip.annihilator(), &recip_expr);

        // exp(x) / (x + 1)
        let e = holo(&algebra, &[&[-1], &[1]]);
        let product = recip.mul(&e).unwrap();
        assert_eq!(product.annihilator(), &op(&algebra, &[&[0, -1], &[1, 1]]));
        assert_eq!(product.annihilator().to_string(), "(-x) + (x + 1)Dx");
        assert_annihilates(product.annihilator(), &SymExpr::frac(exp(x()), x() + SymExpr::int(1)));

        // 1 / (x + 1)^2
        let square = recip.mul(&recip).unwrap();
        assert_eq!(square.annihilator(), &op(&algebra, &[&[2], &[1, 1]]));
        assert_annihilates(square.annihilator(), &recip_expr.clone().pow(SymExpr::int(2)));
    }

    #[test]
    fn sum_with_non_constant_leading_coefficient() {
        // 1 / (x + 1) + sin(x)
        let algebra = qq();
        let (recip, recip_expr) = reciprocal(&algebra);
        let sin = holo(&algebra, &[&[1], &[], &[1]]);
        let sum = recip.add(&sin).unwrap();

        // (u^2 + 6)(1 + Dx^2) + u(u^2 + 2)(Dx + Dx^3) with u = x + 1
        assert_eq!(
            sum.annihilator(),
            &op(&algebra, &[&[7, 2, 1], &[3, 5, 3, 1], &[7, 2, 1], &[3, 5, 3, 1]]),
        );
        assert_annihilates(sum.annihilator(), &(recip_expr + SymExpr::call("sin", vec![x()])));
    }

    #[test]
    fn integration() {
        let algebra = qq();
        let e = holo(&algebra, &[&[-1], &[1]]);
        assert_eq!(e.integrate().annihilator(), &op(&algebra, &[&[], &[-1], &[1]]));
        assert_annihilates(e.integrate().annihilator(), &(exp(x()) + SymExpr::int(5)));
    }

    #[test]
    fn closures_drop_initial_conditions() {
        let algebra = qq();
        let ics = InitialConditions::at_zero(vec![SymExpr::int(1)]);
        let e = holo(&algebra, &[&[-1], &[1]]).with_initial_conditions(ics);
        assert!(e.initial_conditions().is_some());
        assert!(e.add(&e).unwrap().initial_conditions().is_none());
        assert!(e.mul(&e).unwrap().initial_conditions().is_none());
        assert!(e.integrate().initial_conditions().is_none());
    }

    #[test]
    fn trailing_zeros_are_ignored() {
        let algebra = qq();
        let e = holo(&algebra, &[&[-1], &[1], &[]]);
        let e2 = holo(&algebra, &[&[-2], &[1]]);
        let sum = e.add(&e2).unwrap();
        assert_eq!(sum.annihilator(), &op(&algebra, &[&[2], &[-3], &[1]]));
    }

    #[test]
    fn operand_checks() {
        let algebra = qq();
        let other = qq();
        let e = holo(&algebra, &[&[-1], &[1]]);
        let foreign = holo(&other, &[&[-1], &[1]]);
        assert!(e.add(&foreign).unwrap_err().is::<IncompatibleAlgebras>());
        assert!(e.mul(&foreign).unwrap_err().is::<IncompatibleAlgebras>());

        // a function of t lives over a ring in t
        let (in_t, dt) = OperatorAlgebra::new(PolyRing::rationals("t"), None);
        let et = HolonomicFunction::new(dt.sub_scalar(1).unwrap(), "t").unwrap();
        assert!(e.add(&et).unwrap_err().is::<IncompatibleAlgebras>());
        assert!(HolonomicFunction::new(dt, "x").unwrap_err().is::<VariableMismatch>());
        assert_eq!(et.annihilator().algebra(), &in_t);
    }

    #[test]
    fn search_limit() {
        let algebra = qq();
        let sin = holo(&algebra, &[&[1], &[], &[1]]);
        let e = holo(&algebra, &[&[-1], &[1]]);

        let err = sin.add_with(&e, &SearchLimits::new(2)).unwrap_err();
        assert!(err.is::<ComputationLimitExceeded>());
        assert!(sin.add_with(&e, &SearchLimits::new(3)).is_ok());

        let err = sin.mul_with(&sin, &SearchLimits::new(2)).unwrap_err();
        assert!(err.is::<ComputationLimitExceeded>());
        assert!(sin.mul_with(&sin, &SearchLimits::new(3)).is_ok());
    }
}
