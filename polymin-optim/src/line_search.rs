use polymin::{Differentiable, Result, Vector};
use tracing::trace;

use crate::convergence::SMALLEST_STEP;
use crate::objective::Objective;

/// Parameters for the backtracking Armijo line search.
#[derive(Debug, Clone)]
pub struct ArmijoParams {
    /// Sufficient decrease parameter (default: 1e-4).
    pub c: f64,
    /// Backtracking factor (default: 0.5).
    pub rho: f64,
    /// Initial step size (default: 1.0).
    pub alpha_init: f64,
    /// Minimum step size before declaring failure (default: [`SMALLEST_STEP`]).
    pub alpha_min: f64,
}

impl Default for ArmijoParams {
    fn default() -> Self {
        ArmijoParams {
            c: 1e-4,
            rho: 0.5,
            alpha_init: 1.0,
            alpha_min: SMALLEST_STEP,
        }
    }
}

/// Parameters for the backtracking search under both Wolfe conditions.
#[derive(Debug, Clone)]
pub struct WolfeParams {
    /// Sufficient decrease part.
    pub armijo: ArmijoParams,
    /// Curvature parameter, `c < c2 < 1` (default: 0.9).
    pub c2: f64,
}

impl Default for WolfeParams {
    fn default() -> Self {
        WolfeParams {
            armijo: ArmijoParams::default(),
            c2: 0.9,
        }
    }
}

/// Result of a successful line search.
#[derive(Debug)]
pub struct LineSearchResult {
    /// The accepted step size.
    pub alpha: f64,
    /// The accepted point `x + alpha * d`.
    pub x: Vector<f64>,
    /// Objective value at `x`.
    pub value: f64,
    /// Number of function evaluations used.
    pub evals: usize,
}

/// Backtracking line search satisfying the Armijo (sufficient decrease) condition.
///
/// Searches for `alpha` such that `f(x + alpha*d) <= f(x) + c * alpha * g^T d`,
/// starting from `alpha_init` and multiplying by `rho` after each rejection.
///
/// Returns `None` if `d` is not a descent direction or `alpha` falls below
/// `alpha_min`.
pub fn backtracking_armijo<D: Differentiable>(
    obj: &Objective<D>,
    x: &Vector<f64>,
    d: &Vector<f64>,
    f_x: f64,
    grad_x: &Vector<f64>,
    params: &ArmijoParams,
) -> Result<Option<LineSearchResult>> {
    backtrack(obj, x, d, f_x, grad_x, params, |_| Ok(true))
}

/// Backtracking line search satisfying both Wolfe conditions.
///
/// On top of the Armijo test, a trial step must satisfy the curvature condition
/// `grad f(x + alpha*d)^T d >= c2 * g^T d`. The gradient at a trial point is
/// only evaluated once the Armijo test has passed.
pub fn backtracking_wolfe<D: Differentiable>(
    obj: &Objective<D>,
    x: &Vector<f64>,
    d: &Vector<f64>,
    f_x: f64,
    grad_x: &Vector<f64>,
    params: &WolfeParams,
) -> Result<Option<LineSearchResult>> {
    let dg = grad_x.dot(d)?;
    backtrack(obj, x, d, f_x, grad_x, &params.armijo, |x_new| {
        let slope = obj.gradient(x_new).dot(d)?;
        Ok(slope >= params.c2 * dg)
    })
}

fn backtrack<D, C>(
    obj: &Objective<D>,
    x: &Vector<f64>,
    d: &Vector<f64>,
    f_x: f64,
    grad_x: &Vector<f64>,
    params: &ArmijoParams,
    mut accept: C,
) -> Result<Option<LineSearchResult>>
where
    D: Differentiable,
    C: FnMut(&Vector<f64>) -> Result<bool>,
{
    let dg = grad_x.dot(d)?;

    // Not a descent direction; the caller decides how to recover.
    if dg >= 0.0 {
        trace!(dg, "line search along a non-descent direction");
        return Ok(None);
    }

    let mut alpha = params.alpha_init;
    let mut evals = 0;

    while alpha >= params.alpha_min {
        let x_new = x.axpy(alpha, d)?;
        let f_new = obj.value(&x_new);
        evals += 1;

        if f_new <= f_x + params.c * alpha * dg && accept(&x_new)? {
            trace!(alpha, value = f_new, evals, "line search accepted step");
            return Ok(Some(LineSearchResult {
                alpha,
                x: x_new,
                value: f_new,
                evals,
            }));
        }

        alpha *= params.rho;
    }

    trace!(evals, "line search step underflowed");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polymin::{Algebraic, Matrix, Polynomial};
    use proptest::prelude::*;

    fn quadratic() -> Objective<Polynomial> {
        // f(x) = 0.5 * (x1^2 + x2^2)
        Objective::new("0.5*x[1]^2 + 0.5*x[2]^2".parse().unwrap(), 2).unwrap()
    }

    fn point(values: &[f64]) -> Vector<f64> {
        Matrix::col_vector(values.to_vec()).unwrap()
    }

    #[test]
    fn armijo_quadratic_descent() {
        let obj = quadratic();
        let x = point(&[2.0, 3.0]);
        let (f_x, grad) = obj.eval_grad(&x);
        // Steepest descent direction
        let d = grad.negate();

        let result = backtracking_armijo(&obj, &x, &d, f_x, &grad, &ArmijoParams::default())
            .unwrap()
            .unwrap();

        assert!(result.alpha > 0.0);
        assert!(result.value < f_x, "line search should decrease objective");
    }

    #[test]
    fn armijo_full_step_on_quadratic() {
        let obj = quadratic();
        let x = point(&[2.0, 3.0]);
        let (f_x, grad) = obj.eval_grad(&x);
        let d = grad.negate();

        let result = backtracking_armijo(&obj, &x, &d, f_x, &grad, &ArmijoParams::default())
            .unwrap()
            .unwrap();

        // For this quadratic the full steepest descent step lands on the minimum.
        assert_eq!(result.alpha, 1.0);
        assert_eq!(result.x.to_vec(), vec![0.0, 0.0]);
        assert_eq!(result.evals, 1);
    }

    #[test]
    fn armijo_backtracks_on_steep_function() {
        // f = 10 x1^2: the full step overshoots to -19 x1.
        let obj = Objective::new("10*x[1]^2".parse::<Polynomial>().unwrap(), 1).unwrap();
        let x = point(&[1.0]);
        let (f_x, grad) = obj.eval_grad(&x);
        let d = grad.negate();

        let result = backtracking_armijo(&obj, &x, &d, f_x, &grad, &ArmijoParams::default())
            .unwrap()
            .unwrap();

        assert_eq!(result.alpha, 0.0625);
        assert!(result.evals > 1);
    }

    #[test]
    fn armijo_non_descent_returns_none() {
        let obj = quadratic();
        let x = point(&[2.0, 3.0]);
        let (f_x, grad) = obj.eval_grad(&x);
        // Ascent direction (same as gradient)
        let d = grad.clone();

        let result =
            backtracking_armijo(&obj, &x, &d, f_x, &grad, &ArmijoParams::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn armijo_underflow_returns_none() {
        let obj = quadratic();
        let x = point(&[2.0, 3.0]);
        let (f_x, grad) = obj.eval_grad(&x);
        let d = grad.negate();
        let params = ArmijoParams {
            // Unsatisfiable: requires more decrease than the slope allows.
            c: 2.0,
            alpha_min: 1e-10,
            ..ArmijoParams::default()
        };

        let result = backtracking_armijo(&obj, &x, &d, f_x, &grad, &params).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn wolfe_rejects_too_short_steps() {
        // With alpha_init tiny the Armijo test passes but the slope has barely
        // changed, so the curvature test must fail all the way down.
        let obj = quadratic();
        let x = point(&[2.0, 3.0]);
        let (f_x, grad) = obj.eval_grad(&x);
        let d = grad.negate();
        let params = WolfeParams {
            armijo: ArmijoParams {
                alpha_init: 1e-3,
                alpha_min: 1e-12,
                ..ArmijoParams::default()
            },
            ..WolfeParams::default()
        };

        let result = backtracking_wolfe(&obj, &x, &d, f_x, &grad, &params).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn wolfe_accepts_full_step_on_quadratic() {
        let obj = quadratic();
        let x = point(&[2.0, 3.0]);
        let (f_x, grad) = obj.eval_grad(&x);
        let d = grad.negate();

        let result = backtracking_wolfe(&obj, &x, &d, f_x, &grad, &WolfeParams::default())
            .unwrap()
            .unwrap();
        assert_eq!(result.alpha, 1.0);
    }

    fn quartic() -> Objective<Polynomial> {
        Objective::new(
            "x[1]^4 + x[1]*x[2] + 2*x[2]^2 - 3*x[1]".parse().unwrap(),
            2,
        )
        .unwrap()
    }

    proptest! {
        // =====================================
        // Acceptance conditions
        // =====================================

        #[test]
        fn armijo_step_decreases_sufficiently(x1 in -3.0f64..3.0, x2 in -3.0f64..3.0) {
            let obj = quartic();
            let x = point(&[x1, x2]);
            let (f_x, grad) = obj.eval_grad(&x);
            prop_assume!(grad.norm() > 1e-6);
            let d = grad.negate();
            let params = ArmijoParams::default();

            let ls = backtracking_armijo(&obj, &x, &d, f_x, &grad, &params).unwrap();
            prop_assert!(ls.is_some());
            let ls = ls.unwrap();
            let dg = grad.dot(&d).unwrap();
            prop_assert!(ls.value <= f_x + params.c * ls.alpha * dg);
            prop_assert_eq!(ls.value, obj.value(&ls.x));
        }

        #[test]
        fn wolfe_step_meets_curvature_condition(x1 in -3.0f64..3.0, x2 in -3.0f64..3.0) {
            let obj = quartic();
            let x = point(&[x1, x2]);
            let (f_x, grad) = obj.eval_grad(&x);
            prop_assume!(grad.norm() > 1e-6);
            let d = grad.negate();
            let params = WolfeParams::default();

            if let Some(ls) = backtracking_wolfe(&obj, &x, &d, f_x, &grad, &params).unwrap() {
                let dg = grad.dot(&d).unwrap();
                prop_assert!(ls.value <= f_x + params.armijo.c * ls.alpha * dg);
                let slope = obj.gradient(&ls.x).dot(&d).unwrap();
                prop_assert!(slope >= params.c2 * dg);
            }
        }
    }
}
