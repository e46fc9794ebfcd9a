use polymin::{Algebraic, Differentiable, Matrix, Result, Vector};
use tracing::{debug, warn};

use crate::convergence::ConvergenceParams;
use crate::line_search::{backtracking_armijo, backtracking_wolfe, ArmijoParams, WolfeParams};
use crate::objective::Objective;
use crate::solver::{Point, Progress, Solver};

const NAME: &str = "bfgs";

/// Configuration for the BFGS solver.
#[derive(Debug, Clone, Default)]
pub struct BfgsConfig {
    /// Convergence parameters.
    pub convergence: ConvergenceParams,
    /// Line search along the quasi-Newton direction.
    pub line_search: WolfeParams,
    /// Line search along `-grad f(x)` when the Wolfe search fails.
    pub fallback: ArmijoParams,
}

#[derive(Debug, Clone)]
struct BfgsState {
    progress: Progress,
    /// Hessian approximation `B_k`.
    b: Matrix<f64>,
}

/// BFGS quasi-Newton method on a dense Hessian approximation.
///
/// Starts from `B_0 = I`. Each step searches along `p = -B^-1 grad f(x)` with a
/// backtracking Wolfe line search, then applies the rank-2 update
///
/// ```text
/// B <- B - (B s s^T B) / (s^T B s) + (y y^T) / (y^T s)
/// ```
///
/// with `s = x_1 - x_0` and `y = g_1 - g_0`. When the Wolfe search fails (or
/// `B` is singular) the step falls back to an Armijo search along `-grad f(x)`.
#[derive(Debug, Clone)]
pub struct Bfgs<D> {
    objective: Objective<D>,
    config: BfgsConfig,
    state: BfgsState,
}

impl<D: Differentiable> Bfgs<D> {
    pub fn new(function: D, x0: &Vector<f64>) -> Result<Self> {
        Self::with_config(function, x0, BfgsConfig::default())
    }

    pub fn with_config(function: D, x0: &Vector<f64>, config: BfgsConfig) -> Result<Self> {
        let objective = Objective::new(function, x0.len())?;
        let x = objective.start_point(x0)?;
        let b = Matrix::identity(objective.dim())?;
        let progress = Progress::new(Point::at(&objective, x));
        Ok(Bfgs {
            objective,
            config,
            state: BfgsState { progress, b },
        })
    }

    /// Current Hessian approximation.
    pub fn hessian_approximation(&self) -> &Matrix<f64> {
        &self.state.b
    }

    fn step(&self) -> Result<BfgsState> {
        let current = self.state.progress.point();
        let descent = current.gradient.negate();

        let wolfe = match self.state.b.inverse()? {
            Some(b_inv) => {
                let p = b_inv.multiply(&descent)?;
                backtracking_wolfe(
                    &self.objective,
                    &current.x,
                    &p,
                    current.value,
                    &current.gradient,
                    &self.config.line_search,
                )?
            }
            None => {
                warn!(solver = NAME, "singular Hessian approximation");
                None
            }
        };

        let (x, evals) = match wolfe {
            Some(ls) => (ls.x, ls.evals),
            None => {
                warn!(
                    solver = NAME,
                    iteration = self.state.progress.iteration(),
                    "Wolfe search failed, falling back to the negative gradient"
                );
                match backtracking_armijo(
                    &self.objective,
                    &current.x,
                    &descent,
                    current.value,
                    &current.gradient,
                    &self.config.fallback,
                )? {
                    Some(ls) => (ls.x, ls.evals),
                    None => (current.x.clone(), 0),
                }
            }
        };

        let next = Point::at(&self.objective, x);
        let s = next.x.axpy(-1.0, &current.x)?;
        let y = next.gradient.axpy(-1.0, &current.gradient)?;
        let b = bfgs_update(&self.state.b, &s, &y)?;

        let progress =
            self.state
                .progress
                .advance(NAME, next, evals + 1, &self.config.convergence)?;
        Ok(BfgsState { progress, b })
    }
}

/// Rank-2 BFGS update of `b`. The update is skipped when it is undefined or
/// would break positive definiteness (`s^T B s <= 0` or `y^T s <= 0`).
fn bfgs_update(b: &Matrix<f64>, s: &Vector<f64>, y: &Vector<f64>) -> Result<Matrix<f64>> {
    let bs = b.multiply(s)?;
    let sbs = s.dot(&bs)?;
    let ys = y.dot(s)?;
    if sbs <= 0.0 || ys <= 0.0 {
        debug!(sbs, ys, "skipping BFGS update");
        return Ok(b.clone());
    }

    // B symmetric, so B s s^T B = (B s)(B s)^T.
    let term1 = bs.multiply(&bs.transpose())?.scale(&(-1.0 / sbs))?;
    let term2 = y.multiply(&y.transpose())?.scale(&(1.0 / ys))?;
    b.add(&term1)?.add(&term2)
}

impl<D: Differentiable> Solver for Bfgs<D> {
    fn iterate(&mut self) -> Result<&Vector<f64>> {
        if self.state.progress.begin(NAME) {
            self.state = self.step()?;
        }
        Ok(&self.state.progress.point().x)
    }

    fn progress(&self) -> &Progress {
        &self.state.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use polymin::Polynomial;

    fn point(values: &[f64]) -> Vector<f64> {
        Matrix::col_vector(values.to_vec()).unwrap()
    }

    #[test]
    fn update_satisfies_secant_equation() {
        let b = Matrix::<f64>::identity(2).unwrap();
        let s = point(&[1.0, 0.5]);
        let y = point(&[2.0, 0.25]);
        let b1 = bfgs_update(&b, &s, &y).unwrap();
        let b1s = b1.multiply(&s).unwrap();
        assert_relative_eq!(b1s[(0, 0)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(b1s[(1, 0)], 0.25, epsilon = 1e-12);
        assert_relative_eq!(b1[(0, 1)], b1[(1, 0)], epsilon = 1e-12);
    }

    #[test]
    fn update_skipped_without_curvature() {
        let b = Matrix::<f64>::identity(2).unwrap();
        let s = point(&[1.0, 0.0]);
        let y = point(&[-1.0, 0.0]);
        assert_eq!(bfgs_update(&b, &s, &y).unwrap(), b);
        let zero = point(&[0.0, 0.0]);
        assert_eq!(bfgs_update(&b, &zero, &zero).unwrap(), b);
    }

    #[test]
    fn starts_from_identity() {
        let f: Polynomial = "x[1]^2 + x[2]^2".parse().unwrap();
        let bfgs = Bfgs::new(f, &point(&[1.0, 1.0])).unwrap();
        assert_eq!(
            bfgs.hessian_approximation(),
            &Matrix::<f64>::identity(2).unwrap()
        );
    }

    #[test]
    fn indefinite_approximation_falls_back_to_gradient() {
        // With B = -I the quasi-Newton direction is +g, uphill, so the Wolfe
        // search fails and the Armijo search along -g takes the full step.
        let f: Polynomial = "0.5*x[1]^2 + 0.5*x[2]^2".parse().unwrap();
        let mut bfgs = Bfgs::new(f, &point(&[2.0, 3.0])).unwrap();
        let minus_identity = Matrix::<f64>::identity(2).unwrap().negate();
        bfgs.state.b = minus_identity.clone();

        bfgs.iterate().unwrap();
        assert_eq!(bfgs.iterate().unwrap().to_vec(), vec![0.0, 0.0]);
        assert!(bfgs.is_done());
        // s^T B s < 0, so the update is skipped rather than reset.
        assert_eq!(bfgs.hessian_approximation(), &minus_identity);
    }

    #[test]
    fn singular_approximation_falls_back_to_gradient() {
        let f: Polynomial = "0.5*x[1]^2 + 0.5*x[2]^2".parse().unwrap();
        let mut bfgs = Bfgs::new(f, &point(&[2.0, 3.0])).unwrap();
        bfgs.state.b = Matrix::zeros(2, 2).unwrap();

        bfgs.iterate().unwrap();
        assert_eq!(bfgs.iterate().unwrap().to_vec(), vec![0.0, 0.0]);
        assert!(bfgs.is_done());
    }

    #[test]
    fn converges_on_quadratic() {
        let f: Polynomial = "x[1]^2 + 2*x[2]^2 - 2*x[1]*x[2] - 2*x[2]".parse().unwrap();
        let mut bfgs = Bfgs::new(f, &point(&[1.0, 0.5])).unwrap();
        for _ in 0..100 {
            if bfgs.is_done() {
                break;
            }
            bfgs.iterate().unwrap();
        }
        assert!(bfgs.is_done());
        let x = bfgs.point().to_vec();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-6);
    }
}
