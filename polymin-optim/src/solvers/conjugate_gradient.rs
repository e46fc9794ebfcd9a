use polymin::{Algebraic, Differentiable, Result, Vector};
use tracing::{debug, warn};

use crate::convergence::ConvergenceParams;
use crate::line_search::{backtracking_armijo, ArmijoParams};
use crate::objective::Objective;
use crate::result::TerminationReason;
use crate::solver::{Point, Progress, Solver, Status};

const NAME: &str = "conjugate gradient";

/// Configuration for the conjugate gradient solver.
#[derive(Debug, Clone, Default)]
pub struct ConjugateGradientConfig {
    /// Convergence parameters.
    pub convergence: ConvergenceParams,
    /// Line search parameters.
    pub line_search: ArmijoParams,
}

#[derive(Debug, Clone)]
struct ConjugateGradientState {
    progress: Progress,
    /// `-grad f` at the start of the previous step.
    last_gradient_direction: Vector<f64>,
    /// Search direction of the previous step.
    last_search_direction: Vector<f64>,
    /// The previous step searched along `-grad f` only.
    was_reset: bool,
}

/// Nonlinear conjugate gradient with the Fletcher–Reeves formula.
///
/// The search direction is `s = dx + beta * s_prev` with `dx = -grad f(x)` and
/// `beta = (dx^T dx) / (dx_prev^T dx_prev)`, followed by an Armijo line search.
/// A step that does not move restarts from the plain gradient direction; a
/// restart that does not move either ends the run.
#[derive(Debug, Clone)]
pub struct ConjugateGradient<D> {
    objective: Objective<D>,
    config: ConjugateGradientConfig,
    state: ConjugateGradientState,
}

impl<D: Differentiable> ConjugateGradient<D> {
    pub fn new(function: D, x0: &Vector<f64>) -> Result<Self> {
        Self::with_config(function, x0, ConjugateGradientConfig::default())
    }

    pub fn with_config(
        function: D,
        x0: &Vector<f64>,
        config: ConjugateGradientConfig,
    ) -> Result<Self> {
        let objective = Objective::new(function, x0.len())?;
        let x = objective.start_point(x0)?;
        let zero = x.apply(|_| 0.0);
        let progress = Progress::new(Point::at(&objective, x));
        Ok(ConjugateGradient {
            objective,
            config,
            state: ConjugateGradientState {
                progress,
                last_gradient_direction: zero.clone(),
                last_search_direction: zero,
                was_reset: true,
            },
        })
    }

    fn step(&self) -> Result<ConjugateGradientState> {
        let state = &self.state;
        let current = state.progress.point();
        let dx = current.gradient.negate();

        let search = if state.was_reset {
            dx.clone()
        } else {
            let beta = dx.dot(&dx)?
                / state
                    .last_gradient_direction
                    .dot(&state.last_gradient_direction)?;
            debug!(solver = NAME, beta, "Fletcher-Reeves update");
            dx.axpy(beta, &state.last_search_direction)?
        };

        let mut evals = 0;
        let x = match backtracking_armijo(
            &self.objective,
            &current.x,
            &search,
            current.value,
            &current.gradient,
            &self.config.line_search,
        )? {
            Some(ls) => {
                evals += ls.evals;
                ls.x
            }
            None => current.x.clone(),
        };

        let next = Point::at(&self.objective, x);
        let mut progress = state
            .progress
            .advance(NAME, next, evals + 1, &self.config.convergence)?;

        let stalled = progress.status() == Status::Done(TerminationReason::StepSize);
        let was_reset = if stalled && !state.was_reset {
            warn!(
                solver = NAME,
                iteration = state.progress.iteration(),
                "no progress, retrying along the negative gradient"
            );
            progress = progress.resume();
            true
        } else {
            stalled
        };

        Ok(ConjugateGradientState {
            progress,
            last_gradient_direction: dx,
            last_search_direction: search,
            was_reset,
        })
    }
}

impl<D: Differentiable> Solver for ConjugateGradient<D> {
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
    use polymin::{Matrix, Polynomial};

    fn point(values: &[f64]) -> Vector<f64> {
        Matrix::col_vector(values.to_vec()).unwrap()
    }

    #[test]
    fn first_step_is_steepest_descent() {
        let f: Polynomial = "0.5*x[1]^2 + 0.5*x[2]^2".parse().unwrap();
        let mut cg = ConjugateGradient::new(f, &point(&[2.0, -1.0])).unwrap();
        assert!(cg.state.was_reset);
        cg.iterate().unwrap();
        assert_eq!(cg.iterate().unwrap().to_vec(), vec![0.0, 0.0]);
        assert!(cg.is_done());
    }

    #[test]
    fn successful_step_clears_reset() {
        let f: Polynomial = "x[1]^2 + 4*x[2]^2".parse().unwrap();
        let mut cg = ConjugateGradient::new(f, &point(&[1.0, 1.0])).unwrap();
        cg.iterate().unwrap();
        cg.iterate().unwrap();
        assert!(!cg.state.was_reset);
        assert_eq!(cg.state.last_gradient_direction.to_vec(), vec![-2.0, -8.0]);
    }

    #[test]
    fn stalled_step_retries_along_negative_gradient() {
        let f: Polynomial = "x[1]^2 + x[2]^2".parse().unwrap();
        let mut cg = ConjugateGradient::new(f, &point(&[1.0, 1.0])).unwrap();
        cg.iterate().unwrap();

        // A tiny previous gradient blows beta up, so the Fletcher-Reeves
        // direction points uphill and the line search finds nothing.
        cg.state.was_reset = false;
        cg.state.last_search_direction = point(&[1.0, 1.0]);
        cg.state.last_gradient_direction = point(&[-1e-3, -1e-3]);

        assert_eq!(cg.iterate().unwrap().to_vec(), vec![1.0, 1.0]);
        assert!(!cg.is_done());
        assert!(cg.state.was_reset);
        assert_eq!(cg.iteration(), 2);

        assert_eq!(cg.iterate().unwrap().to_vec(), vec![0.0, 0.0]);
        assert!(cg.is_done());
        assert_eq!(
            cg.progress().status(),
            Status::Done(TerminationReason::GradientNorm)
        );
    }

    #[test]
    fn stationary_start_finishes_without_moving() {
        // Saddle point: zero gradient, so there is nothing to search along.
        let f: Polynomial = "x[1]^2 - x[2]^2".parse().unwrap();
        let mut cg = ConjugateGradient::new(f, &point(&[0.0, 0.0])).unwrap();
        cg.iterate().unwrap();
        cg.iterate().unwrap();
        assert!(cg.is_done());
        assert_eq!(cg.point().to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn converges_on_quadratic() {
        let f: Polynomial = "x[1]^2 + 2*x[2]^2 - 2*x[1]*x[2] - 2*x[2]".parse().unwrap();
        let mut cg = ConjugateGradient::new(f, &point(&[1.0, 0.5])).unwrap();
        for _ in 0..10_000 {
            if cg.is_done() {
                break;
            }
            cg.iterate().unwrap();
        }
        assert!(cg.is_done());
        let x = cg.point().to_vec();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-6);
    }
}
