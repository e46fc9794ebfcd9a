use polymin::{Algebraic, Differentiable, Result, Vector};

use crate::convergence::ConvergenceParams;
use crate::line_search::{backtracking_armijo, ArmijoParams};
use crate::objective::Objective;
use crate::solver::{Point, Progress, Solver};

const NAME: &str = "steepest descent";

/// Configuration for steepest descent.
#[derive(Debug, Clone, Default)]
pub struct SteepestDescentConfig {
    /// Convergence parameters.
    pub convergence: ConvergenceParams,
    /// Line search parameters.
    pub line_search: ArmijoParams,
}

/// Gradient descent with a backtracking Armijo line search.
///
/// Each step moves along `-grad f(x)`. When the line search finds no
/// acceptable step the point stays put and the solver reports a stall.
#[derive(Debug, Clone)]
pub struct SteepestDescent<D> {
    objective: Objective<D>,
    config: SteepestDescentConfig,
    state: Progress,
}

impl<D: Differentiable> SteepestDescent<D> {
    pub fn new(function: D, x0: &Vector<f64>) -> Result<Self> {
        Self::with_config(function, x0, SteepestDescentConfig::default())
    }

    pub fn with_config(function: D, x0: &Vector<f64>, config: SteepestDescentConfig) -> Result<Self> {
        let objective = Objective::new(function, x0.len())?;
        let x = objective.start_point(x0)?;
        let state = Progress::new(Point::at(&objective, x));
        Ok(SteepestDescent {
            objective,
            config,
            state,
        })
    }

    fn step(&self) -> Result<Progress> {
        let current = self.state.point();
        let direction = current.gradient.negate();

        let mut evals = 0;
        let x = match backtracking_armijo(
            &self.objective,
            &current.x,
            &direction,
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
        self.state
            .advance(NAME, next, evals + 1, &self.config.convergence)
    }
}

impl<D: Differentiable> Solver for SteepestDescent<D> {
    fn iterate(&mut self) -> Result<&Vector<f64>> {
        if self.state.begin(NAME) {
            self.state = self.step()?;
        }
        Ok(&self.state.point().x)
    }

    fn progress(&self) -> &Progress {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::TerminationReason;
    use crate::solver::Status;
    use polymin::{Matrix, Polynomial};

    fn point(values: &[f64]) -> Vector<f64> {
        Matrix::col_vector(values.to_vec()).unwrap()
    }

    #[test]
    fn first_call_returns_initial_point() {
        let f: Polynomial = "x[1]^2 + x[2]^2".parse().unwrap();
        let mut sd = SteepestDescent::new(f, &point(&[3.0, 4.0])).unwrap();
        assert_eq!(sd.progress().status(), Status::Init);
        assert_eq!(sd.iterate().unwrap().to_vec(), vec![3.0, 4.0]);
        assert_eq!(sd.iteration(), 1);
        assert!(!sd.is_done());
    }

    #[test]
    fn isotropic_quadratic_in_one_step() {
        // f = 0.5 |x|^2: alpha = 1 along -g lands on the origin.
        let f: Polynomial = "0.5*x[1]^2 + 0.5*x[2]^2".parse().unwrap();
        let mut sd = SteepestDescent::new(f, &point(&[3.0, 4.0])).unwrap();
        sd.iterate().unwrap();
        assert_eq!(sd.iterate().unwrap().to_vec(), vec![0.0, 0.0]);
        assert!(sd.is_done());
        assert_eq!(
            sd.progress().status(),
            Status::Done(TerminationReason::GradientNorm)
        );
    }

    #[test]
    fn done_solver_is_frozen() {
        let f: Polynomial = "0.5*x[1]^2".parse().unwrap();
        let mut sd = SteepestDescent::new(f, &point(&[1.0])).unwrap();
        while !sd.is_done() {
            sd.iterate().unwrap();
        }
        let iterations = sd.iteration();
        let x = sd.point().clone();
        assert_eq!(sd.iterate().unwrap(), &x);
        assert_eq!(sd.iteration(), iterations);
    }

    #[test]
    fn stationary_start_stalls() {
        // A saddle point: zero gradient but f is not bounded below. The
        // line search sees no descent direction, so nothing moves.
        let f: Polynomial = "x[1]^2 - x[2]^2".parse().unwrap();
        let mut sd = SteepestDescent::new(f, &point(&[0.0, 0.0])).unwrap();
        sd.iterate().unwrap();
        sd.iterate().unwrap();
        assert!(sd.is_done());
        assert_eq!(sd.point().to_vec(), vec![0.0, 0.0]);
    }
}
