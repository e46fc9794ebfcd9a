use polymin::{Algebraic, Differentiable, Matrix, Result, Vector};
use tracing::warn;

use crate::convergence::ConvergenceParams;
use crate::objective::Objective;
use crate::solver::{Point, Progress, Solver};

const NAME: &str = "newton";

/// Configuration for Newton's method.
#[derive(Debug, Clone)]
pub struct NewtonConfig {
    /// Convergence parameters.
    pub convergence: ConvergenceParams,
    /// Step taken along `-grad f(x)` when the Hessian is singular
    /// (default: 0.01).
    pub fallback_step: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        NewtonConfig {
            convergence: ConvergenceParams::default(),
            fallback_step: 0.01,
        }
    }
}

/// Newton's method with full steps.
///
/// Each step solves for `p = H(x)^-1 * (-grad f(x))` by cofactor inversion
/// of the Hessian and moves by `p`. No line search is performed. Where the
/// Hessian is singular the solver instead moves `fallback_step` along the
/// negative gradient.
///
/// The symbolic Hessian is derived once, at construction.
#[derive(Debug, Clone)]
pub struct Newton<D> {
    objective: Objective<D>,
    hessian: Matrix<D>,
    config: NewtonConfig,
    state: Progress,
}

impl<D: Differentiable> Newton<D> {
    pub fn new(function: D, x0: &Vector<f64>) -> Result<Self> {
        Self::with_config(function, x0, NewtonConfig::default())
    }

    pub fn with_config(function: D, x0: &Vector<f64>, config: NewtonConfig) -> Result<Self> {
        let objective = Objective::new(function, x0.len())?;
        let hessian = objective.hessian()?;
        let x = objective.start_point(x0)?;
        let state = Progress::new(Point::at(&objective, x));
        Ok(Newton {
            objective,
            hessian,
            config,
            state,
        })
    }

    fn step(&self) -> Result<Progress> {
        let current = self.state.point();
        let descent = current.gradient.negate();
        let h = self.hessian.evaluate(current.x.as_slice());

        let (direction, alpha) = match h.inverse()? {
            Some(h_inv) => (h_inv.multiply(&descent)?, 1.0),
            None => {
                warn!(
                    solver = NAME,
                    iteration = self.state.iteration(),
                    "singular Hessian, stepping along the negative gradient"
                );
                (descent, self.config.fallback_step)
            }
        };

        let next = Point::at(&self.objective, current.x.axpy(alpha, &direction)?);
        self.state.advance(NAME, next, 1, &self.config.convergence)
    }
}

impl<D: Differentiable> Solver for Newton<D> {
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
