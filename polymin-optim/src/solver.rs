use polymin::{Differentiable, Result, Vector};
use tracing::{debug, info, warn};

use crate::convergence::ConvergenceParams;
use crate::objective::Objective;
use crate::result::{OptimResult, TerminationReason};

/// Where a solver is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing returned yet; the next `iterate` hands back the initial point.
    Init,
    /// Each `iterate` performs one step.
    Iterating,
    /// Finished. `iterate` keeps returning the final point.
    Done(TerminationReason),
}

/// A point with the objective value and gradient there.
#[derive(Debug, Clone)]
pub struct Point {
    pub x: Vector<f64>,
    pub value: f64,
    pub gradient: Vector<f64>,
}

impl Point {
    pub fn at<D: Differentiable>(obj: &Objective<D>, x: Vector<f64>) -> Point {
        let (value, gradient) = obj.eval_grad(&x);
        Point { x, value, gradient }
    }

    pub fn gradient_norm(&self) -> f64 {
        self.gradient.norm()
    }
}

/// State shared by every solver: current point, status and counters.
#[derive(Debug, Clone)]
pub struct Progress {
    point: Point,
    status: Status,
    iteration: usize,
    func_evals: usize,
}

impl Progress {
    pub(crate) fn new(point: Point) -> Self {
        Progress {
            point,
            status: Status::Init,
            iteration: 0,
            func_evals: 1,
        }
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_done(&self) -> bool {
        matches!(self.status, Status::Done(_))
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn func_evals(&self) -> usize {
        self.func_evals
    }

    /// Handle the `Init` and `Done` states. Returns `true` when the caller
    /// must compute a real step.
    pub(crate) fn begin(&mut self, solver: &'static str) -> bool {
        match self.status {
            Status::Done(_) => false,
            Status::Init => {
                debug!(
                    solver,
                    iteration = 0,
                    value = self.point.value,
                    x = %self.point.x,
                    "initial point"
                );
                self.status = Status::Iterating;
                self.iteration = 1;
                false
            }
            Status::Iterating => true,
        }
    }

    /// Progress after moving to `next` using `evals` further evaluations.
    pub(crate) fn advance(
        &self,
        solver: &'static str,
        next: Point,
        evals: usize,
        convergence: &ConvergenceParams,
    ) -> Result<Progress> {
        let step_norm = next.x.axpy(-1.0, &self.point.x)?.norm();
        let gradient_norm = next.gradient_norm();
        let status = match convergence.check(next.value, gradient_norm, step_norm) {
            Some(reason) => Status::Done(reason),
            None => Status::Iterating,
        };

        debug!(
            solver,
            iteration = self.iteration,
            value = next.value,
            gradient_norm,
            step_norm,
            x = %next.x,
            "iteration"
        );
        if let Status::Done(reason) = status {
            info!(
                solver,
                iterations = self.iteration + 1,
                value = next.value,
                %reason,
                "solver finished"
            );
        }

        Ok(Progress {
            point: next,
            status,
            iteration: self.iteration + 1,
            func_evals: self.func_evals + evals,
        })
    }

    /// Undo a stall verdict; used when the solver has another strategy left.
    pub(crate) fn resume(mut self) -> Self {
        if self.status == Status::Done(TerminationReason::StepSize) {
            self.status = Status::Iterating;
        }
        self
    }
}

/// Contract shared by the iterative minimizers.
///
/// The first [`iterate`](Solver::iterate) returns the initial point unchanged.
/// Each later call performs one step and returns the new point. Once
/// [`is_done`](Solver::is_done) is `true`, `iterate` returns the final point
/// without doing any work.
pub trait Solver {
    fn iterate(&mut self) -> Result<&Vector<f64>>;

    fn progress(&self) -> &Progress;

    fn is_done(&self) -> bool {
        self.progress().is_done()
    }

    /// Number of `iterate` calls that did work, including the initial one.
    fn iteration(&self) -> usize {
        self.progress().iteration()
    }

    fn point(&self) -> &Vector<f64> {
        &self.progress().point().x
    }
}

/// Drive `solver` until it finishes or has done `max_iter` iterations.
pub fn run<S: Solver + ?Sized>(solver: &mut S, max_iter: usize) -> Result<OptimResult> {
    while !solver.is_done() && solver.iteration() < max_iter {
        solver.iterate()?;
    }

    let progress = solver.progress();
    let termination = match progress.status() {
        Status::Done(reason) => reason,
        Status::Init | Status::Iterating => {
            warn!(max_iter, "solver stopped at the iteration cap");
            TerminationReason::MaxIterations
        }
    };
    let point = progress.point();
    Ok(OptimResult {
        x: point.x.clone(),
        value: point.value,
        gradient: point.gradient.clone(),
        gradient_norm: point.gradient_norm(),
        iterations: progress.iteration(),
        func_evals: progress.func_evals(),
        termination,
    })
}
