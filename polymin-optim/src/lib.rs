//! Gradient-based minimizers over [`polymin`] functions.
//!
//! Four solvers share one contract ([`Solver`]): steepest descent, Newton's
//! method, BFGS and Fletcher–Reeves conjugate gradient. Each derives the
//! symbolic gradient (and, for Newton, the Hessian) once at construction and
//! advances one step per [`Solver::iterate`] call.
//!
//! ```
//! use polymin::{Matrix, Polynomial};
//! use polymin_optim::{run, Newton, TerminationReason};
//!
//! let f: Polynomial = "x[1]^2 + 2*x[2]^2 - 2*x[1]*x[2] - 2*x[2]".parse().unwrap();
//! let x0 = Matrix::col_vector(vec![1.0, 0.5]).unwrap();
//! let mut solver = Newton::new(f, &x0).unwrap();
//! let result = run(&mut solver, 100).unwrap();
//! assert_eq!(result.termination, TerminationReason::GradientNorm);
//! assert_eq!(result.x.to_vec(), vec![1.0, 1.0]);
//! ```

pub mod convergence;
pub mod line_search;
pub mod objective;
pub mod result;
pub mod solver;
pub mod solvers;

pub use convergence::{ConvergenceParams, SMALLEST_STEP};
pub use line_search::{ArmijoParams, WolfeParams};
pub use objective::Objective;
pub use result::{OptimResult, TerminationReason};
pub use solver::{run, Point, Progress, Solver, Status};
pub use solvers::bfgs::{Bfgs, BfgsConfig};
pub use solvers::conjugate_gradient::{ConjugateGradient, ConjugateGradientConfig};
pub use solvers::newton::{Newton, NewtonConfig};
pub use solvers::steepest_descent::{SteepestDescent, SteepestDescentConfig};
