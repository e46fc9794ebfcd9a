use std::fmt;

use polymin::Vector;

/// Result of driving a solver with [`run`](crate::run).
#[derive(Debug, Clone)]
pub struct OptimResult {
    /// Final point.
    pub x: Vector<f64>,
    /// Objective value at the final point.
    pub value: f64,
    /// Gradient at the final point.
    pub gradient: Vector<f64>,
    /// Norm of the gradient at the final point.
    pub gradient_norm: f64,
    /// Number of `iterate` calls that did work, including the initial one.
    pub iterations: usize,
    /// Total number of objective evaluations.
    pub func_evals: usize,
    /// Reason for termination.
    pub termination: TerminationReason,
}

/// Why a solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Relative gradient norm `||g|| / (1 + |f|)` fell below tolerance.
    GradientNorm,
    /// The last iteration did not move the point.
    StepSize,
    /// The driver hit its iteration cap before the solver finished.
    MaxIterations,
}

impl TerminationReason {
    /// `true` for the reasons a solver reports itself.
    pub fn is_converged(self) -> bool {
        matches!(self, TerminationReason::GradientNorm | TerminationReason::StepSize)
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::GradientNorm => write!(f, "gradient norm below tolerance"),
            TerminationReason::StepSize => write!(f, "no progress possible in double precision"),
            TerminationReason::MaxIterations => write!(f, "maximum iterations reached"),
        }
    }
}
