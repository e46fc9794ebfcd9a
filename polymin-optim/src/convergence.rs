use crate::result::TerminationReason;

/// Smallest positive `f64` (the subnormal `2^-1074`).
///
/// Line searches give up once the trial step drops below this, and a
/// displacement with a smaller norm counts as no movement at all.
pub const SMALLEST_STEP: f64 = 4.9406564584124654e-324;

/// Parameters controlling convergence checks.
#[derive(Debug, Clone)]
pub struct ConvergenceParams {
    /// Relative gradient tolerance: stop when `||g|| / (1 + |f|) < epsilon`
    /// (default: 1e-7).
    pub epsilon: f64,
    /// Stop when the displacement of an iteration has norm below this
    /// (default: [`SMALLEST_STEP`]).
    pub min_step: f64,
}

impl Default for ConvergenceParams {
    fn default() -> Self {
        ConvergenceParams {
            epsilon: 1e-7,
            min_step: SMALLEST_STEP,
        }
    }
}

impl ConvergenceParams {
    /// The relative gradient measure `||g|| / (1 + |f|)`.
    pub fn relative_gradient(value: f64, gradient_norm: f64) -> f64 {
        gradient_norm / (1.0 + value.abs())
    }

    /// Decide whether an iteration that ended at a point with objective `value`
    /// and gradient norm `gradient_norm`, after moving by `step_norm`, is the
    /// last one.
    pub fn check(
        &self,
        value: f64,
        gradient_norm: f64,
        step_norm: f64,
    ) -> Option<TerminationReason> {
        if Self::relative_gradient(value, gradient_norm) < self.epsilon {
            Some(TerminationReason::GradientNorm)
        } else if step_norm < self.min_step {
            Some(TerminationReason::StepSize)
        } else {
            None
        }
    }
}
