use polymin::{AlgebraError, Differentiable, Matrix, Result, Vector};

/// A differentiable function bundled with its symbolic gradient.
///
/// The gradient is derived once at construction and then only evaluated, so
/// every solver iteration costs numeric work only.
#[derive(Debug, Clone)]
pub struct Objective<D> {
    function: D,
    gradient: Vector<D>,
}

impl<D: Differentiable> Objective<D> {
    /// Derive the gradient of `function` over `dim` variables.
    pub fn new(function: D, dim: usize) -> Result<Self> {
        let gradient = function.gradient(dim)?;
        Ok(Objective { function, gradient })
    }

    /// Number of input variables.
    pub fn dim(&self) -> usize {
        self.gradient.len()
    }

    pub fn function(&self) -> &D {
        &self.function
    }

    /// `f(x)`.
    pub fn value(&self, x: &Vector<f64>) -> f64 {
        self.function.value(x.as_slice())
    }

    /// `grad f(x)` as a column vector.
    pub fn gradient(&self, x: &Vector<f64>) -> Vector<f64> {
        self.gradient.evaluate(x.as_slice())
    }

    /// `(f(x), grad f(x))`.
    pub fn eval_grad(&self, x: &Vector<f64>) -> (f64, Vector<f64>) {
        (self.value(x), self.gradient(x))
    }

    /// Derive the symbolic Hessian. Only second-order solvers call this.
    pub fn hessian(&self) -> Result<Matrix<D>> {
        self.function.hessian(self.dim())
    }

    /// Check that `x0` is a vector over this objective's variables and
    /// return it as a column.
    pub fn start_point(&self, x0: &Vector<f64>) -> Result<Vector<f64>> {
        if !x0.is_vector() || x0.len() != self.dim() {
            return Err(AlgebraError::Shape(format!(
                "initial point must be a vector of {} values, got a {}x{} matrix",
                self.dim(),
                x0.rows(),
                x0.cols()
            )));
        }
        Matrix::col_vector(x0.to_vec())
    }
}
