//! Differentiable functions of a real point.

use crate::error::Result;
use crate::matrix::{Matrix, Vector};
use crate::polynomial::Polynomial;
use crate::term::Term;

/// A function `f: R^n -> R` with symbolic partial derivatives.
///
/// Variables are numbered from 1; the point passed to [`value`](Self::value)
/// holds `x[1]` at index 0. Implementors only supply `value` and
/// `derivative`; gradients and Hessians are assembled from those.
pub trait Differentiable: Clone {
    /// Evaluate at `x`.
    fn value(&self, x: &[f64]) -> f64;

    /// Partial derivative with respect to variable `var` (1-based).
    fn derivative(&self, var: usize) -> Self;

    /// Column vector of the `n` first-order partial derivatives.
    fn gradient(&self, n: usize) -> Result<Vector<Self>> {
        Matrix::col_vector((1..=n).map(|i| self.derivative(i)).collect())
    }

    /// `n × n` matrix of second-order partials, entry `(i, j)` being
    /// `d/dx[j] (d/dx[i] f)`.
    fn hessian(&self, n: usize) -> Result<Matrix<Self>> {
        let mut entries = Vec::with_capacity(n * n);
        for i in 1..=n {
            let di = self.derivative(i);
            for j in 1..=n {
                entries.push(di.derivative(j));
            }
        }
        Matrix::new(n, n, entries)
    }
}

impl Differentiable for Term {
    fn value(&self, x: &[f64]) -> f64 {
        Term::value(self, x)
    }

    fn derivative(&self, var: usize) -> Self {
        Term::derivative(self, var)
    }
}

impl Differentiable for Polynomial {
    fn value(&self, x: &[f64]) -> f64 {
        Polynomial::value(self, x)
    }

    fn derivative(&self, var: usize) -> Self {
        Polynomial::derivative(self, var)
    }
}

impl<D: Differentiable> Matrix<D> {
    /// Evaluate every element at `x`.
    pub fn evaluate(&self, x: &[f64]) -> Matrix<f64> {
        self.apply(|f| f.value(x))
    }
}

/// Gradient of `f` at `x`, with `n = x.len()`.
pub fn gradient_at<D: Differentiable>(f: &D, x: &[f64]) -> Result<Vector<f64>> {
    Ok(f.gradient(x.len())?.evaluate(x))
}

/// Hessian of `f` at `x`, with `n = x.len()`.
pub fn hessian_at<D: Differentiable>(f: &D, x: &[f64]) -> Result<Matrix<f64>> {
    Ok(f.hessian(x.len())?.evaluate(x))
}

/// Directional derivative `grad f(x) . p`.
pub fn directional_derivative<D: Differentiable>(f: &D, x: &[f64], p: &Vector<f64>) -> Result<f64> {
    gradient_at(f, x)?.dot(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn poly(s: &str) -> Polynomial {
        s.parse().unwrap()
    }

    #[test]
    fn gradient_of_quadratic() {
        let f = poly("x[1]^2 + 2*x[2]^2 - 2*x[1]*x[2] - 2*x[2]");
        let g = gradient_at(&f, &[1.0, 0.5]).unwrap();
        assert!(g.is_column());
        assert_eq!(g.to_vec(), vec![1.0, -2.0]);
    }

    #[test]
    fn hessian_is_symmetric() {
        let f = poly("x[1]^3*x[2] + x[2]^2*x[3] - 4*x[1]*x[3]");
        let h = hessian_at(&f, &[1.5, -0.5, 2.0]).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(h[(i, j)], h[(j, i)], epsilon = 1e-12);
            }
        }
        // d2f/dx1^2 = 6 x1 x2
        assert_relative_eq!(h[(0, 0)], 6.0 * 1.5 * -0.5);
    }

    #[test]
    fn variables_beyond_n_are_ignored_in_gradient() {
        let f = poly("x[1] + x[3]");
        let g = f.gradient(2).unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.evaluate(&[0.0, 0.0]).to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn term_is_differentiable() {
        let t = Term::with_powers(3.0, vec![2.0]);
        let h = hessian_at(&t, &[5.0]).unwrap();
        assert_eq!(h.to_vec(), vec![6.0]);
    }

    #[test]
    fn directional() {
        let f = poly("x[1]^2 + x[2]^2");
        let p = Matrix::col_vector(vec![1.0, -1.0]).unwrap();
        assert_relative_eq!(directional_derivative(&f, &[2.0, 3.0], &p).unwrap(), -2.0);
    }
}
