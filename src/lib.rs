//! Symbolic polynomials, generic matrices and a uniform algebra over both.
//!
//! Polynomials are sums of monomials ([`Term`]) with real coefficients and
//! real exponents over variables `x[1], x[2], ...`. They differentiate
//! exactly, so gradients and Hessians of a [`Polynomial`] are themselves
//! matrices of polynomials that can be evaluated at any point.
//!
//! ```
//! use polymin::{Differentiable, Polynomial};
//!
//! let f: Polynomial = "x[1]^2 + 2*x[2]^2 - 2*x[1]*x[2] - 2*x[2]".parse().unwrap();
//! let g = f.gradient(2).unwrap().evaluate(&[1.0, 1.0]);
//! assert_eq!(g.to_vec(), vec![0.0, 0.0]);
//! ```
//!
//! The minimizers built on top of this live in the `polymin-optim` crate.

pub mod algebraic;
pub mod error;
pub mod function;
pub mod matrix;
pub mod parse;
pub mod polynomial;
pub mod term;
pub mod value;

pub use algebraic::Algebraic;
pub use error::{AlgebraError, Result};
pub use function::{directional_derivative, gradient_at, hessian_at, Differentiable};
pub use matrix::{Matrix, Vector};
pub use parse::parse_polynomial;
pub use polynomial::Polynomial;
pub use term::Term;
pub use value::{Value, ValueKind};
