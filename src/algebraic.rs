//! The [`Algebraic`] trait: the uniform ring-like interface that generic
//! matrix code is written against.
//!
//! Scalars (`f64`), [`Polynomial`](crate::Polynomial),
//! [`Value`](crate::Value) and, recursively, [`Matrix<V>`](crate::Matrix)
//! implement it. Every operation returns a new value; nothing is mutated in
//! place.

use std::fmt::Debug;

use crate::error::{AlgebraError, Result};

/// A value closed under negation, addition and multiplication, with a
/// (possibly failing) multiplicative inverse.
///
/// Binary operations return `Result` because not every pair of operands is
/// conformable (matrix shapes, mixed [`Value`](crate::Value) variants).
pub trait Algebraic: Clone + Debug {
    /// Additive inverse.
    fn negate(&self) -> Self;

    /// Multiplicative inverse. For matrices this is the full matrix inverse.
    fn reciprocal(&self) -> Result<Self>;

    /// `self + rhs`.
    fn add(&self, rhs: &Self) -> Result<Self>;

    /// `self * rhs`.
    fn multiply(&self, rhs: &Self) -> Result<Self>;

    /// Whether this is the additive identity.
    fn is_zero(&self) -> bool;
}

impl Algebraic for f64 {
    #[inline]
    fn negate(&self) -> Self {
        -*self
    }

    fn reciprocal(&self) -> Result<Self> {
        if *self == 0.0 {
            return Err(AlgebraError::SingularMatrix(self.to_string()));
        }
        Ok(1.0 / *self)
    }

    #[inline]
    fn add(&self, rhs: &Self) -> Result<Self> {
        Ok(*self + *rhs)
    }

    #[inline]
    fn multiply(&self, rhs: &Self) -> Result<Self> {
        Ok(*self * *rhs)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}
