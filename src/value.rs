//! [`Value`]: the tagged union over every algebraic variant.
//!
//! Cross-variant `add` / `multiply` go through one explicit, symmetric
//! combination table. A pair with no entry is an
//! [`AlgebraError::Dispatch`]; it never falls back to zero or identity.

use std::fmt::{self, Display};

use crate::algebraic::Algebraic;
use crate::error::{AlgebraError, Result};
use crate::matrix::Matrix;
use crate::polynomial::Polynomial;
use crate::term::Term;

/// Variant tag of a [`Value`], ordered by promotion rank for the
/// non-matrix variants (`Scalar < Term < Polynomial`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    Scalar,
    Term,
    Polynomial,
    Matrix,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Scalar => "Scalar",
            ValueKind::Term => "Term",
            ValueKind::Polynomial => "Polynomial",
            ValueKind::Matrix => "Matrix",
        }
    }
}

/// Any algebraic value: scalar, monomial, polynomial or matrix of values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Scalar(f64),
    Term(Term),
    Polynomial(Polynomial),
    Matrix(Matrix<Value>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Term(_) => ValueKind::Term,
            Value::Polynomial(_) => ValueKind::Polynomial,
            Value::Matrix(_) => ValueKind::Matrix,
        }
    }

    /// Wrap a matrix of values, enforcing homogeneity.
    ///
    /// Scalars, terms and polynomials are promoted to the highest variant
    /// present. Mixing matrices with non-matrix elements is a dispatch error.
    pub fn matrix(m: Matrix<Value>) -> Result<Value> {
        let first = m.get(0, 0).kind();
        if m.iter().all(|v| v.kind() == first) {
            return Ok(Value::Matrix(m));
        }
        if let Some(nested) = m.iter().find(|v| v.kind() == ValueKind::Matrix) {
            let other = m
                .iter()
                .find(|v| v.kind() != ValueKind::Matrix)
                .map_or(ValueKind::Matrix, Value::kind);
            return Err(AlgebraError::Dispatch {
                op: "construction",
                lhs: nested.kind().name(),
                rhs: other.name(),
            });
        }
        let target = m.iter().map(Value::kind).max().unwrap_or(first);
        Ok(Value::Matrix(m.apply(|v| v.promote(target))))
    }

    /// Convert to `target` rank; only called with `target >= self.kind()`.
    fn promote(&self, target: ValueKind) -> Value {
        match (self, target) {
            (Value::Scalar(x), ValueKind::Term) => Value::Term(Term::constant(*x)),
            (Value::Scalar(x), ValueKind::Polynomial) => Value::Polynomial(Polynomial::constant(*x)),
            (Value::Term(t), ValueKind::Polynomial) => Value::Polynomial(Polynomial::from(t.clone())),
            _ => self.clone(),
        }
    }

    /// The scalar inside, if this is a [`Value::Scalar`].
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            _ => None,
        }
    }

    fn dispatch_error(op: &'static str, lhs: &Value, rhs: &Value) -> AlgebraError {
        AlgebraError::Dispatch {
            op,
            lhs: lhs.kind().name(),
            rhs: rhs.kind().name(),
        }
    }
}

fn term_sum(a: &Term, b: &Term) -> Value {
    if a.can_combine(b) {
        Value::Term(a.combine(b))
    } else {
        Value::Polynomial(Polynomial::new([a.clone(), b.clone()]))
    }
}

impl Algebraic for Value {
    fn negate(&self) -> Self {
        match self {
            Value::Scalar(x) => Value::Scalar(-x),
            Value::Term(t) => Value::Term(t.negate()),
            Value::Polynomial(p) => Value::Polynomial(p.negate()),
            Value::Matrix(m) => Value::Matrix(Algebraic::negate(m)),
        }
    }

    fn reciprocal(&self) -> Result<Self> {
        Ok(match self {
            Value::Scalar(x) => Value::Scalar(Algebraic::reciprocal(x)?),
            Value::Term(t) => Value::Term(t.reciprocal()?),
            Value::Polynomial(p) => Value::Polynomial(p.reciprocal()?),
            Value::Matrix(m) => Value::matrix(Algebraic::reciprocal(m)?)?,
        })
    }

    fn add(&self, rhs: &Self) -> Result<Self> {
        use Value::*;
        Ok(match (self, rhs) {
            (Scalar(a), Scalar(b)) => Scalar(a + b),
            (Scalar(a), Term(t)) | (Term(t), Scalar(a)) => term_sum(t, &crate::term::Term::constant(*a)),
            (Term(a), Term(b)) => term_sum(a, b),
            (Scalar(a), Polynomial(p)) | (Polynomial(p), Scalar(a)) => {
                Polynomial(p.add_term(&crate::term::Term::constant(*a)))
            }
            (Term(t), Polynomial(p)) | (Polynomial(p), Term(t)) => Polynomial(p.add_term(t)),
            (Polynomial(a), Polynomial(b)) => Polynomial(a.add(b)),
            (Matrix(a), Matrix(b)) => Value::matrix(Algebraic::add(a, b)?)?,
            (Matrix(_), _) | (_, Matrix(_)) => {
                return Err(Value::dispatch_error("addition", self, rhs))
            }
        })
    }

    fn multiply(&self, rhs: &Self) -> Result<Self> {
        use Value::*;
        Ok(match (self, rhs) {
            (Scalar(a), Scalar(b)) => Scalar(a * b),
            (Scalar(a), Term(t)) | (Term(t), Scalar(a)) => Term(t.scale(*a)),
            (Term(a), Term(b)) => Term(a.multiply(b)),
            (Scalar(a), Polynomial(p)) | (Polynomial(p), Scalar(a)) => Polynomial(p.scale(*a)),
            (Term(t), Polynomial(p)) | (Polynomial(p), Term(t)) => Polynomial(p.multiply_term(t)),
            (Polynomial(a), Polynomial(b)) => Polynomial(a.multiply(b)),
            (Matrix(a), Matrix(b)) => Value::matrix(Algebraic::multiply(a, b)?)?,
            (Matrix(m), v) | (v, Matrix(m)) => Value::matrix(m.scale(v)?)?,
        })
    }

    fn is_zero(&self) -> bool {
        match self {
            Value::Scalar(x) => *x == 0.0,
            Value::Term(t) => t.is_zero(),
            Value::Polynomial(p) => p.is_zero(),
            Value::Matrix(m) => Algebraic::is_zero(m),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<Term> for Value {
    fn from(t: Term) -> Self {
        Value::Term(t)
    }
}

impl From<Polynomial> for Value {
    fn from(p: Polynomial) -> Self {
        Value::Polynomial(p)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(x) => write!(f, "{}", x),
            Value::Term(t) => write!(f, "{}", t),
            Value::Polynomial(p) => write!(f, "{}", p),
            Value::Matrix(m) => write!(f, "{}", m),
        }
    }
}

impl Matrix<Value> {
    /// Convert to a matrix of plain scalars, failing on the first
    /// non-scalar element.
    pub fn to_scalars(&self) -> Result<Matrix<f64>> {
        self.try_apply(|v| {
            v.as_scalar().ok_or_else(|| {
                AlgebraError::NotRepresentable(format!("value is not a scalar: \"{}\"", v))
            })
        })
    }
}

impl Matrix<f64> {
    pub fn to_values(&self) -> Matrix<Value> {
        self.apply(|&x| Value::Scalar(x))
    }
}
