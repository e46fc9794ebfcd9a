//! Sums of monomials with exact symbolic differentiation.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::algebraic::Algebraic;
use crate::error::{AlgebraError, Result};
use crate::term::Term;

/// A sum of non-combinable [`Term`]s.
///
/// Construction sums the coefficients of combinable terms, drops
/// zero-coefficient terms and sorts the rest by window start and then by
/// exponents (ties keep insertion order). A polynomial is never empty: the zero
/// polynomial holds exactly one [`Term::ZERO`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polynomial {
    terms: Vec<Term>,
}

impl Polynomial {
    pub fn new(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut combined: Vec<Term> = Vec::new();
        for term in terms {
            match combined.iter_mut().find(|t| t.can_combine(&term)) {
                Some(existing) => *existing = existing.combine(&term),
                None => combined.push(term),
            }
        }
        combined.retain(|t| !t.is_zero());
        if combined.is_empty() {
            return Polynomial::zero();
        }
        combined.sort_by(Term::window_order);
        Polynomial { terms: combined }
    }

    /// The canonical zero polynomial.
    pub fn zero() -> Self {
        Polynomial {
            terms: vec![Term::ZERO],
        }
    }

    pub fn constant(value: f64) -> Self {
        Polynomial::new([Term::constant(value)])
    }

    #[inline]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.iter().all(Term::is_zero)
    }

    /// Highest variable index appearing in any term (0 for constants).
    pub fn num_variables(&self) -> usize {
        self.terms.iter().map(Term::max_variable).max().unwrap_or(0)
    }

    /// Partial derivative with respect to `x[var]`.
    pub fn derivative(&self, var: usize) -> Polynomial {
        Polynomial::new(
            self.terms
                .iter()
                .map(|t| t.derivative(var))
                .filter(|t| !t.is_zero()),
        )
    }

    /// Evaluate at `x`, where `x[0]` is the value of variable `x[1]`.
    pub fn value(&self, x: &[f64]) -> f64 {
        self.terms.iter().map(|t| t.value(x)).sum()
    }

    pub fn negate(&self) -> Polynomial {
        Polynomial::new(self.terms.iter().map(Term::negate))
    }

    /// Reciprocal of a single-term polynomial.
    ///
    /// The reciprocal of a sum of two or more terms is not a polynomial and is
    /// reported as [`AlgebraError::NotRepresentable`].
    pub fn reciprocal(&self) -> Result<Polynomial> {
        match self.terms.as_slice() {
            [only] => Ok(Polynomial::new([only.reciprocal()?])),
            _ => Err(AlgebraError::NotRepresentable(format!(
                "reciprocal of multi-term polynomial {}",
                self
            ))),
        }
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        Polynomial::new(self.terms.iter().chain(&other.terms).cloned())
    }

    pub fn add_term(&self, term: &Term) -> Polynomial {
        Polynomial::new(self.terms.iter().chain(std::iter::once(term)).cloned())
    }

    /// Distributive product.
    pub fn multiply(&self, other: &Polynomial) -> Polynomial {
        Polynomial::new(
            other
                .terms
                .iter()
                .flat_map(|b| self.terms.iter().map(move |a| a.multiply(b))),
        )
    }

    pub fn multiply_term(&self, term: &Term) -> Polynomial {
        Polynomial::new(self.terms.iter().map(|t| t.multiply(term)))
    }

    pub fn scale(&self, factor: f64) -> Polynomial {
        Polynomial::new(self.terms.iter().map(|t| t.scale(factor)))
    }
}

impl From<Term> for Polynomial {
    fn from(term: Term) -> Self {
        Polynomial::new([term])
    }
}

impl FromStr for Polynomial {
    type Err = AlgebraError;

    /// Parse the polynomial text notation, e.g. `"x[1]^2 - 2*x[1]*x[2] + 3"`.
    fn from_str(s: &str) -> Result<Self> {
        crate::parse::parse_polynomial(s)
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

impl Algebraic for Polynomial {
    fn negate(&self) -> Self {
        Polynomial::negate(self)
    }

    fn reciprocal(&self) -> Result<Self> {
        Polynomial::reciprocal(self)
    }

    fn add(&self, rhs: &Self) -> Result<Self> {
        Ok(Polynomial::add(self, rhs))
    }

    fn multiply(&self, rhs: &Self) -> Result<Self> {
        Ok(Polynomial::multiply(self, rhs))
    }

    fn is_zero(&self) -> bool {
        Polynomial::is_zero(self)
    }
}
