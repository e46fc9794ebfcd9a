//! Monomials: a coefficient times a product of powers of indexed variables.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::error::{AlgebraError, Result};

/// A single monomial `c · x[b]^p0 · x[b+1]^p1 · …`.
///
/// Exponents are stored in a sparse window: `powers[i]` is the exponent of
/// variable `begin + i` (variables are 1-based). Variables outside the window
/// have exponent 0. A term with an empty window is a constant.
///
/// Every constructor shrinks the window to the span of non-zero exponents,
/// so two terms are the same monomial exactly when their windows match.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Term {
    coefficient: f64,
    powers: Vec<f64>,
    begin: usize,
}

impl Term {
    /// The canonical zero term.
    pub const ZERO: Term = Term {
        coefficient: 0.0,
        powers: Vec::new(),
        begin: 0,
    };

    /// Term with exponent window starting at variable `begin`.
    ///
    /// Fails with a shape error if the window is non-empty and `begin` is 0,
    /// since variable indices start at 1.
    pub fn new(coefficient: f64, begin: usize, powers: Vec<f64>) -> Result<Self> {
        if begin == 0 && !powers.is_empty() {
            return Err(AlgebraError::shape("variable indices start at 1"));
        }
        Ok(Term::trimmed(coefficient, begin, &powers))
    }

    /// Term whose window starts at `x[1]`: `powers[i]` is the exponent of `x[i + 1]`.
    pub fn with_powers(coefficient: f64, powers: Vec<f64>) -> Self {
        Term::trimmed(coefficient, 1, &powers)
    }

    /// Constant term.
    pub fn constant(coefficient: f64) -> Self {
        Term {
            coefficient,
            powers: Vec::new(),
            begin: 0,
        }
    }

    /// Build a term and shrink its window to the non-zero exponents.
    pub(crate) fn trimmed(coefficient: f64, begin: usize, powers: &[f64]) -> Self {
        if coefficient == 0.0 {
            return Term::ZERO;
        }
        let first = powers.iter().position(|&p| p != 0.0);
        let last = powers.iter().rposition(|&p| p != 0.0);
        match (first, last) {
            (Some(first), Some(last)) => Term {
                coefficient,
                powers: powers[first..=last].to_vec(),
                begin: begin + first,
            },
            _ => Term::constant(coefficient),
        }
    }

    #[inline]
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// The stored exponent window.
    #[inline]
    pub fn powers(&self) -> &[f64] {
        &self.powers
    }

    /// Variable index of `powers()[0]` (0 for constants).
    #[inline]
    pub fn begin_index(&self) -> usize {
        self.begin
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficient == 0.0
    }

    /// Whether the term has no variable factors.
    pub fn is_constant(&self) -> bool {
        self.powers.iter().all(|&p| p == 0.0)
    }

    /// Exponent of variable `var` (0 outside the window).
    pub fn power(&self, var: usize) -> f64 {
        var.checked_sub(self.begin)
            .and_then(|i| self.powers.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Highest variable index inside the window (0 for constants).
    pub fn max_variable(&self) -> usize {
        if self.powers.is_empty() {
            0
        } else {
            self.begin + self.powers.len() - 1
        }
    }

    /// Two terms combine when they have the same window placement and
    /// exponents. Constants always combine with each other.
    pub fn can_combine(&self, other: &Term) -> bool {
        if self.powers.is_empty() && other.powers.is_empty() {
            return true;
        }
        self.begin == other.begin && self.powers == other.powers
    }

    /// Sum of coefficients, keeping this term's window. Only meaningful when
    /// [`can_combine`](Self::can_combine) holds.
    pub(crate) fn combine(&self, other: &Term) -> Term {
        Term {
            coefficient: self.coefficient + other.coefficient,
            powers: self.powers.clone(),
            begin: self.begin,
        }
    }

    /// Partial derivative with respect to `x[var]` by the power rule.
    pub fn derivative(&self, var: usize) -> Term {
        let power = self.power(var);
        let coefficient = self.coefficient * power;
        if coefficient == 0.0 {
            return Term::ZERO;
        }
        let mut powers = self.powers.clone();
        powers[var - self.begin] -= 1.0;
        Term::trimmed(coefficient, self.begin, &powers)
    }

    /// Product of two monomials: exponents add over the union of the windows.
    pub fn multiply(&self, other: &Term) -> Term {
        let coefficient = self.coefficient * other.coefficient;
        if coefficient == 0.0 {
            return Term::ZERO;
        }
        let (lo, hi) = match (self.powers.is_empty(), other.powers.is_empty()) {
            (true, true) => return Term::constant(coefficient),
            (true, false) => (other.begin, other.max_variable()),
            (false, true) => (self.begin, self.max_variable()),
            (false, false) => (
                self.begin.min(other.begin),
                self.max_variable().max(other.max_variable()),
            ),
        };
        let powers: Vec<f64> = (lo..=hi).map(|v| self.power(v) + other.power(v)).collect();
        Term::trimmed(coefficient, lo, &powers)
    }

    /// Multiply the coefficient by `factor`.
    pub fn scale(&self, factor: f64) -> Term {
        if self.coefficient * factor == 0.0 {
            return Term::ZERO;
        }
        Term {
            coefficient: self.coefficient * factor,
            powers: self.powers.clone(),
            begin: self.begin,
        }
    }

    pub fn negate(&self) -> Term {
        Term {
            coefficient: -self.coefficient,
            powers: self.powers.clone(),
            begin: self.begin,
        }
    }

    /// `1 / term`: reciprocal coefficient and negated exponents.
    pub fn reciprocal(&self) -> Result<Term> {
        if self.is_zero() {
            return Err(AlgebraError::SingularMatrix(self.to_string()));
        }
        Ok(Term {
            coefficient: 1.0 / self.coefficient,
            powers: self.powers.iter().map(|&p| -p).collect(),
            begin: self.begin,
        })
    }

    /// Evaluate at `x`, where `x[0]` is the value of variable `x[1]`.
    ///
    /// Variables beyond the end of `x` contribute a factor of 1.
    pub fn value(&self, x: &[f64]) -> f64 {
        self.powers
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p != 0.0)
            .filter_map(|(i, &p)| x.get(self.begin + i - 1).map(|&xi| xi.powf(p)))
            .fold(self.coefficient, |acc, f| acc * f)
    }

    /// Deterministic order used by [`Polynomial`](crate::Polynomial): window
    /// start, then exponents lexicographically.
    pub(crate) fn window_order(&self, other: &Term) -> Ordering {
        self.begin.cmp(&other.begin).then_with(|| {
            self.powers
                .iter()
                .zip(&other.powers)
                .map(|(a, b)| a.total_cmp(b))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| self.powers.len().cmp(&other.powers.len()))
        })
    }
}

impl Display for Term {
    /// Prints in the polynomial text notation, e.g. `-2*x[1]^2*x[3]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut need_times = false;
        if self.coefficient != 1.0 || self.is_constant() {
            write!(f, "{}", self.coefficient)?;
            need_times = true;
        }
        for (i, &p) in self.powers.iter().enumerate() {
            if p == 0.0 {
                continue;
            }
            if need_times {
                write!(f, "*")?;
            }
            need_times = true;
            write!(f, "x[{}]", self.begin + i)?;
            if p != 1.0 {
                write!(f, "^{}", p)?;
            }
        }
        Ok(())
    }
}
