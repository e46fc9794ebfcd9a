//! Dense generic matrices and vectors over [`Algebraic`] values.
//!
//! A [`Matrix<V>`] stores its elements in a flat row-major buffer plus a
//! `transposed` flag. [`Matrix::transpose`] flips the flag and shares the
//! buffer, so a transposed view costs nothing. Determinant, adjoint and inverse
//! are computed by cofactor (Laplace) expansion, which only needs the
//! operations of [`Algebraic`] and therefore works for matrices of scalars,
//! polynomials and nested matrices alike.

use std::fmt::{self, Display};
use std::ops::Index;
use std::sync::Arc;

use crate::algebraic::Algebraic;
use crate::error::{AlgebraError, Result};

/// A vector is a matrix with a single column (column vector) or a single row
/// (row vector).
pub type Vector<V> = Matrix<V>;

/// Dense `rows × cols` matrix with a zero-copy transposed view.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix<V> {
    /// Row count of the underlying storage (before applying `transposed`).
    rows: usize,
    /// Column count of the underlying storage.
    cols: usize,
    data: Arc<[V]>,
    transposed: bool,
}

impl<V> Matrix<V> {
    /// Build a matrix from row-major elements.
    ///
    /// Fails with a shape error if either dimension is zero or if
    /// `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<V>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(AlgebraError::shape(format!(
                "zero dimension in {}x{} matrix",
                rows, cols
            )));
        }
        if data.len() != rows * cols {
            return Err(AlgebraError::shape(format!(
                "{}x{} matrix needs {} values, got {}",
                rows,
                cols,
                rows * cols,
                data.len()
            )));
        }
        Ok(Matrix {
            rows,
            cols,
            data: data.into(),
            transposed: false,
        })
    }

    /// Build a matrix from a list of equally long rows.
    pub fn from_rows(rows: Vec<Vec<V>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(AlgebraError::shape("rows have different lengths"));
        }
        Matrix::new(n_rows, n_cols, rows.into_iter().flatten().collect())
    }

    /// Column vector `<v1, v2, ...>`.
    pub fn col_vector(values: Vec<V>) -> Result<Self> {
        let n = values.len();
        Matrix::new(n, 1, values)
    }

    /// Row vector `[v1, v2, ...]`, stored as a transposed column.
    pub fn row_vector(values: Vec<V>) -> Result<Self> {
        Ok(Matrix::col_vector(values)?.transpose())
    }

    /// Logical row count.
    #[inline]
    pub fn rows(&self) -> usize {
        if self.transposed {
            self.cols
        } else {
            self.rows
        }
    }

    /// Logical column count.
    #[inline]
    pub fn cols(&self) -> usize {
        if self.transposed {
            self.rows
        } else {
            self.cols
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a matrix has at least one element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether this matrix is a transposed view of its storage.
    #[inline]
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn is_column(&self) -> bool {
        self.cols() == 1
    }

    #[inline]
    pub fn is_row(&self) -> bool {
        self.rows() == 1
    }

    #[inline]
    pub fn is_vector(&self) -> bool {
        self.is_column() || self.is_row()
    }

    /// Element at logical position `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &V {
        assert!(
            row < self.rows() && col < self.cols(),
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows(),
            self.cols()
        );
        let (r, c) = if self.transposed {
            (col, row)
        } else {
            (row, col)
        };
        &self.data[r * self.cols + c]
    }

    /// Element at logical row-major position `index`.
    #[inline]
    pub fn get_flat(&self, index: usize) -> &V {
        let row = index / self.cols();
        let col = index - row * self.cols();
        self.get(row, col)
    }

    /// Elements in logical row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        (0..self.len()).map(move |i| self.get_flat(i))
    }

    /// Transposed view sharing this matrix's storage.
    pub fn transpose(&self) -> Self {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: Arc::clone(&self.data),
            transposed: !self.transposed,
        }
    }

    /// Map every element through `f`, preserving shape and the transpose flag.
    pub fn apply<R>(&self, f: impl FnMut(&V) -> R) -> Matrix<R> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
            transposed: self.transposed,
        }
    }

    /// Fallible [`apply`](Self::apply): stops at the first error.
    pub fn try_apply<R>(&self, f: impl FnMut(&V) -> Result<R>) -> Result<Matrix<R>> {
        let data = self.data.iter().map(f).collect::<Result<Vec<R>>>()?;
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: data.into(),
            transposed: self.transposed,
        })
    }
}

impl<V: Clone> Matrix<V> {
    /// Elements in logical row-major order.
    pub fn to_vec(&self) -> Vec<V> {
        self.iter().cloned().collect()
    }

    /// Row `row` as a row vector.
    pub fn row(&self, row: usize) -> Vector<V> {
        let values: Vec<V> = (0..self.cols()).map(|c| self.get(row, c).clone()).collect();
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.into(),
            transposed: true,
        }
    }

    /// Column `col` as a column vector.
    pub fn col(&self, col: usize) -> Vector<V> {
        let values: Vec<V> = (0..self.rows()).map(|r| self.get(r, col).clone()).collect();
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.into(),
            transposed: false,
        }
    }

    /// The minor obtained by deleting `row` and `col`.
    ///
    /// Fails with a shape error if the result would have no rows or columns.
    pub fn reduce(&self, row: usize, col: usize) -> Result<Self> {
        let rows = self.rows().saturating_sub(1);
        let cols = self.cols().saturating_sub(1);
        if rows == 0 || cols == 0 {
            return Err(AlgebraError::shape(format!(
                "cannot reduce {}x{} matrix",
                self.rows(),
                self.cols()
            )));
        }
        let mut reduced = Vec::with_capacity(rows * cols);
        for r in (0..self.rows()).filter(|&r| r != row) {
            for c in (0..self.cols()).filter(|&c| c != col) {
                reduced.push(self.get(r, c).clone());
            }
        }
        Matrix::new(rows, cols, reduced)
    }
}

impl<V> Index<(usize, usize)> for Matrix<V> {
    type Output = V;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &V {
        self.get(row, col)
    }
}

impl<V: PartialEq> PartialEq for Matrix<V> {
    /// Logical equality: shape and elements, regardless of storage layout.
    fn eq(&self, other: &Self) -> bool {
        self.rows() == other.rows()
            && self.cols() == other.cols()
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<V: Algebraic> Matrix<V> {
    fn require_square(&self, what: &str) -> Result<()> {
        if self.rows() != self.cols() {
            return Err(AlgebraError::shape(format!(
                "cannot compute {} of non-square {}x{} matrix",
                what,
                self.rows(),
                self.cols()
            )));
        }
        Ok(())
    }

    /// Dot product of two vectors of equal length (row or column).
    pub fn dot(&self, other: &Self) -> Result<V> {
        if self.len() != other.len() {
            return Err(AlgebraError::shape(format!(
                "dot product of vectors with {} and {} elements",
                self.len(),
                other.len()
            )));
        }
        sum_of_products(self.iter().zip(other.iter()))
    }

    /// Multiply every element by `factor`.
    pub fn scale(&self, factor: &V) -> Result<Self> {
        self.try_apply(|elem| elem.multiply(factor))
    }

    /// Signed minor `(-1)^(row+col) * det(reduce(row, col))`.
    pub fn cofactor(&self, row: usize, col: usize) -> Result<V> {
        let minor = self.reduce(row, col)?.determinant()?;
        if (row + col) % 2 == 1 {
            Ok(minor.negate())
        } else {
            Ok(minor)
        }
    }

    /// Transposed matrix of cofactors.
    pub fn adjoint(&self) -> Result<Self> {
        self.require_square("adjoint")?;
        let n = self.rows();
        let mut cofactors = Vec::with_capacity(n * n);
        for r in 0..n {
            for c in 0..n {
                cofactors.push(self.cofactor(r, c)?);
            }
        }
        Ok(Matrix::new(n, n, cofactors)?.transpose())
    }

    /// Determinant by cofactor expansion along the first row.
    ///
    /// 1×1 and 2×2 matrices use the closed forms `a` and `a·d − b·c`.
    pub fn determinant(&self) -> Result<V> {
        self.require_square("determinant")?;
        match self.rows() {
            1 => Ok(self[(0, 0)].clone()),
            2 => {
                let ad = self[(0, 0)].multiply(&self[(1, 1)])?;
                let bc = self[(0, 1)].multiply(&self[(1, 0)])?;
                ad.add(&bc.negate())
            }
            n => {
                let mut det = self[(0, 0)].multiply(&self.cofactor(0, 0)?)?;
                for c in 1..n {
                    det = det.add(&self[(0, c)].multiply(&self.cofactor(0, c)?)?)?;
                }
                Ok(det)
            }
        }
    }

    /// Inverse via `adjoint / determinant`.
    ///
    /// Returns `Ok(None)` for a singular matrix (zero determinant) so callers
    /// can recover; a non-square matrix is a shape error.
    pub fn inverse(&self) -> Result<Option<Self>> {
        self.require_square("inverse")?;
        if self.rows() == 1 {
            let only = &self[(0, 0)];
            if only.is_zero() {
                return Ok(None);
            }
            return Ok(Some(Matrix::new(1, 1, vec![only.reciprocal()?])?));
        }
        let det = self.determinant()?;
        if det.is_zero() {
            return Ok(None);
        }
        let inv_det = det.reciprocal()?;
        Ok(Some(self.adjoint()?.scale(&inv_det)?))
    }
}

fn sum_of_products<'a, V: Algebraic + 'a>(
    mut pairs: impl Iterator<Item = (&'a V, &'a V)>,
) -> Result<V> {
    let (a, b) = pairs
        .next()
        .ok_or_else(|| AlgebraError::shape("sum over zero elements"))?;
    let mut sum = a.multiply(b)?;
    for (a, b) in pairs {
        sum = sum.add(&a.multiply(b)?)?;
    }
    Ok(sum)
}

impl<V: Algebraic> Algebraic for Matrix<V> {
    fn negate(&self) -> Self {
        self.apply(V::negate)
    }

    /// Matrix inverse; a singular matrix is a hard error here.
    fn reciprocal(&self) -> Result<Self> {
        match self.inverse()? {
            Some(inv) => Ok(inv),
            None => Err(AlgebraError::SingularMatrix(format!("{:?}", self.to_vec()))),
        }
    }

    fn add(&self, rhs: &Self) -> Result<Self> {
        if self.rows() != rhs.rows() || self.cols() != rhs.cols() {
            return Err(AlgebraError::shape(format!(
                "cannot add {}x{} and {}x{} matrices",
                self.rows(),
                self.cols(),
                rhs.rows(),
                rhs.cols()
            )));
        }
        let sums = self
            .iter()
            .zip(rhs.iter())
            .map(|(a, b)| a.add(b))
            .collect::<Result<Vec<V>>>()?;
        Matrix::new(self.rows(), self.cols(), sums)
    }

    /// Conformable matrix product.
    fn multiply(&self, rhs: &Self) -> Result<Self> {
        if self.cols() != rhs.rows() {
            return Err(AlgebraError::shape(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows(),
                self.cols(),
                rhs.rows(),
                rhs.cols()
            )));
        }
        let (n, m, inner) = (self.rows(), rhs.cols(), self.cols());
        let mut product = Vec::with_capacity(n * m);
        for r in 0..n {
            for c in 0..m {
                product.push(sum_of_products(
                    (0..inner).map(|k| (self.get(r, k), rhs.get(k, c))),
                )?);
            }
        }
        Matrix::new(n, m, product)
    }

    fn is_zero(&self) -> bool {
        self.data.iter().all(V::is_zero)
    }
}

impl<V: Algebraic + num_traits::Zero + num_traits::One> Matrix<V> {
    /// `size × size` identity matrix.
    pub fn identity(size: usize) -> Result<Self> {
        let mut values = Vec::with_capacity(size * size);
        for r in 0..size {
            for c in 0..size {
                values.push(if r == c { V::one() } else { V::zero() });
            }
        }
        Matrix::new(size, size, values)
    }

    /// `rows × cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Matrix::new(rows, cols, vec![V::zero(); rows * cols])
    }
}

impl Matrix<f64> {
    /// Euclidean norm of all elements (the 2-norm for vectors).
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Elements in storage order, which equals logical order for vectors.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// `self + alpha * direction`, elementwise.
    pub fn axpy(&self, alpha: f64, direction: &Self) -> Result<Self> {
        if self.len() != direction.len() {
            return Err(AlgebraError::shape(format!(
                "axpy over {} and {} elements",
                self.len(),
                direction.len()
            )));
        }
        let values = self
            .iter()
            .zip(direction.iter())
            .map(|(x, d)| x + alpha * d)
            .collect();
        Matrix::new(self.rows(), self.cols(), values)
    }
}

const PADDING: usize = 2;

impl<V: Display> Display for Matrix<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_vector() {
            let (open, close) = if self.is_column() {
                ('<', '>')
            } else {
                ('[', ']')
            };
            write!(f, "{}", open)?;
            for (i, v) in self.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
            return write!(f, "{}", close);
        }

        let cells: Vec<Vec<String>> = (0..self.rows())
            .map(|r| (0..self.cols()).map(|c| self.get(r, c).to_string()).collect())
            .collect();
        let widths: Vec<usize> = (0..self.cols())
            .map(|c| cells.iter().map(|row| row[c].len()).max().unwrap_or(0) + PADDING)
            .collect();
        for (r, row) in cells.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            write!(f, "[{:pad$}", "", pad = PADDING)?;
            for (cell, &width) in row.iter().zip(&widths) {
                write!(f, "{:<width$}", cell, width = width)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
