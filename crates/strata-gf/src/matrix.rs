//! Dense matrices over GF(256).

use std::fmt;

use crate::error::GfError;
use crate::field;

/// A row-major `rows × cols` matrix of GF(256) elements.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl Matrix {
    /// An all-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// The `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self, GfError> {
        if data.len() != rows * cols {
            return Err(GfError::DimensionMismatch {
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Vandermonde matrix with evaluation points `0, 1, .., rows - 1`:
    /// `v[i][j] = i^j`.
    ///
    /// Any `cols` rows of it are linearly independent as long as
    /// `rows <= 256`, since the points are distinct.
    pub fn vandermonde(rows: usize, cols: usize) -> Self {
        let mut m = Self::zeros(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                m.set(r, c, field::pow(r as u8, c));
            }
        }
        m
    }

    /// Cauchy matrix `c[i][j] = 1 / (x_i + y_j)`.
    ///
    /// The point sets must be disjoint, otherwise a denominator is zero.
    pub fn cauchy(xs: &[u8], ys: &[u8]) -> Result<Self, GfError> {
        let mut m = Self::zeros(xs.len(), ys.len());
        for (r, &x) in xs.iter().enumerate() {
            for (c, &y) in ys.iter().enumerate() {
                let cell = field::inv(field::add(x, y)).ok_or(GfError::Singular)?;
                m.set(r, c, cell);
            }
        }
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> u8 {
        self.data[r * self.cols + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: u8) {
        self.data[r * self.cols + c] = value;
    }

    /// Borrow row `r`.
    pub fn row(&self, r: usize) -> &[u8] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// The row-major backing buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Copy the given rows, in order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &r in indices {
            data.extend_from_slice(self.row(r));
        }
        Self {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    /// Rows `start..end` as a new matrix.
    pub fn submatrix(&self, start: usize, end: usize) -> Self {
        Self {
            rows: end - start,
            cols: self.cols,
            data: self.data[start * self.cols..end * self.cols].to_vec(),
        }
    }

    /// Stack `other` below `self`.
    pub fn stack(&self, other: &Matrix) -> Result<Self, GfError> {
        if self.cols != other.cols {
            return Err(GfError::DimensionMismatch {
                expected: self.cols,
                got: other.cols,
            });
        }
        let mut data = self.data.clone();
        data.extend_from_slice(&other.data);
        Ok(Self {
            rows: self.rows + other.rows,
            cols: self.cols,
            data,
        })
    }

    /// Matrix product `self × rhs`.
    pub fn mul(&self, rhs: &Matrix) -> Result<Self, GfError> {
        if self.cols != rhs.rows {
            return Err(GfError::DimensionMismatch {
                expected: self.cols,
                got: rhs.rows,
            });
        }
        let mut out = Self::zeros(self.rows, rhs.cols);
        for r in 0..self.rows {
            for c in 0..rhs.cols {
                let mut acc = 0u8;
                for i in 0..self.cols {
                    acc ^= field::mul(self.get(r, i), rhs.get(i, c));
                }
                out.set(r, c, acc);
            }
        }
        Ok(out)
    }

    /// Row vector × matrix: `Σ_i row[i] · self[i][..]`.
    pub fn mul_row(&self, row: &[u8]) -> Result<Vec<u8>, GfError> {
        if row.len() != self.rows {
            return Err(GfError::DimensionMismatch {
                expected: self.rows,
                got: row.len(),
            });
        }
        let mut out = vec![0u8; self.cols];
        for (i, &coeff) in row.iter().enumerate() {
            if coeff == 0 {
                continue;
            }
            for (o, &x) in out.iter_mut().zip(self.row(i)) {
                *o ^= field::mul(coeff, x);
            }
        }
        Ok(out)
    }

    /// Invert a square matrix with Gauss-Jordan elimination.
    pub fn invert(&self) -> Result<Self, GfError> {
        if self.rows != self.cols {
            return Err(GfError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let n = self.rows;
        let mut work = self.clone();
        let mut inverse = Self::identity(n);

        for col in 0..n {
            // Any non-zero entry works as a pivot; there is no rounding.
            let pivot = (col..n)
                .find(|&r| work.get(r, col) != 0)
                .ok_or(GfError::Singular)?;
            if pivot != col {
                work.swap_rows(pivot, col);
                inverse.swap_rows(pivot, col);
            }

            let scale = field::inv(work.get(col, col)).ok_or(GfError::Singular)?;
            work.scale_row(col, scale);
            inverse.scale_row(col, scale);

            for r in 0..n {
                let factor = work.get(r, col);
                if r == col || factor == 0 {
                    continue;
                }
                work.add_scaled_row(col, r, factor);
                inverse.add_scaled_row(col, r, factor);
            }
        }

        Ok(inverse)
    }

    /// Whether the matrix is square and invertible.
    pub fn is_invertible(&self) -> bool {
        self.invert().is_ok()
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    fn scale_row(&mut self, r: usize, factor: u8) {
        let cols = self.cols;
        for x in &mut self.data[r * cols..(r + 1) * cols] {
            *x = field::mul(*x, factor);
        }
    }

    /// `row[dst] += factor · row[src]`.
    fn add_scaled_row(&mut self, src: usize, dst: usize, factor: u8) {
        for c in 0..self.cols {
            let v = field::mul(factor, self.get(src, c));
            self.data[dst * self.cols + c] ^= v;
        }
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix({}x{})", self.rows, self.cols)?;
        for r in 0..self.rows {
            for (c, byte) in self.row(r).iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{byte:02x}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
