//! Systematic generator matrix construction.
//!
//! The `m × k` generator always has the `k × k` identity on top, so the first
//! `k` shards of a stripe are the data itself. The parity rows below are
//! chosen so that *every* `k × k` submatrix of the generator is invertible,
//! which is what lets any `k` surviving shards rebuild the data.

use strata_gf::{GfError, Matrix};

/// Codes with at most this many data shards use the Vandermonde construction.
pub const VANDERMONDE_MAX_K: usize = 5;

/// Build the generator matrix for an `(m, k)` code.
///
/// - `k <= 5`: a Vandermonde matrix over the points `0..m`, right-multiplied
///   by the inverse of its top `k × k` block.
/// - `k > 5`: identity stacked on the Cauchy block `1 / (i ⊕ j)` for
///   `i in k..m`, `j in 0..k`.
///
/// Callers guarantee `0 < k < m <= 127`.
pub fn generator_matrix(m: usize, k: usize) -> Result<Matrix, GfError> {
    if k <= VANDERMONDE_MAX_K {
        vandermonde_systematic(m, k)
    } else {
        cauchy_systematic(m, k)
    }
}

fn vandermonde_systematic(m: usize, k: usize) -> Result<Matrix, GfError> {
    let v = Matrix::vandermonde(m, k);
    let top_inverse = v.submatrix(0, k).invert()?;
    v.mul(&top_inverse)
}

fn cauchy_systematic(m: usize, k: usize) -> Result<Matrix, GfError> {
    let xs: Vec<u8> = (k..m).map(|i| i as u8).collect();
    let ys: Vec<u8> = (0..k).map(|j| j as u8).collect();
    Matrix::identity(k).stack(&Matrix::cauchy(&xs, &ys)?)
}
