//! GF(2^8) arithmetic for the Strata erasure coder.
//!
//! This crate provides:
//! - [`field`]: scalar add / multiply / inverse over GF(256), backed by
//!   compile-time log and exp tables.
//! - [`Matrix`]: dense row-major byte matrices with Gauss-Jordan inversion
//!   and the Vandermonde / Cauchy constructions used for generator matrices.
//! - [`MulTables`]: split-nibble lookup tables expanded from a coefficient
//!   matrix, used to multiply whole shards at a time.

pub mod error;
pub mod field;
pub mod matrix;
pub mod tables;

pub use error::GfError;
pub use matrix::Matrix;
pub use tables::{MulTables, TABLE_BYTES, WriteOp};
