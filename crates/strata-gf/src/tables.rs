//! Split-nibble multiply tables.
//!
//! Multiplying a byte `b` by a fixed coefficient `c` distributes over the
//! two nibbles of `b`:
//!
//! ```text
//! c · b = c · (b & 0x0f)  ⊕  c · (b & 0xf0)
//! ```
//!
//! so each coefficient expands into two 16-entry tables (32 bytes) and a
//! multiply becomes two lookups and an XOR. A coefficient matrix expands
//! into one 32-byte block per entry, row-major, which is what the encoder
//! and decoder run against instead of the raw matrix.

use crate::error::GfError;
use crate::field;
use crate::matrix::Matrix;

/// Bytes of expanded table per matrix coefficient.
pub const TABLE_BYTES: usize = 32;

/// How a multiply combines with the destination buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// Overwrite: `dst = Σ c · src`.
    Direct,
    /// Accumulate: `dst ^= Σ c · src`.
    Add,
}

/// Expanded multiply tables for a `rows × cols` coefficient matrix.
#[derive(Clone, PartialEq, Eq)]
pub struct MulTables {
    rows: usize,
    cols: usize,
    data: Box<[u8]>,
}

impl MulTables {
    /// Expand a row-major `rows × cols` coefficient buffer.
    pub fn expand(coefficients: &[u8], rows: usize, cols: usize) -> Result<Self, GfError> {
        if coefficients.len() != rows * cols {
            return Err(GfError::DimensionMismatch {
                expected: rows * cols,
                got: coefficients.len(),
            });
        }
        Ok(Self::expand_unchecked(coefficients, rows, cols))
    }

    /// Expand every coefficient of `matrix`.
    pub fn from_matrix(matrix: &Matrix) -> Self {
        Self::expand_unchecked(matrix.as_bytes(), matrix.rows(), matrix.cols())
    }

    fn expand_unchecked(coefficients: &[u8], rows: usize, cols: usize) -> Self {
        let mut data = vec![0u8; coefficients.len() * TABLE_BYTES];
        for (&c, block) in coefficients.iter().zip(data.chunks_exact_mut(TABLE_BYTES)) {
            let (low, high) = block.split_at_mut(16);
            for n in 0..16u8 {
                low[n as usize] = field::mul(c, n);
                high[n as usize] = field::mul(c, n << 4);
            }
        }

        Self {
            rows,
            cols,
            data: data.into_boxed_slice(),
        }
    }

    /// Output rows (destination shards).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Input columns (source shards).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The raw expanded blob: `rows * cols * TABLE_BYTES` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Multiply `cols` contiguous source shards of `shard_len` bytes into
    /// `rows` contiguous destination shards, overwriting them.
    pub fn multiply(&self, shard_len: usize, src: &[u8], dst: &mut [u8]) -> Result<(), GfError> {
        self.apply(shard_len, src, dst, WriteOp::Direct)
    }

    /// Like [`multiply`](Self::multiply), but XORs the products into `dst`.
    pub fn multiply_accumulate(
        &self,
        shard_len: usize,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<(), GfError> {
        self.apply(shard_len, src, dst, WriteOp::Add)
    }

    /// Run the tables over shard buffers with the given write mode.
    pub fn apply(
        &self,
        shard_len: usize,
        src: &[u8],
        dst: &mut [u8],
        op: WriteOp,
    ) -> Result<(), GfError> {
        let src_len = buffer_len(self.cols, shard_len)?;
        if src.len() != src_len {
            return Err(GfError::DimensionMismatch {
                expected: src_len,
                got: src.len(),
            });
        }
        let dst_len = buffer_len(self.rows, shard_len)?;
        if dst.len() != dst_len {
            return Err(GfError::DimensionMismatch {
                expected: dst_len,
                got: dst.len(),
            });
        }
        if shard_len == 0 {
            return Ok(());
        }

        for (r, out) in dst.chunks_exact_mut(shard_len).enumerate() {
            if op == WriteOp::Direct {
                out.fill(0);
            }
            for (c, input) in src.chunks_exact(shard_len).enumerate() {
                let (low, high) = self.table(r, c);
                for (o, &b) in out.iter_mut().zip(input) {
                    *o ^= low[(b & 0x0f) as usize] ^ high[(b >> 4) as usize];
                }
            }
        }

        Ok(())
    }

    fn table(&self, r: usize, c: usize) -> (&[u8], &[u8]) {
        let start = (r * self.cols + c) * TABLE_BYTES;
        self.data[start..start + TABLE_BYTES].split_at(16)
    }
}

fn buffer_len(count: usize, shard_len: usize) -> Result<usize, GfError> {
    count
        .checked_mul(shard_len)
        .ok_or(GfError::LengthOverflow { count, shard_len })
}

impl std::fmt::Debug for MulTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MulTables")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("bytes", &self.data.len())
            .finish()
    }
}
