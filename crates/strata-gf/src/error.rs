//! Error types for field and matrix operations.

/// Errors that can occur during GF(256) matrix operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GfError {
    /// The matrix has no inverse over GF(256).
    #[error("matrix is singular")]
    Singular,

    /// An operation that requires a square matrix got a rectangular one.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Row count of the offending matrix.
        rows: usize,
        /// Column count of the offending matrix.
        cols: usize,
    },

    /// `count` shards of `shard_len` bytes overflow `usize`.
    #[error("{count} shards of {shard_len} bytes overflow usize")]
    LengthOverflow {
        /// Number of shards in the buffer.
        count: usize,
        /// Bytes per shard.
        shard_len: usize,
    },

    /// Operand dimensions do not line up.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Length the operation required.
        expected: usize,
        /// Length that was supplied.
        got: usize,
    },
}
