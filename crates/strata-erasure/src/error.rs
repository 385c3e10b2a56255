//! Error types for erasure coding operations.

/// Errors that can occur while constructing a code, encoding, or decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErasureError {
    /// The `(m, k)` pair is outside `0 < k < m <= 127`.
    #[error("invalid code parameters: m={m}, k={k} (need 0 < k < m <= {max})", max = crate::MAX_SHARDS)]
    InvalidParams {
        /// Total shard count requested.
        m: usize,
        /// Data shard count requested.
        k: usize,
    },

    /// The data size cannot be split into `k` equal shards.
    #[error("size {size} is not divisible by k={k}")]
    SizeNotDivisible {
        /// Requested data size in bytes.
        size: usize,
        /// Data shard count.
        k: usize,
    },

    /// A full stripe of `m` shards would not fit in memory addressing.
    #[error("size {size} too large: a stripe of m={m} shards overflows usize")]
    SizeTooLarge {
        /// Requested data size in bytes.
        size: usize,
        /// Total shard count.
        m: usize,
    },

    /// A buffer passed to encode or decode has the wrong length.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    SizeMismatch {
        /// Length the code requires.
        expected: usize,
        /// Length that was supplied.
        got: usize,
    },

    /// More shards were lost than the code can tolerate.
    #[error("too many erased shards: {erased}, at most {max} recoverable")]
    TooManyErasures {
        /// Number of erased shards in the request.
        erased: usize,
        /// Maximum recoverable (`m - k`).
        max: usize,
    },

    /// An erased shard index is not a valid position.
    #[error("shard index {index} out of range for m={m}")]
    ShardOutOfRange {
        /// The offending index.
        index: usize,
        /// Total shard count.
        m: usize,
    },

    /// The same shard index appears twice in an erasure list.
    #[error("shard index {index} listed more than once")]
    DuplicateShard {
        /// The repeated index.
        index: usize,
    },

    /// Field arithmetic failed (e.g. a survivor matrix was singular).
    #[error("field error: {0}")]
    Field(#[from] strata_gf::GfError),
}

impl ErasureError {
    /// Whether the error comes from invalid construction parameters.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::InvalidParams { .. } | Self::SizeNotDivisible { .. } | Self::SizeTooLarge { .. }
        )
    }
}
