//! The [`Code`] type: one configured `(m, k, shard_len)` erasure code.

use std::sync::Arc;

use strata_gf::{Matrix, MulTables};
use tracing::debug;

use crate::MAX_SHARDS;
use crate::cache::DecodeCache;
use crate::config::CodeConfig;
use crate::error::ErasureError;
use crate::generator::generator_matrix;
use crate::pattern::ErasurePattern;
use crate::plan::DecodePlan;

/// A systematic `(m, k)` erasure code over GF(256).
///
/// Data of `k * shard_len` bytes is split into `k` data shards; encoding
/// produces `m - k` parity shards, and any `k` of the `m` shards rebuild the
/// data. The generator matrix and parity tables are built once here and never
/// change, so a `Code` can be shared across threads (`Arc<Code>`) and used
/// concurrently for both encoding and decoding. The only mutable state is the
/// internal decode-plan cache.
pub struct Code {
    /// Total number of shards.
    m: usize,
    /// Number of data shards.
    k: usize,
    /// Bytes per shard.
    shard_len: usize,
    /// `m × k` generator, identity on top.
    generator: Matrix,
    /// Expanded tables for generator rows `k..m`.
    parity_tables: MulTables,
    cache: DecodeCache,
}

impl Code {
    /// Create a code with `m` total shards, `k` data shards, encoding inputs
    /// of exactly `size` bytes.
    ///
    /// # Errors
    ///
    /// - [`ErasureError::InvalidParams`] unless `0 < k < m <= 127`.
    /// - [`ErasureError::SizeNotDivisible`] if `size % k != 0`.
    /// - [`ErasureError::SizeTooLarge`] if `m * (size / k)` overflows `usize`.
    pub fn new(m: usize, k: usize, size: usize) -> Result<Self, ErasureError> {
        if k == 0 || m <= k || k > MAX_SHARDS || m > MAX_SHARDS {
            return Err(ErasureError::InvalidParams { m, k });
        }
        if size % k != 0 {
            return Err(ErasureError::SizeNotDivisible { size, k });
        }

        let shard_len = size / k;
        // Every buffer length the code computes is at most `m * shard_len`.
        if shard_len.checked_mul(m).is_none() {
            return Err(ErasureError::SizeTooLarge { size, m });
        }

        let generator = generator_matrix(m, k)?;
        let parity_tables = MulTables::from_matrix(&generator.submatrix(k, m));

        debug!(m, k, shard_len, "constructed erasure code");

        Ok(Self {
            m,
            k,
            shard_len,
            generator,
            parity_tables,
            cache: DecodeCache::new(),
        })
    }

    /// Build a code from a [`CodeConfig`].
    pub fn from_config(config: &CodeConfig) -> Result<Self, ErasureError> {
        Self::new(config.m, config.k, config.size)
    }

    /// Total number of shards.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Number of data shards.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of parity shards (`m - k`), also the maximum tolerated losses.
    pub fn parity_shards(&self) -> usize {
        self.m - self.k
    }

    /// Bytes per shard.
    pub fn shard_len(&self) -> usize {
        self.shard_len
    }

    /// Length of the data accepted by [`encode`](Self::encode).
    pub fn data_len(&self) -> usize {
        self.k * self.shard_len
    }

    /// Length of the parity returned by [`encode`](Self::encode).
    pub fn parity_len(&self) -> usize {
        self.parity_shards() * self.shard_len
    }

    /// Length of a full stripe (data followed by parity).
    pub fn stripe_len(&self) -> usize {
        self.m * self.shard_len
    }

    /// The `m × k` generator matrix.
    pub fn generator(&self) -> &Matrix {
        &self.generator
    }

    /// The parameters this code was built from.
    pub fn config(&self) -> CodeConfig {
        CodeConfig {
            m: self.m,
            k: self.k,
            size: self.data_len(),
        }
    }

    /// Number of distinct erasure patterns with a cached decode plan.
    pub fn cached_patterns(&self) -> usize {
        self.cache.len()
    }

    pub(crate) fn parity_tables(&self) -> &MulTables {
        &self.parity_tables
    }

    /// Fetch or build the decode plan for a non-empty pattern.
    pub(crate) fn plan(&self, pattern: &ErasurePattern) -> Result<Arc<DecodePlan>, ErasureError> {
        let plan = self
            .cache
            .get_or_build(pattern, || DecodePlan::build(&self.generator, pattern))?;
        Ok(plan)
    }

    pub(crate) fn check_len(&self, buf: &[u8], expected: usize) -> Result<(), ErasureError> {
        if buf.len() != expected {
            return Err(ErasureError::SizeMismatch {
                expected,
                got: buf.len(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Code")
            .field("m", &self.m)
            .field("k", &self.k)
            .field("shard_len", &self.shard_len)
            .field("cache", &self.cache)
            .finish()
    }
}
